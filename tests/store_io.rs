#![forbid(unsafe_code)]
use chrono::NaiveDate;
use garde::{
    calendar, io, AssignmentKind, Distribution, JsonStorage, PlanningData, PreferenceKind,
    Storage, Worker, WorkerId,
};
use std::fs;
use tempfile::tempdir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sample_data() -> PlanningData {
    let mut data = PlanningData::default();
    data.workers.push(Worker::new(1, "wja", "Володька", "Яблонски"));
    data.workers.push(Worker::new(2, "wtr", "Хулио", "Трындец"));
    data
}

#[test]
fn all_day_slot_is_a_per_day_singleton() {
    let mut data = sample_data();
    data.set_assignment(d(2025, 11, 5), WorkerId::new(1), Some(AssignmentKind::AllDay), "")
        .unwrap();

    // un autre agent ne peut pas prendre la même garde
    let err = data
        .set_assignment(d(2025, 11, 5), WorkerId::new(2), Some(AssignmentKind::AllDay), "")
        .unwrap_err();
    assert!(err.to_string().contains("already holds it"));

    // le détenteur peut réécrire sa propre ligne
    data.set_assignment(d(2025, 11, 5), WorkerId::new(1), Some(AssignmentKind::AllDay), "bis")
        .unwrap();
    assert_eq!(data.assignments.len(), 1);
    assert_eq!(data.holder_of_all_day(d(2025, 11, 5)), Some(WorkerId::new(1)));
}

#[test]
fn override_restating_the_default_is_dropped() {
    let mut data = sample_data();
    data.set_override(d(2025, 11, 15), false); // samedi chômé = défaut
    assert!(data.overrides.is_empty());

    data.set_override(d(2025, 11, 15), true);
    assert_eq!(data.overrides.len(), 1);

    data.set_override(d(2025, 11, 15), false); // retour au défaut
    assert!(data.overrides.is_empty());

    data.set_override(d(2025, 11, 17), false); // lundi férié
    assert_eq!(data.overrides.len(), 1);
}

#[test]
fn preference_upsert_keeps_one_row_per_worker_day() {
    let mut data = sample_data();
    let w1 = WorkerId::new(1);
    data.set_preference(d(2025, 11, 5), w1, Some(PreferenceKind::Rest), "")
        .unwrap();
    data.set_preference(d(2025, 11, 5), w1, Some(PreferenceKind::AllDay), "finalement")
        .unwrap();
    assert_eq!(data.preferences.len(), 1);
    assert_eq!(data.preferences[0].kind, PreferenceKind::AllDay);

    data.set_preference(d(2025, 11, 5), w1, None, "").unwrap();
    assert!(data.preferences.is_empty());

    assert!(data
        .set_preference(d(2025, 11, 5), WorkerId::new(42), Some(PreferenceKind::Rest), "")
        .is_err());
}

#[test]
fn committed_result_satisfies_store_invariants() {
    let mut data = sample_data();
    let current = d(2025, 11, 1);

    let mut dist = Distribution::seeded(current, 3);
    dist.prepare(&data).unwrap();
    dist.run().unwrap();
    data.commit(dist.result(), current).unwrap();

    for date in calendar::days(current, calendar::month_end(current)) {
        assert!(
            data.holder_of_all_day(date).is_some(),
            "no duty committed on {date}"
        );
        let all_day_rows = data
            .assignments
            .iter()
            .filter(|a| a.date == date && a.kind == AssignmentKind::AllDay)
            .count();
        assert_eq!(all_day_rows, 1, "{date}");
    }

    // Une seconde répartition sur l'état commis n'a plus rien à proposer.
    let mut again = Distribution::seeded(current, 3);
    again.prepare(&data).unwrap();
    again.run().unwrap();
    assert!(again.result().all_day.is_empty());
    assert!(again.result().errors.is_empty());
}

#[test]
fn json_storage_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planning.json");
    let storage = JsonStorage::open(&path).unwrap();

    assert_eq!(storage.load_or_default().unwrap(), PlanningData::default());

    let mut data = sample_data();
    data.set_override(d(2025, 11, 15), true);
    data.set_preference(d(2025, 11, 5), WorkerId::new(1), Some(PreferenceKind::Rest), "fatigué")
        .unwrap();
    storage.save(&data).unwrap();

    assert_eq!(storage.load().unwrap(), data);
}

#[test]
fn import_workers_from_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("workers.csv");
    fs::write(
        &path,
        "id,handle,first_name,last_name,role\n\
         1,wja,Volodka,Jablonski,member\n\
         2,adm,Maxime,Iline,admin\n",
    )
    .unwrap();

    let workers = io::import_workers_csv(&path).unwrap();
    assert_eq!(workers.len(), 2);
    assert_eq!(workers[0].handle, "wja");
    assert_eq!(workers[1].role, garde::Role::Admin);
}

#[test]
fn month_csv_export_lists_committed_assignments() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.csv");

    let mut data = sample_data();
    data.set_assignment(d(2025, 11, 16), WorkerId::new(1), Some(AssignmentKind::AllDay), "")
        .unwrap();
    data.set_assignment(d(2025, 11, 17), WorkerId::new(2), Some(AssignmentKind::Work), "")
        .unwrap();
    io::export_month_csv(&path, &data, d(2025, 11, 1)).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("2025-11-16,all_day,wja,20,"));
    assert!(text.contains("2025-11-17,work8h,wtr,8,"));
}
