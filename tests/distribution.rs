#![forbid(unsafe_code)]
use chrono::NaiveDate;
use garde::{
    Assignment, AssignmentKind, Distribution, PlanError, PlanningData, Preference,
    PreferenceKind, Worker, WorkerId,
};
use std::collections::BTreeMap;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn data_with_workers(count: i64) -> PlanningData {
    let mut data = PlanningData::default();
    for id in 1..=count {
        data.workers
            .push(Worker::new(id, format!("w{id}"), "Prénom", format!("Nom{id}")));
    }
    data
}

fn run(data: &PlanningData, current: NaiveDate, seed: u64) -> Distribution {
    let mut dist = Distribution::seeded(current, seed);
    dist.prepare(data).unwrap();
    dist.run().unwrap();
    dist
}

#[test]
fn two_workers_cover_every_day_alternating() {
    // Novembre 2025 : 30 jours, le samedi 15 rendu travaillé par dérogation.
    let mut data = data_with_workers(2);
    data.set_override(d(2025, 11, 15), true);

    let dist = run(&data, d(2025, 11, 1), 42);
    let result = dist.result();

    assert!(result.errors.is_empty());
    assert_eq!(result.all_day.len(), 30);
    for day in 1..=30u32 {
        assert!(result.all_day.contains_key(&day), "day {day} uncovered");
    }
    // Le repos forcé du lendemain impose l'alternance stricte à deux agents.
    for day in 1..30u32 {
        assert_ne!(
            result.all_day[&day].worker,
            result.all_day[&(day + 1)].worker,
            "same holder on days {day} and {}",
            day + 1
        );
    }
}

#[test]
fn hour_accounting_follows_rest_calendar() {
    let mut data = data_with_workers(2);
    data.set_override(d(2025, 11, 15), true); // samedi travaillé
    let w1 = WorkerId::new(1);
    let w2 = WorkerId::new(2);
    data.set_assignment(d(2025, 11, 15), w1, Some(AssignmentKind::AllDay), "")
        .unwrap();
    data.set_assignment(d(2025, 11, 16), w2, Some(AssignmentKind::AllDay), "")
        .unwrap();
    data.set_assignment(d(2025, 11, 16), w1, Some(AssignmentKind::Work), "")
        .unwrap();

    let mut dist = Distribution::seeded(d(2025, 11, 17), 1);
    dist.prepare(&data).unwrap();

    // Garde un jour travaillé : 12 h ; un jour de repos : 20 h ; vacation : 8 h.
    assert_eq!(dist.worker_state(w1).unwrap().done_hours, 12 + 8);
    assert_eq!(dist.worker_state(w2).unwrap().done_hours, 20);
    // 20 jours ouvrés + le 15 => 168 h dues
    assert_eq!(dist.worker_state(w1).unwrap().required_hours, 168);
    assert!(dist.worker_state(w1).unwrap().all_day.contains(&15));
}

#[test]
fn all_day_preference_wins_regardless_of_fairness() {
    let mut data = data_with_workers(3);
    let a = WorkerId::new(1);
    data.set_preference(d(2025, 11, 5), a, Some(PreferenceKind::AllDay), "")
        .unwrap();

    for seed in [1, 2, 3, 4, 5] {
        let dist = run(&data, d(2025, 11, 1), seed);
        let decision = &dist.result().all_day[&5];
        assert_eq!(decision.worker, a);
        assert!(decision.reasons[0].starts_with("by_desire:"));
    }
}

#[test]
fn exhausted_worker_gets_no_work_shift() {
    let mut data = data_with_workers(3);
    let w1 = WorkerId::new(1);
    // 18 vacations + une garde de week-end avant la fenêtre : 164 h > 160 dues
    data.set_assignment(d(2025, 11, 1), w1, Some(AssignmentKind::AllDay), "")
        .unwrap();
    for day in 2..=19 {
        data.set_assignment(d(2025, 11, day), w1, Some(AssignmentKind::Work), "")
            .unwrap();
    }

    let dist = run(&data, d(2025, 11, 20), 9);
    assert!(dist.worker_state(w1).unwrap().left_hours() <= 0);
    for (day, decisions) in &dist.result().work8h {
        for decision in decisions {
            assert_ne!(decision.worker, w1, "w1 got a work shift on day {day}");
        }
    }
}

#[test]
fn zero_workers_reports_an_error_per_day() {
    let data = PlanningData::default();
    let dist = run(&data, d(2025, 11, 1), 0);
    let result = dist.result();

    assert!(result.all_day.is_empty());
    assert!(result.work8h.is_empty());
    assert_eq!(result.errors.len(), 30);
    assert!(result.errors.values().all(|e| e == "no user to select"));
    assert!(result.notice.is_none());
}

#[test]
fn same_seed_same_result() {
    let mut data = data_with_workers(4);
    data.set_override(d(2025, 11, 11), false);
    data.set_preference(d(2025, 11, 8), WorkerId::new(2), Some(PreferenceKind::Rest), "")
        .unwrap();
    data.set_preference(d(2025, 11, 9), WorkerId::new(3), Some(PreferenceKind::Work), "")
        .unwrap();

    let first = run(&data, d(2025, 11, 3), 1234).into_result();
    let second = run(&data, d(2025, 11, 3), 1234).into_result();
    assert_eq!(first, second);

    let other_seed = run(&data, d(2025, 11, 3), 4321).into_result();
    // même couverture de jours, même si les détenteurs peuvent différer
    assert_eq!(
        first.all_day.keys().collect::<Vec<_>>(),
        other_seed.all_day.keys().collect::<Vec<_>>()
    );
}

#[test]
fn committed_all_day_is_replayed_not_redistributed() {
    let mut data = data_with_workers(3);
    let w1 = WorkerId::new(1);
    data.set_assignment(d(2025, 11, 12), w1, Some(AssignmentKind::AllDay), "manuel")
        .unwrap();

    let dist = run(&data, d(2025, 11, 10), 5);
    let result = dist.result();

    assert!(!result.all_day.contains_key(&12), "day 12 was redistributed");
    let state = dist.worker_state(w1).unwrap();
    assert!(state.all_day.contains(&12));
    assert!(state.is_forced_rest(13));
    if let Some(decision) = result.all_day.get(&13) {
        assert_ne!(decision.worker, w1);
    }
    for decision in result.work8h.get(&13).into_iter().flatten() {
        assert_ne!(decision.worker, w1);
    }
}

#[test]
fn all_day_on_month_eve_forces_rest_on_first_day() {
    let mut data = data_with_workers(2);
    let w1 = WorkerId::new(1);
    data.set_assignment(d(2025, 11, 30), w1, Some(AssignmentKind::AllDay), "")
        .unwrap();

    let dist = run(&data, d(2025, 12, 1), 77);
    let state = dist.worker_state(w1).unwrap();
    assert!(state.is_forced_rest(1));
    assert_ne!(dist.result().all_day[&1].worker, w1);
}

#[test]
fn forced_rest_invariant_holds_for_any_seed() {
    let mut data = data_with_workers(3);
    data.set_preference(d(2025, 11, 6), WorkerId::new(2), Some(PreferenceKind::Rest), "")
        .unwrap();

    for seed in [0, 1, 2, 3, 4, 5, 6, 7] {
        let dist = run(&data, d(2025, 11, 1), seed);
        let result = dist.result();

        let mut all_day_by_worker: BTreeMap<WorkerId, Vec<u32>> = BTreeMap::new();
        for (day, decision) in &result.all_day {
            all_day_by_worker.entry(decision.worker).or_default().push(*day);
        }
        for (worker, days) in &all_day_by_worker {
            for day in days {
                let next = day + 1;
                assert!(
                    !days.contains(&next),
                    "worker {worker} on duty two days in a row (seed {seed})"
                );
                let works_next = result
                    .work8h
                    .get(&next)
                    .into_iter()
                    .flatten()
                    .any(|dec| dec.worker == *worker);
                assert!(
                    !works_next,
                    "worker {worker} works the day after duty (seed {seed})"
                );
            }
        }
    }
}

#[test]
fn state_machine_rejects_out_of_order_calls() {
    let data = data_with_workers(1);

    let mut dist = Distribution::seeded(d(2025, 11, 1), 0);
    assert!(matches!(dist.run(), Err(PlanError::NotPrepared)));

    dist.prepare(&data).unwrap();
    assert!(matches!(dist.prepare(&data), Err(PlanError::AlreadyPrepared)));

    dist.run().unwrap();
    assert!(matches!(dist.run(), Err(PlanError::AlreadyRan)));
}

#[test]
fn duplicate_preference_is_a_contract_violation() {
    let mut data = data_with_workers(1);
    let w1 = WorkerId::new(1);
    // contournement volontaire de set_preference, qui fait un upsert
    data.preferences.push(Preference {
        date: d(2025, 11, 5),
        worker: w1,
        kind: PreferenceKind::Rest,
        comment: String::new(),
    });
    data.preferences.push(Preference {
        date: d(2025, 11, 5),
        worker: w1,
        kind: PreferenceKind::Work,
        comment: String::new(),
    });

    let mut dist = Distribution::seeded(d(2025, 11, 1), 0);
    assert!(matches!(
        dist.prepare(&data),
        Err(PlanError::DuplicatePreference { .. })
    ));
}

#[test]
fn unknown_worker_in_commitments_is_fatal() {
    let mut data = data_with_workers(1);
    data.assignments.push(Assignment {
        date: d(2025, 11, 5),
        worker: WorkerId::new(99),
        kind: AssignmentKind::Work,
        comment: String::new(),
    });

    let mut dist = Distribution::seeded(d(2025, 11, 1), 0);
    assert!(matches!(
        dist.prepare(&data),
        Err(PlanError::UnknownWorker(id)) if id == WorkerId::new(99)
    ));
}
