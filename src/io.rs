use crate::model::{AssignmentKind, PlanningData, Role, Worker, WorkerId};
use crate::{calendar, hours};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'agents depuis CSV : header `id,handle,first_name,last_name[,role]`
pub fn import_workers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Worker>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id: i64 = rec
            .get(0)
            .context("missing id")?
            .trim()
            .parse()
            .context("invalid worker id")?;
        let handle = rec.get(1).context("missing handle")?.trim();
        let first_name = rec.get(2).context("missing first_name")?.trim();
        let last_name = rec.get(3).context("missing last_name")?.trim();
        if handle.is_empty() || first_name.is_empty() || last_name.is_empty() {
            bail!("invalid worker row (empty field)");
        }
        let mut worker = Worker::new(id, handle, first_name, last_name);
        if let Some(role) = rec.get(4) {
            let role = role.trim();
            if !role.is_empty() {
                worker.role = parse_role(role)
                    .with_context(|| format!("invalid role for handle {handle}"))?;
            }
        }
        out.push(worker);
    }
    Ok(out)
}

fn parse_role(s: &str) -> anyhow::Result<Role> {
    match s.to_ascii_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "member" | "user" => Ok(Role::Member),
        _ => bail!("expected admin or member"),
    }
}

/// Export JSON du jeu de données (jolie mise en forme)
pub fn export_data_json<P: AsRef<Path>>(path: P, data: &PlanningData) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(data)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des affectations du mois contenant `month` :
/// header `date,kind,handle,hours,comment`
pub fn export_month_csv<P: AsRef<Path>>(
    path: P,
    data: &PlanningData,
    month: NaiveDate,
) -> anyhow::Result<()> {
    let start = calendar::month_start(month);
    let end = calendar::month_end(month);
    let rest = crate::RestCalendar::from_overrides(data.overrides.clone());

    let mut rows: Vec<_> = data
        .assignments
        .iter()
        .filter(|a| a.date >= start && a.date < end)
        .collect();
    rows.sort_by_key(|a| (a.date, a.kind == AssignmentKind::Work, a.worker));

    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "kind", "handle", "hours", "comment"])?;
    for a in rows {
        let handle = handle_of(data, a.worker);
        let kind = match a.kind {
            AssignmentKind::AllDay => "all_day",
            AssignmentKind::Work => "work8h",
        };
        let hours = hours::hours_for(a.kind, rest.is_rest_day(a.date)).to_string();
        w.write_record([
            a.date.to_string().as_str(),
            kind,
            handle,
            hours.as_str(),
            a.comment.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn handle_of(data: &PlanningData, id: WorkerId) -> &str {
    data.find_worker_by_id(id)
        .map(|w| w.handle.as_str())
        .unwrap_or("")
}
