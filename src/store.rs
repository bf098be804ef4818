//! Collaborateurs externes du moteur : lecture seule via `PlanningSource`,
//! écritures (dérogations, souhaits, affectations, commit d'un résultat)
//! portées par `PlanningData`.

use crate::calendar;
use crate::engine::DistributionResult;
use crate::model::{
    Assignment, AssignmentKind, CalendarOverride, PlanningData, Preference, PreferenceKind,
    Worker, WorkerId,
};
use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};

/// Accès en lecture aux magasins que le moteur consulte pendant `prepare`.
/// Les bornes de dates sont `[from, to)`.
pub trait PlanningSource {
    fn workers(&self) -> Result<Vec<Worker>>;
    fn calendar_overrides(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<CalendarOverride>>;
    fn preferences_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Preference>>;
    fn assignments_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Assignment>>;
    /// Détenteur de la garde du jour, s'il existe.
    fn all_day_holder(&self, date: NaiveDate) -> Result<Option<WorkerId>>;
}

impl PlanningSource for PlanningData {
    fn workers(&self) -> Result<Vec<Worker>> {
        Ok(self.workers.clone())
    }

    fn calendar_overrides(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<CalendarOverride>> {
        Ok(self
            .overrides
            .iter()
            .filter(|o| o.date >= from && o.date < to)
            .copied()
            .collect())
    }

    fn preferences_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Preference>> {
        Ok(self
            .preferences
            .iter()
            .filter(|p| p.date >= from && p.date < to)
            .cloned()
            .collect())
    }

    fn assignments_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Assignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.date >= from && a.date < to)
            .cloned()
            .collect())
    }

    fn all_day_holder(&self, date: NaiveDate) -> Result<Option<WorkerId>> {
        Ok(self.holder_of_all_day(date))
    }
}

impl PlanningData {
    /// Détenteur de la garde du jour (au plus un, par invariant).
    pub fn holder_of_all_day(&self, date: NaiveDate) -> Option<WorkerId> {
        self.assignments
            .iter()
            .find(|a| a.date == date && a.kind == AssignmentKind::AllDay)
            .map(|a| a.worker)
    }

    /// Pose ou retire une dérogation calendrier. Une dérogation qui répète
    /// la règle par défaut (week-end = repos) supprime la ligne.
    pub fn set_override(&mut self, date: NaiveDate, is_work_day: bool) {
        self.overrides.retain(|o| o.date != date);
        if (!is_work_day) != calendar::is_weekend(date) {
            self.overrides.push(CalendarOverride { date, is_work_day });
        }
    }

    /// Pose (`Some`) ou retire (`None`) le souhait d'un agent pour une date.
    pub fn set_preference(
        &mut self,
        date: NaiveDate,
        worker: WorkerId,
        kind: Option<PreferenceKind>,
        comment: &str,
    ) -> Result<()> {
        if self.find_worker_by_id(worker).is_none() {
            bail!("unknown worker id: {worker}");
        }
        self.preferences
            .retain(|p| !(p.date == date && p.worker == worker));
        if let Some(kind) = kind {
            self.preferences.push(Preference {
                date,
                worker,
                kind,
                comment: comment.to_string(),
            });
        }
        Ok(())
    }

    /// Pose (`Some`) ou retire (`None`) une affectation. Refuse une garde
    /// si un autre agent détient déjà celle de la date.
    pub fn set_assignment(
        &mut self,
        date: NaiveDate,
        worker: WorkerId,
        kind: Option<AssignmentKind>,
        comment: &str,
    ) -> Result<()> {
        if self.find_worker_by_id(worker).is_none() {
            bail!("unknown worker id: {worker}");
        }
        if kind == Some(AssignmentKind::AllDay) {
            if let Some(holder) = self.holder_of_all_day(date) {
                if holder != worker {
                    bail!(
                        "{date}: cannot set all_day for worker {worker}, \
                         worker {holder} already holds it"
                    );
                }
            }
        }
        self.assignments
            .retain(|a| !(a.date == date && a.worker == worker));
        if let Some(kind) = kind {
            self.assignments.push(Assignment {
                date,
                worker,
                kind,
                comment: comment.to_string(),
            });
        }
        Ok(())
    }

    /// Commit d'un résultat de répartition dans le mois contenant `month` :
    /// un upsert par décision, en miroir de l'unicité du magasin.
    pub fn commit(&mut self, result: &DistributionResult, month: NaiveDate) -> Result<()> {
        let start = calendar::month_start(month);
        let date_of = |day: u32| -> Result<NaiveDate> {
            match NaiveDate::from_ymd_opt(start.year(), start.month(), day) {
                Some(date) => Ok(date),
                None => bail!("day {day} does not exist in month {start}"),
            }
        };
        for (day, decision) in &result.all_day {
            self.set_assignment(
                date_of(*day)?,
                decision.worker,
                Some(AssignmentKind::AllDay),
                "auto",
            )?;
        }
        for (day, decisions) in &result.work8h {
            for decision in decisions {
                self.set_assignment(
                    date_of(*day)?,
                    decision.worker,
                    Some(AssignmentKind::Work),
                    "auto",
                )?;
            }
        }
        Ok(())
    }
}
