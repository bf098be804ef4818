//! Moteur de répartition mensuelle : une exécution = un instantané des
//! collaborateurs externes (`prepare`), puis un calcul glouton en une
//! passe (`run`) qui produit un `DistributionResult` à committer par
//! l'appelant. Aucune relecture externe en cours de calcul.

mod fill;
mod funnels;
mod state;
mod types;

pub use state::{WorkerArena, WorkerMonth};
pub use types::{Decision, DistributionResult, PlanError};

use types::Phase;

use crate::calendar::{self, RestCalendar};
use crate::hours::hours_for;
use crate::model::{AssignmentKind, PreferenceKind, WorkerId};
use crate::store::PlanningSource;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

/// Une répartition pour le reste du mois contenant `current`.
///
/// Machine à états : `Created → Prepared → Done`, via `prepare` puis `run`,
/// chacun appelable une seule fois. La source d'aléa est injectée pour que
/// les départages aléatoires soient rejouables en test.
pub struct Distribution<R: Rng = StdRng> {
    current: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
    rng: R,
    phase: Phase,
    arena: WorkerArena,
    calendar: RestCalendar,
    /// Jours de la fenêtre, mélangés une fois par exécution : l'ordre
    /// décide qui est servi en premier et départage les jours ex æquo.
    days: Vec<NaiveDate>,
    committed_all_day: BTreeMap<u32, WorkerId>,
    committed_work8h: BTreeMap<u32, Vec<WorkerId>>,
    result: DistributionResult,
}

impl Distribution<StdRng> {
    /// Répartition rejouable : même graine, mêmes données, même résultat.
    pub fn seeded(current: NaiveDate, seed: u64) -> Self {
        Self::with_rng(current, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(current: NaiveDate) -> Self {
        Self::with_rng(current, StdRng::from_entropy())
    }
}

impl<R: Rng> Distribution<R> {
    pub fn with_rng(current: NaiveDate, rng: R) -> Self {
        Self {
            current,
            start: calendar::month_start(current),
            end: calendar::month_end(current),
            rng,
            phase: Phase::Created,
            arena: WorkerArena::new(),
            calendar: RestCalendar::default(),
            days: Vec::new(),
            committed_all_day: BTreeMap::new(),
            committed_work8h: BTreeMap::new(),
            result: DistributionResult::default(),
        }
    }

    /// Fenêtre d'exécution `[current, fin de mois)`.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.current, self.end)
    }

    pub fn result(&self) -> &DistributionResult {
        &self.result
    }

    pub fn into_result(self) -> DistributionResult {
        self.result
    }

    /// État mensuel d'un agent (disponible après `prepare`).
    pub fn worker_state(&self, id: WorkerId) -> Option<&WorkerMonth> {
        self.arena.get(&id)
    }

    /// Charge l'instantané : annuaire, calendrier, heures déjà actées,
    /// souhaits, règle de continuité inter-mois.
    pub fn prepare(&mut self, source: &dyn PlanningSource) -> Result<(), PlanError> {
        if self.phase != Phase::Created {
            return Err(PlanError::AlreadyPrepared);
        }

        for worker in source.workers()? {
            self.arena.insert(worker.id, WorkerMonth::new(worker));
        }
        self.calendar =
            RestCalendar::from_overrides(source.calendar_overrides(self.start, self.end)?);

        let required = self.calendar.required_hours_for_month(self.current);
        for month in self.arena.values_mut() {
            month.required_hours = required;
        }

        // Heures déjà actées entre le 1er du mois et aujourd'hui.
        for assignment in source.assignments_between(self.start, self.current)? {
            let is_rest = self.calendar.is_rest_day(assignment.date);
            let month = self
                .arena
                .get_mut(&assignment.worker)
                .ok_or(PlanError::UnknownWorker(assignment.worker))?;
            month.done_hours += hours_for(assignment.kind, is_rest);
            if assignment.kind == AssignmentKind::AllDay {
                month.all_day.insert(assignment.date.day());
            }
        }

        // Souhaits sur la fenêtre ; un souhait Rest crédite le rest_score.
        for preference in source.preferences_between(self.current, self.end)? {
            let day = preference.date.day();
            let month = self
                .arena
                .get_mut(&preference.worker)
                .ok_or(PlanError::UnknownWorker(preference.worker))?;
            if preference.kind == PreferenceKind::Rest {
                month.rest_score += 1;
            }
            if let Some(previous) = month.preference_by_day.insert(day, preference) {
                return Err(PlanError::DuplicatePreference {
                    worker: previous.worker,
                    date: previous.date,
                });
            }
        }

        // Continuité : une garde la veille de la fenêtre impose le repos
        // sur son premier jour, même à cheval sur deux mois.
        let eve = calendar::previous_day(self.current);
        if let Some(holder) = source.all_day_holder(eve)? {
            let month = self
                .arena
                .get_mut(&holder)
                .ok_or(PlanError::UnknownWorker(holder))?;
            month
                .force_rest
                .insert(self.current.day(), "last_month_all_day".to_string());
        }

        // Instantané des affectations déjà actées dans la fenêtre,
        // rejouées au début de `run`.
        for assignment in source.assignments_between(self.current, self.end)? {
            if !self.arena.contains_key(&assignment.worker) {
                return Err(PlanError::UnknownWorker(assignment.worker));
            }
            let day = assignment.date.day();
            match assignment.kind {
                AssignmentKind::AllDay => {
                    self.committed_all_day.insert(day, assignment.worker);
                }
                AssignmentKind::Work => {
                    self.committed_work8h
                        .entry(day)
                        .or_default()
                        .push(assignment.worker);
                }
            }
        }

        self.days = calendar::days(self.current, self.end).collect();
        self.days.shuffle(&mut self.rng);

        debug!(
            workers = self.arena.len(),
            required_hours = required,
            window_days = self.days.len(),
            "distribution prepared"
        );
        self.phase = Phase::Prepared;
        Ok(())
    }

    /// Rejoue l'acté, pourvoit les gardes, puis comble les vacations.
    pub fn run(&mut self) -> Result<&DistributionResult, PlanError> {
        match self.phase {
            Phase::Created => return Err(PlanError::NotPrepared),
            Phase::Done => return Err(PlanError::AlreadyRan),
            Phase::Prepared => {}
        }

        // Rejeu de l'acté via les mêmes routines que les décisions
        // nouvelles : totaux et repos forcés reflètent la réalité commise.
        let mut excluded_days = Vec::new();
        for (day, worker) in self.committed_all_day.clone() {
            self.apply_all_day(day, worker);
            excluded_days.push(day);
        }
        for (day, workers) in self.committed_work8h.clone() {
            for worker in workers {
                self.apply_work(day, worker);
            }
        }

        fill::fill_all_day(self, &excluded_days);
        fill::fill_work8h(self);

        debug!(
            all_day = self.result.all_day.len(),
            work8h_days = self.result.work8h.len(),
            errors = self.result.errors.len(),
            "distribution done"
        );
        self.phase = Phase::Done;
        Ok(&self.result)
    }

    fn date_of(&self, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start.year(), self.start.month(), day)
            .expect("day comes from the run window")
    }

    fn is_rest_day(&self, day: u32) -> bool {
        self.calendar.is_rest_day(self.date_of(day))
    }

    /// Pose une garde : heures planifiées, jour marqué, lendemain au repos.
    /// La clé `day + 1` peut sortir du mois ; elle reste alors inerte.
    fn apply_all_day(&mut self, day: u32, worker: WorkerId) {
        let is_rest = self.is_rest_day(day);
        let month = self
            .arena
            .get_mut(&worker)
            .expect("applied worker is in the arena");
        month
            .force_rest
            .insert(day + 1, "after all_day".to_string());
        month.plan_hours += hours_for(AssignmentKind::AllDay, is_rest);
        month.all_day.insert(day);
    }

    /// Pose une vacation de 8 h.
    fn apply_work(&mut self, day: u32, worker: WorkerId) {
        let is_rest = self.is_rest_day(day);
        let month = self
            .arena
            .get_mut(&worker)
            .expect("applied worker is in the arena");
        month.plan_hours += hours_for(AssignmentKind::Work, is_rest);
        month.work8h.insert(day);
    }
}
