use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiant fort pour Worker (entier stable fourni par l'annuaire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(i64);

impl WorkerId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rôle (repris de l'annuaire ; sans effet sur la répartition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Member,
}

/// Agent éligible aux gardes et vacations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub handle: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl Worker {
    pub fn new<H: Into<String>, F: Into<String>, L: Into<String>>(
        id: i64,
        handle: H,
        first_name: F,
        last_name: L,
    ) -> Self {
        Self {
            id: WorkerId::new(id),
            handle: handle.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: Role::Member,
        }
    }
}

/// Dérogation au calendrier par défaut (week-end = repos)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarOverride {
    pub date: NaiveDate,
    pub is_work_day: bool,
}

/// Type de souhait exprimé par un agent pour une date donnée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferenceKind {
    Rest,
    Work,
    AllDay,
}

/// Souhait (consultatif ; au plus un par (date, agent))
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub date: NaiveDate,
    pub worker: WorkerId,
    pub kind: PreferenceKind,
    #[serde(default)]
    pub comment: String,
}

/// Type d'affectation actée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentKind {
    Work,
    AllDay,
}

/// Affectation actée : au plus une par (date, agent),
/// au plus une AllDay par date tous agents confondus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub date: NaiveDate,
    pub worker: WorkerId,
    pub kind: AssignmentKind,
    #[serde(default)]
    pub comment: String,
}

/// Jeu de données complet (annuaire, calendrier, souhaits, affectations)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningData {
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub overrides: Vec<CalendarOverride>,
    #[serde(default)]
    pub preferences: Vec<Preference>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl PlanningData {
    pub fn find_worker_by_handle<'a>(&'a self, handle: &str) -> Option<&'a Worker> {
        self.workers.iter().find(|w| w.handle == handle)
    }
    pub fn find_worker_by_id<'a>(&'a self, id: WorkerId) -> Option<&'a Worker> {
        self.workers.iter().find(|w| w.id == id)
    }
    pub fn assignment_for(&self, date: NaiveDate, worker: WorkerId) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.date == date && a.worker == worker)
    }
    pub fn preference_for(&self, date: NaiveDate, worker: WorkerId) -> Option<&Preference> {
        self.preferences
            .iter()
            .find(|p| p.date == date && p.worker == worker)
    }
}
