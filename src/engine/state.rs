use crate::model::{Preference, PreferenceKind, Worker, WorkerId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Accumulateur mensuel d'un agent, reconstruit à chaque répartition
/// et jeté ensuite ; aucune identité entre deux exécutions.
#[derive(Debug, Clone)]
pub struct WorkerMonth {
    pub worker: Worker,
    /// Heures dues sur le mois (identiques pour tous les agents d'une exécution).
    pub required_hours: i32,
    /// Heures déjà actées avant la fenêtre d'exécution.
    pub done_hours: i32,
    /// Heures décidées pendant cette exécution (ne décroît jamais).
    pub plan_hours: i32,
    /// Nombre de souhaits Rest dans la fenêtre ; signal d'équité.
    pub rest_score: u32,
    /// Souhait par jour du mois (au plus un, garanti en amont).
    pub preference_by_day: HashMap<u32, Preference>,
    /// Jours interdits, avec la raison (`after all_day`, `last_month_all_day`).
    pub force_rest: HashMap<u32, String>,
    /// Jours du mois déjà en garde.
    pub all_day: BTreeSet<u32>,
    /// Jours du mois déjà en vacation.
    pub work8h: BTreeSet<u32>,
}

impl WorkerMonth {
    pub(crate) fn new(worker: Worker) -> Self {
        Self {
            worker,
            required_hours: 0,
            done_hours: 0,
            plan_hours: 0,
            rest_score: 0,
            preference_by_day: HashMap::new(),
            force_rest: HashMap::new(),
            all_day: BTreeSet::new(),
            work8h: BTreeSet::new(),
        }
    }

    /// Heures restant à planifier ; négatif en cas de dépassement.
    pub fn left_hours(&self) -> i32 {
        self.required_hours - self.done_hours - self.plan_hours
    }

    pub fn desire_for(&self, day: u32) -> Option<PreferenceKind> {
        self.preference_by_day.get(&day).map(|p| p.kind)
    }

    pub fn is_forced_rest(&self, day: u32) -> bool {
        self.force_rest.contains_key(&day)
    }
}

/// Arène des états mensuels, indexée par id d'agent. L'ordre des clés fixe
/// l'ordre de parcours des candidats (déterminisme hors tirages explicites).
pub type WorkerArena = BTreeMap<WorkerId, WorkerMonth>;
