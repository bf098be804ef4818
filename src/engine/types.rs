use crate::model::WorkerId;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Choix retenu pour un jour, avec les modificateurs qui l'ont produit
/// (`by_desire:retenus/total`, `by_rest_score:retenus/total`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub worker: WorkerId,
    pub reasons: Vec<String>,
}

/// Résultat d'une répartition, indexé par jour du mois.
///
/// Ne contient que les décisions nouvelles : les affectations déjà actées
/// sont rejouées dans l'état interne mais jamais reproposées au commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionResult {
    /// Garde 24 h retenue pour chaque jour couvert.
    pub all_day: BTreeMap<u32, Decision>,
    /// Vacations 8 h ajoutées, dans l'ordre où elles ont été décidées.
    pub work8h: BTreeMap<u32, Vec<Decision>>,
    /// Jours dont la garde n'a pas pu être pourvue (non fatal).
    pub errors: BTreeMap<u32, String>,
    /// Diagnostic de fin de passe vacations, le cas échéant.
    pub notice: Option<String>,
}

/// Violations de contrat et pannes de collaborateurs ; les échecs
/// récupérables passent par `DistributionResult`, jamais par ici.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("prepare must be called before run")]
    NotPrepared,
    #[error("prepare already called")]
    AlreadyPrepared,
    #[error("run already called")]
    AlreadyRan,
    #[error("unknown worker id: {0}")]
    UnknownWorker(WorkerId),
    #[error("duplicate preference for worker {worker} on {date}")]
    DuplicatePreference { worker: WorkerId, date: NaiveDate },
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

/// Étapes de la machine à états de `Distribution`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Phase {
    Created,
    Prepared,
    Done,
}
