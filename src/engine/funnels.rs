//! Entonnoirs de candidats : fonctions pures qui réduisent une liste
//! d'agents selon un critère, appliquées en pipeline. Un résultat vide
//! de `max_rest_score` ou `first_desiring_*` signifie « ne pas resserrer » ;
//! l'appelant garde alors sa liste précédente.

use super::state::WorkerArena;
use crate::model::{PreferenceKind, WorkerId};

/// Agents ayant encore des heures à planifier.
pub(super) fn with_left_hours(arena: &WorkerArena, ids: &[WorkerId]) -> Vec<WorkerId> {
    ids.iter()
        .copied()
        .filter(|id| arena[id].left_hours() > 0)
        .collect()
}

/// Agents pouvant prendre la garde de `day`.
///
/// Pas de filtre sur `left_hours` : le dépassement d'heures est admis
/// pour garantir qu'une garde trouve preneur.
pub(super) fn eligible_for_all_day(
    arena: &WorkerArena,
    ids: &[WorkerId],
    day: u32,
) -> Vec<WorkerId> {
    ids.iter()
        .copied()
        .filter(|id| {
            let w = &arena[id];
            !w.is_forced_rest(day) && !w.all_day.contains(&day) && !w.work8h.contains(&day)
        })
        .collect()
}

/// Agents pouvant prendre une vacation le jour `day`.
pub(super) fn eligible_for_work(arena: &WorkerArena, ids: &[WorkerId], day: u32) -> Vec<WorkerId> {
    ids.iter()
        .copied()
        .filter(|id| {
            let w = &arena[id];
            !w.is_forced_rest(day)
                && !w.work8h.contains(&day)
                && !w.all_day.contains(&day)
                && w.left_hours() > 0
        })
        .collect()
}

/// Premier agent (dans l'ordre d'entrée) dont le souhait du jour est une
/// garde. Au plus un élément : l'arrêt au premier volontaire reproduit le
/// comportement historique, même quand d'autres volontaires suivent.
pub(super) fn first_desiring_all_day(
    arena: &WorkerArena,
    ids: &[WorkerId],
    day: u32,
) -> Vec<WorkerId> {
    first_desiring(arena, ids, day, PreferenceKind::AllDay)
}

/// Idem pour les vacations.
pub(super) fn first_desiring_work(
    arena: &WorkerArena,
    ids: &[WorkerId],
    day: u32,
) -> Vec<WorkerId> {
    first_desiring(arena, ids, day, PreferenceKind::Work)
}

fn first_desiring(
    arena: &WorkerArena,
    ids: &[WorkerId],
    day: u32,
    kind: PreferenceKind,
) -> Vec<WorkerId> {
    ids.iter()
        .copied()
        .filter(|id| !arena[id].is_forced_rest(day))
        .find(|id| arena[id].desire_for(day) == Some(kind))
        .map(|id| vec![id])
        .unwrap_or_default()
}

/// Agents au `rest_score` maximal, moins ceux dont le souhait du jour est
/// Rest. Ces derniers relèvent quand même la barre : un agent qui demande
/// son repos ce jour-là écarte les scores inférieurs sans concourir.
pub(super) fn max_rest_score(arena: &WorkerArena, ids: &[WorkerId], day: u32) -> Vec<WorkerId> {
    let mut max_score = 0;
    let mut out = Vec::new();
    for id in ids {
        let w = &arena[id];
        if w.rest_score < max_score {
            continue;
        }
        if w.rest_score > max_score {
            max_score = w.rest_score;
            out.clear();
        }
        if w.desire_for(day) == Some(PreferenceKind::Rest) {
            continue;
        }
        out.push(*id);
    }
    out
}

/// Agents avec le moins de gardes posées ce mois (égalités conservées).
/// Sert aussi de départage final de la passe vacations : l'équilibrage
/// de la charge de gardes est voulu entre les deux types de créneaux.
pub(super) fn min_all_day_count(arena: &WorkerArena, ids: &[WorkerId]) -> Vec<WorkerId> {
    let mut min_count = usize::MAX;
    let mut out = Vec::new();
    for id in ids {
        let count = arena[id].all_day.len();
        if count > min_count {
            continue;
        }
        if count < min_count {
            min_count = count;
            out.clear();
        }
        out.push(*id);
    }
    out
}

/// Agents avec le plus d'heures restantes (égalités conservées).
pub(super) fn max_left_hours(arena: &WorkerArena, ids: &[WorkerId]) -> Vec<WorkerId> {
    let mut max_left = i32::MIN;
    let mut out = Vec::new();
    for id in ids {
        let left = arena[id].left_hours();
        if left < max_left {
            continue;
        }
        if left > max_left {
            max_left = left;
            out.clear();
        }
        out.push(*id);
    }
    out
}
