//! Les deux passes de remplissage : gardes d'abord (deux tours sur l'ordre
//! de jours mélangé), puis vacations en boucle sur le jour le moins chargé.

use super::types::Decision;
use super::{funnels, Distribution};
use chrono::Datelike;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// Pourvoit la garde de chaque jour de la fenêtre non encore actée.
///
/// Tour 1 : seulement les jours où quelqu'un s'est porté volontaire.
/// Tour 2 : les jours restants, sans entonnoir de souhait. Un jour sans
/// candidat éligible est consigné en erreur et n'interrompt rien.
pub(super) fn fill_all_day<R: Rng>(dist: &mut Distribution<R>, excluded_days: &[u32]) {
    let days: Vec<u32> = dist.days.iter().map(|d| d.day()).collect();
    let everyone: Vec<_> = dist.arena.keys().copied().collect();

    let mut deferred = Vec::new();
    for day in days {
        if excluded_days.contains(&day) {
            continue;
        }
        let candidates = funnels::eligible_for_all_day(&dist.arena, &everyone, day);
        let who_desire = funnels::first_desiring_all_day(&dist.arena, &candidates, day);
        if who_desire.is_empty() {
            deferred.push(day);
            continue;
        }

        let mut reasons = vec![format!("by_desire:{}/{}", who_desire.len(), candidates.len())];
        let mut candidates = who_desire;
        let by_rest = funnels::max_rest_score(&dist.arena, &candidates, day);
        if !by_rest.is_empty() {
            if by_rest.len() != candidates.len() {
                reasons.push(format!("by_rest_score:{}/{}", by_rest.len(), candidates.len()));
            }
            candidates = by_rest;
        }
        candidates = funnels::min_all_day_count(&dist.arena, &candidates);
        candidates = funnels::max_left_hours(&dist.arena, &candidates);
        let chosen = *candidates
            .choose(&mut dist.rng)
            .expect("fairness funnels keep at least one candidate");
        dist.result.all_day.insert(day, Decision { worker: chosen, reasons });
        dist.apply_all_day(day, chosen);
    }

    for day in deferred {
        let mut candidates = funnels::eligible_for_all_day(&dist.arena, &everyone, day);
        if candidates.is_empty() {
            dist.result.errors.insert(day, "no user to select".to_string());
            continue;
        }
        let mut reasons = Vec::new();
        candidates = funnels::min_all_day_count(&dist.arena, &candidates);
        let by_rest = funnels::max_rest_score(&dist.arena, &candidates, day);
        if !by_rest.is_empty() {
            if by_rest.len() != candidates.len() {
                reasons.push(format!("by_rest_score:{}/{}", by_rest.len(), candidates.len()));
            }
            candidates = by_rest;
        }
        candidates = funnels::max_left_hours(&dist.arena, &candidates);
        let chosen = *candidates
            .choose(&mut dist.rng)
            .expect("fairness funnels keep at least one candidate");
        dist.result.all_day.insert(day, Decision { worker: chosen, reasons });
        dist.apply_all_day(day, chosen);
    }
}

/// Comble les heures restantes par vacations de 8 h, en visant à chaque
/// itération le jour le moins pourvu en vacations. Un jour sans candidat
/// est ignoré définitivement ; plus aucun jour disponible termine la
/// boucle avec un diagnostic, les agents restants finissent sous leur quota.
pub(super) fn fill_work8h<R: Rng>(dist: &mut Distribution<R>) {
    let everyone: Vec<_> = dist.arena.keys().copied().collect();
    let mut ignored_days = BTreeSet::new();

    loop {
        let left_workers = funnels::with_left_hours(&dist.arena, &everyone);
        if left_workers.is_empty() {
            break;
        }
        let Some(day) = least_loaded_day(dist, &ignored_days) else {
            dist.result.notice = Some(format!(
                "{} worker(s) still short of hours but no day left to fill",
                left_workers.len()
            ));
            break;
        };
        let candidates = funnels::eligible_for_work(&dist.arena, &left_workers, day);
        if candidates.is_empty() {
            debug!(day, "no worker can take this day, ignoring it");
            ignored_days.insert(day);
            continue;
        }

        let mut reasons = Vec::new();
        let who_desire = funnels::first_desiring_work(&dist.arena, &candidates, day);
        let mut candidates = candidates;
        if !who_desire.is_empty() {
            if who_desire.len() != candidates.len() {
                reasons.push(format!("by_desire:{}/{}", who_desire.len(), candidates.len()));
            }
            candidates = who_desire;
        }
        let by_rest = funnels::max_rest_score(&dist.arena, &candidates, day);
        if !by_rest.is_empty() {
            if by_rest.len() != candidates.len() {
                reasons.push(format!("by_rest_score:{}/{}", by_rest.len(), candidates.len()));
            }
            candidates = by_rest;
        }
        candidates = funnels::min_all_day_count(&dist.arena, &candidates);
        let chosen = *candidates
            .choose(&mut dist.rng)
            .expect("fairness funnels keep at least one candidate");
        dist.result
            .work8h
            .entry(day)
            .or_default()
            .push(Decision { worker: chosen, reasons });
        dist.apply_work(day, chosen);
    }
}

/// Jour non ignoré comptant le moins de vacations posées ; les ex æquo
/// reviennent au premier rencontré dans l'ordre mélangé.
fn least_loaded_day<R: Rng>(dist: &Distribution<R>, ignored_days: &BTreeSet<u32>) -> Option<u32> {
    let mut best = None;
    let mut min_count = usize::MAX;
    for date in &dist.days {
        let day = date.day();
        if ignored_days.contains(&day) {
            continue;
        }
        let count = dist
            .arena
            .values()
            .filter(|month| month.work8h.contains(&day))
            .count();
        if count < min_count {
            min_count = count;
            best = Some(day);
        }
    }
    best
}
