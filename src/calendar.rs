use crate::model::CalendarOverride;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Premier jour du mois contenant `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 always exists")
}

/// Premier jour du mois suivant (borne exclusive du mois contenant `date`).
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let start = month_start(date);
    let (year, month) = if start.month() == 12 {
        (start.year() + 1, 1)
    } else {
        (start.year(), start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month always valid")
}

/// Itère les jours de `from` (inclus) à `to` (exclu).
pub fn days(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d < to)
}

pub(crate) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Calendrier de repos : dérogations explicites par date,
/// sinon règle par défaut week-end = repos.
#[derive(Debug, Clone, Default)]
pub struct RestCalendar {
    overrides: BTreeMap<NaiveDate, bool>,
}

impl RestCalendar {
    pub fn from_overrides<I: IntoIterator<Item = CalendarOverride>>(overrides: I) -> Self {
        Self {
            overrides: overrides
                .into_iter()
                .map(|o| (o.date, o.is_work_day))
                .collect(),
        }
    }

    /// `true` si la date est un jour de repos (lecture pure, sans effet).
    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        match self.overrides.get(&date) {
            Some(is_work_day) => !is_work_day,
            None => is_weekend(date),
        }
    }

    /// Heures dues sur le mois contenant `date` : 8 h par jour non chômé.
    pub fn required_hours_for_month(&self, date: NaiveDate) -> i32 {
        let start = month_start(date);
        days(start, month_end(date))
            .filter(|d| !self.is_rest_day(*d))
            .count() as i32
            * 8
    }
}

/// La date précédant immédiatement `date` (continuité entre deux mois).
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1))
        .expect("dates here are far from the calendar edge")
}
