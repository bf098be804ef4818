#![forbid(unsafe_code)]
//! Garde — répartition mensuelle de gardes 24 h et vacations 8 h, locale (sans BD).
//!
//! - Stockage fichiers (JSON/CSV).
//! - Moteur glouton en une passe : entonnoirs de candidats successifs,
//!   équité par score de repos et nombre de gardes, aléa injectable.
//! - Échecs par jour consignés dans le résultat, jamais fatals ;
//!   le commit du résultat reste à la main de l'appelant.

pub mod calendar;
pub mod engine;
pub mod hours;
pub mod io;
pub mod model;
pub mod storage;
pub mod store;

pub use calendar::RestCalendar;
pub use engine::{Decision, Distribution, DistributionResult, PlanError, WorkerMonth};
pub use model::{
    Assignment, AssignmentKind, CalendarOverride, PlanningData, Preference, PreferenceKind, Role,
    Worker, WorkerId,
};
pub use storage::{JsonStorage, Storage};
pub use store::PlanningSource;
