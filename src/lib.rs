#![forbid(unsafe_code)]
//! garde-veto — moteur de planification des astreintes d'une clinique
//! vétérinaire (contraintes + équilibrage, sans base de données).
//!
//! - Résolution par recherche exhaustive (backtracking) sur une table de
//!   règles déclarative, avec relance aléatoire parallèle en cas de
//!   dépassement du budget temps.
//! - Historique persisté en JSON, écriture atomique (fichier temporaire +
//!   fsync + rename).
//! - Import de trombinoscope CSV ou JSON.
//! - Tout en dates locales (pas de fuseau horaire, le domaine n'en a pas
//!   besoin) ; persistance en JSON.

pub mod calendar;
pub mod config;
pub mod history;
#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod roster;
pub mod scheduler;

pub use calendar::{Calendar, Weekend, WorkWeek};
pub use config::{Constraints, EngineConfig};
pub use history::{fold_schedule, History, HistoryStore, JsonHistoryStore, PeriodStats};
pub use model::{
    DayClass, DaySchedule, EngineError, EngineResult, Group, HistoryCounters, Role, Tag, VetId,
};
pub use roster::{RawVet, Roster, VetRecord};
pub use scheduler::{
    BalanceWarning, DiagnosticReport, Engine, RuleId, SolveOutcome, SolveStatus, SolverOptions,
    Violation,
};
