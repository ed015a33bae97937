use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifiant stable d'un vétérinaire (son handle, pas un id généré).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VetId(String);

impl VetId {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VetId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Rôle tenu par un vétérinaire un jour donné.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    Primary,
    Backup,
    Secondary,
}

/// Classe d'un jour dans le calendrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DayClass {
    Weekday,
    Weekend,
}

/// Tag comportemental attaché à un vétérinaire ; pilote les exceptions
/// de §4.E.8/E.14 du cahier des charges sans jamais référencer une
/// identité en dur dans le compilateur de contraintes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tag {
    NeverPrimary,
    NeverSecondary,
    NeverWeekend,
    NeverOnMonday,
    EveOfRestAllowed,
    WeekendDespiteMondayRest,
    RestrictedBackup,
    OnceWeeklyBackup,
    ExcludedFromPairing,
    ExcludedFromBalance,
}

/// Partition statique utilisée uniquement par la règle de compatibilité
/// de binôme (E.14).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    A,
    B,
    None,
}

/// Un jour du planning produit en sortie du solveur.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub weekday: DayClass,
    pub primary: Option<VetId>,
    pub backup: Option<VetId>,
    pub secondary: Option<VetId>,
}

/// Compteurs persistés d'un vétérinaire, pliés depuis l'historique (§4.C).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryCounters {
    pub primary_weekday_ct: u32,
    pub primary_weekend_day_ct: u32,
    pub backup_weekday_ct: u32,
    pub secondary_weekend_day_ct: u32,
}

impl HistoryCounters {
    /// `primary_total` tel qu'utilisé par l'enveloppe d'équilibrage E.11.
    pub fn primary_total(&self) -> u32 {
        self.primary_weekday_ct + self.primary_weekend_day_ct
    }

    fn add_assign(&mut self, other: &HistoryCounters) {
        self.primary_weekday_ct += other.primary_weekday_ct;
        self.primary_weekend_day_ct += other.primary_weekend_day_ct;
        self.backup_weekday_ct += other.backup_weekday_ct;
        self.secondary_weekend_day_ct += other.secondary_weekend_day_ct;
    }
}

impl std::iter::Sum for HistoryCounters {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let mut out = HistoryCounters::default();
        for item in iter {
            out.add_assign(&item);
        }
        out
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid horizon: {0}")]
    InvalidHorizon(&'static str),
    #[error("invalid roster: {0}")]
    InvalidRoster(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("no feasible schedule exists for this roster and horizon")]
    Infeasible,
    #[error("solver time budget exhausted without a feasible schedule")]
    Timeout,
    #[error("history store I/O failed: {0}")]
    HistoryIo(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
