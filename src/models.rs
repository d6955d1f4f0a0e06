use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::flexible_date;

pub type BeltId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Adult,
    Kids,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Adult => f.pad("adult"),
            Track::Kids => f.pad("kids"),
        }
    }
}

/// A named grade inside one track.
///
/// `rank` is a single sequence shared by both tracks; lookups that mean
/// "the next belt" always filter by `track` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeltRank {
    pub id: BeltId,
    pub name: String,
    pub rank: i32,
    pub track: Track,
    /// Months a student must hold this rank before leaving it (adult track).
    #[serde(default)]
    pub min_time_in_months: Option<u32>,
    #[serde(default)]
    pub min_age: Option<u32>,
    #[serde(default)]
    pub max_age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: String,
    pub academy_id: Uuid,
    pub belt_id: BeltId,
    #[serde(default)]
    pub stripes: u8,
    #[serde(default, with = "flexible_date::option")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date::option")]
    pub first_graduation_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date::option")]
    pub last_promotion_date: Option<NaiveDate>,
}

impl Student {
    /// Full name, or the id when the roster has no name for this student.
    pub fn display_name(&self) -> String {
        if self.full_name.is_empty() {
            self.id.to_string()
        } else {
            self.full_name.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[serde(alias = "presente")]
    Present,
    #[serde(alias = "ausente")]
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub student_id: Uuid,
    pub schedule_id: Uuid,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Outcome of one evaluation. `reason` is shown to administrators as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub next_belt: Option<BeltRank>,
    pub reason: String,
}

impl EligibilityVerdict {
    pub fn eligible(next_belt: BeltRank, reason: impl Into<String>) -> Self {
        Self {
            eligible: true,
            next_belt: Some(next_belt),
            reason: reason.into(),
        }
    }

    pub fn blocked(next_belt: Option<BeltRank>, reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            next_belt,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibleEntry {
    pub student: Student,
    pub current_belt: BeltRank,
    pub next_belt: BeltRank,
    pub reason: String,
}
