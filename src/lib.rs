//! Belt graduation engine for martial-arts academies.
//!
//! Decides, from a read-only snapshot of belts, students and attendance,
//! which students may move to their next belt, and builds the promoted
//! student record once an administrator accepts the decision. Storage and
//! presentation belong to the caller.

pub mod calendar;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod ledger;
pub mod models;
pub mod promotion;
pub mod report;
pub mod snapshot;

pub use eligibility::{evaluate, evaluate_all};
pub use error::GraduationError;
pub use ledger::BeltLedger;
pub use models::{AttendanceRecord, AttendanceStatus, BeltRank, EligibilityVerdict, Student, Track};
pub use promotion::apply_promotion;
pub use report::group_eligible_by_target_rank;
