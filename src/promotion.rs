use chrono::NaiveDate;
use tracing::info;

use crate::error::{GraduationError, Result};
use crate::models::{EligibilityVerdict, Student};

pub const MAX_STRIPES: u8 = 10;

/// Builds the promoted student record for an accepted verdict.
///
/// The returned value still has to be written back by the caller. Only
/// `belt_id`, `stripes` and `last_promotion_date` differ from the input.
pub fn apply_promotion(
    student: &Student,
    verdict: &EligibilityVerdict,
    promoted_on: NaiveDate,
) -> Result<Student> {
    if !verdict.eligible {
        return Err(GraduationError::InvalidPromotion(format!(
            "student {} is not eligible: {}",
            student.id, verdict.reason
        )));
    }
    let next_belt = verdict.next_belt.as_ref().ok_or_else(|| {
        GraduationError::InvalidPromotion(format!(
            "verdict for student {} has no target belt",
            student.id
        ))
    })?;

    info!(
        student_id = %student.id,
        from_belt = student.belt_id,
        to_belt = next_belt.id,
        "promotion applied"
    );

    Ok(Student {
        belt_id: next_belt.id,
        stripes: 0,
        last_promotion_date: Some(promoted_on),
        ..student.clone()
    })
}

/// Adds one stripe to the current belt.
pub fn award_stripe(student: &Student) -> Result<Student> {
    if student.stripes >= MAX_STRIPES {
        return Err(GraduationError::StripeLimit {
            stripes: MAX_STRIPES,
        });
    }

    Ok(Student {
        stripes: student.stripes + 1,
        ..student.clone()
    })
}
