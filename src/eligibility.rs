use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::calendar::{age_of, anchor_date, months_since};
use crate::error::{GraduationError, Result};
use crate::ledger::{BeltLedger, ADULT_TRACK_AGE};
use crate::models::{
    AttendanceRecord, AttendanceStatus, BeltRank, EligibilityVerdict, Student, Track,
};

/// Attendance must be strictly above this percentage on the adult track.
pub const MIN_FREQUENCY_PERCENT: u64 = 70;

const KIDS_TRANSITION_BELT: &str = "Verde";
const ADULT_TRANSITION_TARGET: &str = "Azul";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RankGate {
    stripes: u8,
    months: i32,
}

/// Stripes and months required to leave an adult rank.
fn adult_gate(current: &BeltRank) -> RankGate {
    match current.name.as_str() {
        "Preta" => RankGate {
            stripes: 6,
            months: 84,
        },
        "Coral" => RankGate {
            stripes: 8,
            months: 120,
        },
        _ => RankGate {
            stripes: 4,
            months: current.min_time_in_months.unwrap_or(0) as i32,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttendanceSummary {
    pub present: u64,
    pub total: u64,
}

impl AttendanceSummary {
    /// Percentage of sessions attended; zero when nothing was recorded.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.present as f64 / self.total as f64 * 100.0
        }
    }

    pub fn exceeds(&self, threshold_percent: u64) -> bool {
        self.total > 0 && self.present * 100 > threshold_percent * self.total
    }
}

/// Counts a student's attendance on or after `since`.
pub fn attendance_frequency(
    student_id: Uuid,
    records: &[AttendanceRecord],
    since: NaiveDate,
) -> AttendanceSummary {
    records
        .iter()
        .filter(|record| record.student_id == student_id && record.date >= since)
        .fold(AttendanceSummary::default(), |mut summary, record| {
            summary.total += 1;
            if record.status == AttendanceStatus::Present {
                summary.present += 1;
            }
            summary
        })
}

/// Decides whether `student` may be promoted as of `as_of`.
///
/// Never fails: integrity problems in the snapshot come back as an ineligible
/// verdict whose reason names the missing data.
pub fn evaluate(
    student: &Student,
    ledger: &BeltLedger,
    attendance: &[AttendanceRecord],
    as_of: NaiveDate,
) -> EligibilityVerdict {
    let verdict = match try_evaluate(student, ledger, attendance, as_of) {
        Ok(verdict) => verdict,
        Err(err) => {
            warn!(student_id = %student.id, error = %err, "student record failed integrity check");
            EligibilityVerdict::blocked(None, err.to_string())
        }
    };

    debug!(
        student_id = %student.id,
        eligible = verdict.eligible,
        next_belt = verdict.next_belt.as_ref().map(|belt| belt.name.as_str()),
        "evaluated graduation eligibility"
    );
    verdict
}

/// Evaluates every student, preserving input order.
pub fn evaluate_all<'a>(
    students: &'a [Student],
    ledger: &BeltLedger,
    attendance: &[AttendanceRecord],
    as_of: NaiveDate,
) -> Vec<(&'a Student, EligibilityVerdict)> {
    students
        .iter()
        .map(|student| (student, evaluate(student, ledger, attendance, as_of)))
        .collect()
}

fn try_evaluate(
    student: &Student,
    ledger: &BeltLedger,
    attendance: &[AttendanceRecord],
    as_of: NaiveDate,
) -> Result<EligibilityVerdict> {
    let current = ledger.find(student.belt_id).ok_or_else(|| {
        GraduationError::DataIntegrity(format!(
            "Faixa atual não encontrada (id {})",
            student.belt_id
        ))
    })?;
    let age = student.birth_date.map(|birth| age_of(birth, as_of));

    if current.track == Track::Kids && current.name.contains(KIDS_TRANSITION_BELT) {
        if let Some(age) = age.filter(|age| *age >= ADULT_TRACK_AGE) {
            return kids_to_adult(ledger, age);
        }
    }

    let Some(next) = ledger.next_rank_in_track(current) else {
        return Ok(EligibilityVerdict::blocked(
            None,
            format!("Graduação máxima atingida na faixa {}", current.name),
        ));
    };

    match current.track {
        Track::Kids => evaluate_kids(student, next, age, as_of),
        Track::Adult => evaluate_adult(student, current, next, attendance, as_of),
    }
}

fn kids_to_adult(ledger: &BeltLedger, age: i32) -> Result<EligibilityVerdict> {
    let target = ledger
        .find_in_track_by_name(Track::Adult, ADULT_TRANSITION_TARGET)
        .ok_or_else(|| {
            GraduationError::DataIntegrity(format!(
                "Faixa adulta {ADULT_TRANSITION_TARGET} não cadastrada"
            ))
        })?;

    Ok(EligibilityVerdict::eligible(
        target.clone(),
        format!(
            "{age} anos: transição da faixa infantil para a faixa {} adulta",
            target.name
        ),
    ))
}

fn evaluate_kids(
    student: &Student,
    next: &BeltRank,
    age: Option<i32>,
    as_of: NaiveDate,
) -> Result<EligibilityVerdict> {
    let age = age.ok_or_else(|| {
        GraduationError::DataIntegrity("Data de nascimento não registrada".to_string())
    })?;
    let anchor = anchor_date(student).ok_or_else(|| {
        GraduationError::DataIntegrity("Data de graduação não registrada".to_string())
    })?;

    let Some(min_age) = next.min_age else {
        return Ok(EligibilityVerdict::blocked(
            Some(next.clone()),
            format!("Faixa {} sem idade mínima cadastrada", next.name),
        ));
    };
    if age < min_age as i32 {
        return Ok(EligibilityVerdict::blocked(
            Some(next.clone()),
            format!(
                "Idade atual: {age} anos; a faixa {} exige {min_age} anos",
                next.name
            ),
        ));
    }

    let months = months_since(anchor, as_of);
    let required = next.min_time_in_months.unwrap_or(0) as i32;
    if months < required {
        return Ok(EligibilityVerdict::blocked(
            Some(next.clone()),
            format!("{months} meses na faixa atual; são necessários {required} meses"),
        ));
    }

    Ok(EligibilityVerdict::eligible(
        next.clone(),
        format!("{age} anos e {months} meses na faixa atual"),
    ))
}

fn evaluate_adult(
    student: &Student,
    current: &BeltRank,
    next: &BeltRank,
    attendance: &[AttendanceRecord],
    as_of: NaiveDate,
) -> Result<EligibilityVerdict> {
    let anchor = anchor_date(student).ok_or_else(|| {
        GraduationError::DataIntegrity("Data de graduação não registrada".to_string())
    })?;

    let frequency = attendance_frequency(student.id, attendance, anchor);
    let percent = frequency.percent().round();
    if !frequency.exceeds(MIN_FREQUENCY_PERCENT) {
        return Ok(EligibilityVerdict::blocked(
            Some(next.clone()),
            format!(
                "Frequência de {percent}% desde {anchor}; é necessário mais de {MIN_FREQUENCY_PERCENT}%"
            ),
        ));
    }

    let gate = adult_gate(current);
    if student.stripes < gate.stripes {
        return Ok(EligibilityVerdict::blocked(
            Some(next.clone()),
            format!(
                "{} graus na faixa {}; são necessários {} graus",
                student.stripes, current.name, gate.stripes
            ),
        ));
    }

    let months = months_since(anchor, as_of);
    if months < gate.months {
        return Ok(EligibilityVerdict::blocked(
            Some(next.clone()),
            format!(
                "{months} meses na faixa {}; são necessários {} meses",
                current.name, gate.months
            ),
        ));
    }

    Ok(EligibilityVerdict::eligible(
        next.clone(),
        format!(
            "Frequência de {percent}%, {} graus e {months} meses na faixa {}",
            student.stripes, current.name
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(student_id: Uuid, on: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            student_id,
            schedule_id: Uuid::nil(),
            date: on,
            status,
        }
    }

    #[test]
    fn frequency_counts_only_the_window_and_the_student() {
        let student_id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let records = vec![
            record(student_id, date(2024, 1, 9), AttendanceStatus::Absent),
            record(student_id, date(2024, 1, 10), AttendanceStatus::Present),
            record(student_id, date(2024, 2, 1), AttendanceStatus::Absent),
            record(other, date(2024, 2, 1), AttendanceStatus::Present),
        ];

        let summary = attendance_frequency(student_id, &records, date(2024, 1, 10));
        assert_eq!(summary, AttendanceSummary { present: 1, total: 2 });
        assert!((summary.percent() - 50.0).abs() < 0.001);
    }

    #[test]
    fn seventy_percent_is_not_enough() {
        let exact = AttendanceSummary { present: 7, total: 10 };
        assert!(!exact.exceeds(MIN_FREQUENCY_PERCENT));

        let above = AttendanceSummary { present: 8, total: 11 };
        assert!(above.exceeds(MIN_FREQUENCY_PERCENT));

        let empty = AttendanceSummary::default();
        assert_eq!(empty.percent(), 0.0);
        assert!(!empty.exceeds(0));
    }

    #[test]
    fn adult_gates_follow_rank_name() {
        let mut belt = BeltRank {
            id: 1,
            name: "Azul".to_string(),
            rank: 2,
            track: Track::Adult,
            min_time_in_months: Some(24),
            min_age: None,
            max_age: None,
        };
        assert_eq!(adult_gate(&belt), RankGate { stripes: 4, months: 24 });

        belt.name = "Preta".to_string();
        assert_eq!(adult_gate(&belt), RankGate { stripes: 6, months: 84 });

        belt.name = "Coral".to_string();
        assert_eq!(adult_gate(&belt), RankGate { stripes: 8, months: 120 });
    }
}
