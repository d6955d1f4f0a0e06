use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::eligibility;
use crate::ledger::BeltLedger;
use crate::models::{AttendanceRecord, EligibleEntry, Student};

pub type EligibleGroups = BTreeMap<String, Vec<EligibleEntry>>;

/// Eligible students grouped by the name of the belt they would receive.
pub fn group_eligible_by_target_rank(
    students: &[Student],
    ledger: &BeltLedger,
    attendance: &[AttendanceRecord],
    as_of: NaiveDate,
) -> EligibleGroups {
    let mut by_student: HashMap<Uuid, Vec<AttendanceRecord>> = HashMap::new();
    for record in attendance {
        by_student
            .entry(record.student_id)
            .or_default()
            .push(record.clone());
    }

    let mut groups = EligibleGroups::new();
    for student in students {
        let records = by_student
            .get(&student.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let verdict = eligibility::evaluate(student, ledger, records, as_of);
        if !verdict.eligible {
            continue;
        }

        let (Some(current_belt), Some(next_belt)) =
            (ledger.find(student.belt_id), verdict.next_belt)
        else {
            continue;
        };

        groups
            .entry(next_belt.name.clone())
            .or_default()
            .push(EligibleEntry {
                student: student.clone(),
                current_belt: current_belt.clone(),
                next_belt,
                reason: verdict.reason,
            });
    }

    groups
}

pub fn eligible_count(groups: &EligibleGroups) -> usize {
    groups.values().map(Vec::len).sum()
}

pub fn build_report(
    academy: Option<&str>,
    as_of: NaiveDate,
    groups: &EligibleGroups,
    evaluated: usize,
) -> String {
    let mut output = String::new();
    let academy_label = academy.unwrap_or("all academies");

    let _ = writeln!(output, "# Graduation Review");
    let _ = writeln!(
        output,
        "Generated for {} (as of {})",
        academy_label, as_of
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{} of {} students eligible for promotion.",
        eligible_count(groups),
        evaluated
    );

    if groups.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "No students are ready for their next belt.");
        return output;
    }

    let mut sections: Vec<(&String, &Vec<EligibleEntry>)> = groups.iter().collect();
    sections.sort_by_key(|(_, entries)| {
        entries
            .iter()
            .map(|entry| entry.next_belt.rank)
            .min()
            .unwrap_or(i32::MAX)
    });

    for (belt_name, entries) in sections {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {} ({})", belt_name, entries.len());

        let mut entries: Vec<&EligibleEntry> = entries.iter().collect();
        entries.sort_by(|a, b| a.student.full_name.cmp(&b.student.full_name));
        for entry in entries {
            let _ = writeln!(
                output,
                "- {} ({} {}, {} stripes): {}",
                entry.student.display_name(),
                entry.current_belt.name,
                entry.current_belt.track,
                entry.student.stripes,
                entry.reason
            );
        }
    }

    output
}
