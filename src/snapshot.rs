use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::ledger::BeltLedger;
use crate::models::{AttendanceRecord, BeltRank, Student};

/// Everything one evaluation pass reads. Treated as immutable for the pass.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub ledger: BeltLedger,
    pub students: Vec<Student>,
    pub attendance: Vec<AttendanceRecord>,
}

impl Snapshot {
    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let belts: Vec<BeltRank> = read_table(&locate(data_dir, "belts")?)?;
        let students: Vec<Student> = read_table(&locate(data_dir, "students")?)?;
        let attendance: Vec<AttendanceRecord> = read_table(&locate(data_dir, "attendance")?)?;

        let ledger = BeltLedger::new(belts);
        for issue in ledger.validate() {
            warn!(%issue, "belt ledger integrity issue");
        }

        info!(
            data_dir = %data_dir.display(),
            belts = ledger.len(),
            students = students.len(),
            attendance = attendance.len(),
            "snapshot loaded"
        );

        Ok(Self {
            ledger,
            students,
            attendance,
        })
    }

    pub fn find_student(&self, id: uuid::Uuid) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }
}

/// Resolves `<name>.csv`, falling back to `<name>.json`.
fn locate(data_dir: &Path, name: &str) -> anyhow::Result<PathBuf> {
    let csv_path = data_dir.join(format!("{name}.csv"));
    if csv_path.is_file() {
        return Ok(csv_path);
    }
    let json_path = data_dir.join(format!("{name}.json"));
    if json_path.is_file() {
        return Ok(json_path);
    }
    anyhow::bail!(
        "no {name}.csv or {name}.json found in {}",
        data_dir.display()
    )
}

pub fn read_table<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("invalid JSON in {}", path.display()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();

    for (index, result) in reader.deserialize::<T>().enumerate() {
        let row = result.with_context(|| format!("{}: invalid row {}", path.display(), index + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Writes records as pretty JSON to `out`, or to stdout when `out` is `None`.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
