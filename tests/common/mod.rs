#![allow(dead_code)]

use academy_graduation::{AttendanceRecord, AttendanceStatus, BeltLedger, BeltRank, Student, Track};
use chrono::NaiveDate;
use uuid::Uuid;

pub const ADULT_BRANCA: i64 = 1;
pub const ADULT_AZUL: i64 = 2;
pub const ADULT_ROXA: i64 = 3;
pub const ADULT_MARROM: i64 = 4;
pub const ADULT_PRETA: i64 = 5;
pub const ADULT_CORAL: i64 = 6;
pub const ADULT_VERMELHA: i64 = 7;
pub const KIDS_BRANCA: i64 = 10;
pub const KIDS_CINZA: i64 = 11;
pub const KIDS_AMARELA: i64 = 12;
pub const KIDS_LARANJA: i64 = 13;
pub const KIDS_VERDE: i64 = 14;
pub const KIDS_VERDE_PRETA: i64 = 15;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn adult(id: i64, name: &str, rank: i32, min_time: Option<u32>) -> BeltRank {
    BeltRank {
        id,
        name: name.to_string(),
        rank,
        track: Track::Adult,
        min_time_in_months: min_time,
        min_age: Some(16),
        max_age: None,
    }
}

fn kids(id: i64, name: &str, rank: i32, min_age: u32, min_time: Option<u32>) -> BeltRank {
    BeltRank {
        id,
        name: name.to_string(),
        rank,
        track: Track::Kids,
        min_time_in_months: min_time,
        min_age: Some(min_age),
        max_age: Some(15),
    }
}

/// Adult ranks 1-7 and kids ranks 10-15 sharing one rank sequence.
pub fn academy_ledger() -> BeltLedger {
    BeltLedger::new(vec![
        adult(ADULT_BRANCA, "Branca", 1, Some(12)),
        adult(ADULT_AZUL, "Azul", 2, Some(24)),
        adult(ADULT_ROXA, "Roxa", 3, Some(18)),
        adult(ADULT_MARROM, "Marrom", 4, Some(12)),
        adult(ADULT_PRETA, "Preta", 5, None),
        adult(ADULT_CORAL, "Coral", 6, None),
        adult(ADULT_VERMELHA, "Vermelha", 7, None),
        kids(KIDS_BRANCA, "Branca", 10, 4, None),
        kids(KIDS_CINZA, "Cinza", 11, 4, Some(6)),
        kids(KIDS_AMARELA, "Amarela", 12, 7, Some(6)),
        kids(KIDS_LARANJA, "Laranja", 13, 10, Some(6)),
        kids(KIDS_VERDE, "Verde", 14, 13, Some(6)),
        kids(KIDS_VERDE_PRETA, "Verde e Preta", 15, 14, Some(12)),
    ])
}

pub fn student(belt_id: i64, stripes: u8, birth_date: NaiveDate, promoted_on: NaiveDate) -> Student {
    Student {
        id: Uuid::new_v4(),
        full_name: "Marina Costa".to_string(),
        academy_id: Uuid::new_v4(),
        belt_id,
        stripes,
        birth_date: Some(birth_date),
        first_graduation_date: Some(date(2015, 2, 1)),
        last_promotion_date: Some(promoted_on),
    }
}

/// `present` then `absent` sessions, one per day starting at `from`.
pub fn sessions(student: &Student, from: NaiveDate, present: usize, absent: usize) -> Vec<AttendanceRecord> {
    let schedule_id = Uuid::new_v4();
    (0..present + absent)
        .map(|offset| AttendanceRecord {
            student_id: student.id,
            schedule_id,
            date: from + chrono::Duration::days(offset as i64),
            status: if offset < present {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            },
        })
        .collect()
}
