use chrono::{Datelike, NaiveDate};

use crate::models::Student;

/// Whole years between `birth_date` and `as_of`, corrected for whether the
/// birthday has already happened in the `as_of` year.
pub fn age_of(birth_date: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut age = as_of.year() - birth_date.year();
    if (as_of.month(), as_of.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Calendar months between two dates, ignoring the day of month.
///
/// A promotion on the 31st and an `as_of` on the 1st of the next month is one
/// month; the 2nd and the 28th of the same month is zero.
pub fn months_since(since: NaiveDate, as_of: NaiveDate) -> i32 {
    let years = as_of.year() - since.year();
    let months = as_of.month() as i32 - since.month() as i32;
    years * 12 + months
}

/// The date time-in-rank is measured from: last promotion, else first graduation.
pub fn anchor_date(student: &Student) -> Option<NaiveDate> {
    student.last_promotion_date.or(student.first_graduation_date)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = value.trim();
    let day_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
}

/// Serde adapter for dates exported either as `YYYY-MM-DD` or as full ISO
/// timestamps. Always writes plain `YYYY-MM-DD`.
pub mod flexible_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(|err| de::Error::custom(format!("invalid date `{raw}`: {err}")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.collect_str(&date.format(super::FORMAT)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(value) => crate::calendar::parse_date(value)
                    .map(Some)
                    .map_err(|err| de::Error::custom(format!("invalid date `{value}`: {err}"))),
            }
        }
    }
}
