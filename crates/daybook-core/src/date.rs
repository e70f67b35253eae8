//! Calendar date key for a daily task set.

use chrono::{Days, Local, NaiveDate};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An ISO 8601 calendar date (`YYYY-MM-DD`), the primary key of a task set.
///
/// Parsing is strict: zero-padded month and day, no time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskDate(NaiveDate);

impl TaskDate {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's date on the local calendar.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }

    /// The date `days` before this one, or `None` before the calendar start.
    #[must_use]
    pub fn days_before(self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(days)).map(Self)
    }
}

impl fmt::Display for TaskDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for TaskDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::validation("date", format!("'{s}' is not a YYYY-MM-DD date"));
        if s.len() != 10 {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }
}

impl JsonSchema for TaskDate {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("TaskDate")
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "format": "date"
        })
    }
}

impl TryFrom<String> for TaskDate {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskDate> for String {
    fn from(date: TaskDate) -> Self {
        date.to_string()
    }
}
