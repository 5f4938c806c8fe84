//! Wall-clock variables. Never cacheable: each resolution may observe a
//! different instant.

use chrono::{Datelike, Local, Timelike};
use serde_json::{json, Value};

use super::Variable;
use crate::eval::Eval;
use crate::types::error::EvalError;
use crate::types::subject::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeUnit {
    /// Unix seconds.
    Timestamp,
    /// The numeric `YYYYMMDDHHMMSS` form, e.g. `20260806143052`.
    TsSimple,
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
    /// Day of week, 0 = Sunday.
    Wday,
    /// `YYYY-MM-DD`.
    Date,
    /// `HH:MM:SS`.
    Time,
}

impl TimeUnit {
    pub(crate) const ALL: [TimeUnit; 11] = [
        TimeUnit::Timestamp,
        TimeUnit::TsSimple,
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Month,
        TimeUnit::Year,
        TimeUnit::Wday,
        TimeUnit::Date,
        TimeUnit::Time,
    ];

    fn name(self) -> &'static str {
        match self {
            TimeUnit::Timestamp => "timestamp",
            TimeUnit::TsSimple => "ts_simple",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
            TimeUnit::Wday => "wday",
            TimeUnit::Date => "date",
            TimeUnit::Time => "time",
        }
    }
}

pub(crate) struct TimeVariable {
    unit: TimeUnit,
}

impl TimeVariable {
    pub(crate) fn new(unit: TimeUnit) -> Self {
        Self { unit }
    }
}

impl Variable for TimeVariable {
    fn name(&self) -> &str {
        self.unit.name()
    }

    fn cacheable(&self) -> bool {
        false
    }

    fn resolve(&self, _ev: &Eval<'_>, _subject: &dyn Subject) -> Result<Value, EvalError> {
        let now = Local::now();
        Ok(match self.unit {
            TimeUnit::Timestamp => json!(now.timestamp()),
            TimeUnit::TsSimple => {
                json!(now
                    .format("%Y%m%d%H%M%S")
                    .to_string()
                    .parse::<i64>()
                    .unwrap_or(0))
            }
            TimeUnit::Second => json!(now.second()),
            TimeUnit::Minute => json!(now.minute()),
            TimeUnit::Hour => json!(now.hour()),
            TimeUnit::Day => json!(now.day()),
            TimeUnit::Month => json!(now.month()),
            TimeUnit::Year => json!(now.year()),
            TimeUnit::Wday => json!(now.weekday().num_days_from_sunday()),
            TimeUnit::Date => json!(now.format("%Y-%m-%d").to_string()),
            TimeUnit::Time => json!(now.format("%H:%M:%S").to_string()),
        })
    }
}
