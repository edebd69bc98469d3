use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Short labels indexed by day of week, Sunday first.
pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("unknown recurrence '{0}' (expected daily, weekdays, weekends or custom)")]
    UnknownKind(String),
    #[error("custom day {0} is out of range (expected 0-6, Sunday = 0)")]
    DayOutOfRange(i64),
}

/// Day of week with Sunday = 0.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Set of days of the week, Sunday = 0 through Saturday = 6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CustomDays {
    mask: u8,
}

impl CustomDays {
    const ALL_MASK: u8 = 0b0111_1111;

    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    pub const fn all() -> Self {
        Self {
            mask: Self::ALL_MASK,
        }
    }

    /// Build a set, rejecting any value outside 0-6.
    pub fn new<I>(days: I) -> Result<Self, RecurrenceError>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut set = Self::empty();
        for day in days {
            if !(0..=6).contains(&day) {
                return Err(RecurrenceError::DayOutOfRange(day));
            }
            set.insert(day as u8);
        }
        Ok(set)
    }

    /// Build a set, silently dropping values outside 0-6.
    pub fn lenient<I>(days: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut set = Self::empty();
        for day in days {
            if (0..=6).contains(&day) {
                set.insert(day as u8);
            }
        }
        set
    }

    fn insert(&mut self, day: u8) {
        self.mask |= 1 << day;
    }

    pub fn contains(&self, day: u8) -> bool {
        day < 7 && self.mask & (1 << day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Members in ascending order, Sunday first.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..7).filter(move |day| self.contains(*day))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.iter().map(|day| DAY_LABELS[day as usize]).collect()
    }
}

/// Which calendar days a goal is due on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecurrenceConfig", into = "RecurrenceConfig")]
pub enum Recurrence {
    #[default]
    Daily,
    Weekdays,
    Weekends,
    Custom(CustomDays),
}

impl Recurrence {
    pub fn variants() -> &'static [(&'static str, &'static str)] {
        &[
            ("daily", "Every day"),
            ("weekdays", "Monday through Friday"),
            ("weekends", "Saturday and Sunday"),
            ("custom", "Selected days, e.g. custom:1,3,5"),
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekdays => "weekdays",
            Recurrence::Weekends => "weekends",
            Recurrence::Custom(_) => "custom",
        }
    }

    /// Build a recurrence from its stored kind and optional day list.
    /// The day list only matters for `custom`; a missing list there means no days.
    pub fn parse(kind: &str, custom_days: Option<&[i64]>) -> Result<Self, RecurrenceError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Recurrence::Daily),
            "weekdays" => Ok(Recurrence::Weekdays),
            "weekends" => Ok(Recurrence::Weekends),
            "custom" => {
                let days = CustomDays::new(custom_days.unwrap_or_default().iter().copied())?;
                Ok(Recurrence::Custom(days))
            }
            other => Err(RecurrenceError::UnknownKind(other.to_string())),
        }
    }

    /// The fixed day set this policy maps to.
    pub fn active_days(&self) -> CustomDays {
        match self {
            Recurrence::Daily => CustomDays::all(),
            Recurrence::Weekdays => CustomDays::lenient([1, 2, 3, 4, 5]),
            Recurrence::Weekends => CustomDays::lenient([0, 6]),
            Recurrence::Custom(days) => *days,
        }
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        is_active_on(date, self)
    }

    /// True when at least one day of the week is due.
    pub fn has_active_days(&self) -> bool {
        !self.active_days().is_empty()
    }

    pub fn describe(&self) -> String {
        match self {
            Recurrence::Custom(days) if days.is_empty() => "custom (no days)".to_string(),
            Recurrence::Custom(days) => format!("custom ({})", days.labels().join(", ")),
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Custom(days) => {
                let list = days
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "custom:{list}")
            }
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = RecurrenceError;

    /// Accepts `daily`, `weekdays`, `weekends`, `custom` and `custom:1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = match s.split_once(':') {
            Some((kind, rest)) => (kind, Some(rest)),
            None => (s, None),
        };
        let days = match rest {
            Some(list) if !list.trim().is_empty() => Some(
                list.split(',')
                    .map(|part| {
                        part.trim()
                            .parse::<i64>()
                            .map_err(|_| RecurrenceError::UnknownKind(s.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => None,
        };
        Recurrence::parse(kind, days.as_deref())
    }
}

/// Whether a goal with this recurrence is due on `date`.
pub fn is_active_on(date: NaiveDate, recurrence: &Recurrence) -> bool {
    recurrence.active_days().contains(day_of_week(date))
}

/// Stored form of a recurrence: a kind string plus an optional day list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    pub recurrence: String,
    #[serde(default)]
    pub custom_days: Option<Vec<i64>>,
}

impl TryFrom<RecurrenceConfig> for Recurrence {
    type Error = RecurrenceError;

    fn try_from(config: RecurrenceConfig) -> Result<Self, Self::Error> {
        Recurrence::parse(&config.recurrence, config.custom_days.as_deref())
    }
}

impl From<Recurrence> for RecurrenceConfig {
    fn from(recurrence: Recurrence) -> Self {
        let custom_days = match recurrence {
            Recurrence::Custom(days) => Some(days.iter().map(i64::from).collect()),
            _ => None,
        };
        Self {
            recurrence: recurrence.as_str().to_string(),
            custom_days,
        }
    }
}
