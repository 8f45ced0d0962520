//! Categorical derivations used by reports and the dashboard
//!
//! The report SQL carries its own copy of each bucketing as a `CASE`
//! expression; these enums are the in-memory counterpart and the tests pin
//! the two together.

use serde::Serialize;

/// Driver age group, half-open on the lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AgeBucket {
    Under25,
    From25To34,
    From35To44,
    From45To54,
    Over55,
}

impl AgeBucket {
    pub fn all() -> &'static [AgeBucket] {
        &[
            AgeBucket::Under25,
            AgeBucket::From25To34,
            AgeBucket::From35To44,
            AgeBucket::From45To54,
            AgeBucket::Over55,
        ]
    }

    pub fn from_age(age: i64) -> Self {
        match age {
            a if a < 25 => AgeBucket::Under25,
            a if a < 35 => AgeBucket::From25To34,
            a if a < 45 => AgeBucket::From35To44,
            a if a < 55 => AgeBucket::From45To54,
            _ => AgeBucket::Over55,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Under25 => "<25",
            AgeBucket::From25To34 => "25-34",
            AgeBucket::From35To44 => "35-44",
            AgeBucket::From45To54 => "45-54",
            AgeBucket::Over55 => "55+",
        }
    }
}

/// Four-way split of the day by stop hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn all() -> &'static [TimeOfDay] {
        &[
            TimeOfDay::Morning,
            TimeOfDay::Afternoon,
            TimeOfDay::Evening,
            TimeOfDay::Night,
        ]
    }

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            18..=23 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning (6AM-12PM)",
            TimeOfDay::Afternoon => "Afternoon (12PM-6PM)",
            TimeOfDay::Evening => "Evening (6PM-12AM)",
            TimeOfDay::Night => "Night (12AM-6AM)",
        }
    }
}

/// Two-way night/day split used by the night-arrest report.
///
/// Independent of [`TimeOfDay`]: night here runs from 20:00 to 06:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayPart {
    Night,
    Day,
}

impl DayPart {
    pub fn from_hour(hour: u32) -> Self {
        if hour >= 20 || hour < 6 {
            DayPart::Night
        } else {
            DayPart::Day
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayPart::Night => "Night (8PM-6AM)",
            DayPart::Day => "Day (6AM-8PM)",
        }
    }
}
