use std::fmt;

use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Largest year in either era; keeps every date on the signed `i32` axis.
pub const MAX_YEAR: u32 = i32::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Era {
    BC,
    AD,
}

string_enum!(Era {
    BC => "BC",
    AD => "AD",
});

/// Month-granularity proleptic calendar.
///
/// Years are counted within an era and never reach zero: the year after
/// 1 BC is 1 AD. BC years count down toward 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CalendarRepr", try_from = "CalendarRepr")]
pub struct Calendar {
    year: u32,
    month: u32,
    era: Era,
}

#[derive(Serialize, Deserialize)]
struct CalendarRepr {
    year: u32,
    month: u32,
    era: Era,
}

impl From<Calendar> for CalendarRepr {
    fn from(c: Calendar) -> Self {
        CalendarRepr {
            year: c.year,
            month: c.month,
            era: c.era,
        }
    }
}

impl TryFrom<CalendarRepr> for Calendar {
    type Error = String;

    fn try_from(repr: CalendarRepr) -> Result<Self, Self::Error> {
        Calendar::try_new(repr.year, repr.month, repr.era)
    }
}

impl Calendar {
    /// # Panics
    /// Panics if `year` is zero or `month` is outside 1–12.
    pub fn new(year: u32, month: u32, era: Era) -> Self {
        Self::try_new(year, month, era).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(year: u32, month: u32, era: Era) -> Result<Self, String> {
        if year == 0 {
            return Err("year 0 does not exist".to_string());
        }
        if year > MAX_YEAR {
            return Err(format!("year out of range: {year}"));
        }
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(format!("month out of range: {month}"));
        }
        Ok(Self { year, month, era })
    }

    pub fn year(self) -> u32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn era(self) -> Era {
        self.era
    }

    pub fn is_first_month(self) -> bool {
        self.month == 1
    }

    /// Year on a signed axis: BC years are negative, AD years positive.
    /// Natural `i32` ordering equals chronological ordering.
    pub fn signed_year(self) -> i32 {
        let year = i32::try_from(self.year).unwrap_or(i32::MAX);
        match self.era {
            Era::BC => -year,
            Era::AD => year,
        }
    }

    /// Advance by one month. Returns true when a new year begins.
    pub fn advance_month(&mut self) -> bool {
        self.month += 1;
        if self.month <= MONTHS_PER_YEAR {
            return false;
        }
        self.month = 1;
        match self.era {
            Era::BC if self.year == 1 => self.era = Era::AD,
            Era::BC => self.year -= 1,
            Era::AD => self.year = (self.year + 1).min(MAX_YEAR),
        }
        true
    }
}

/// Offset a signed year by `delta` years, skipping the nonexistent year 0.
pub fn offset_year(signed_year: i32, delta: i32) -> i32 {
    let raw = signed_year.saturating_add(delta);
    if signed_year < 0 && raw >= 0 {
        raw + 1
    } else if signed_year > 0 && raw <= 0 {
        raw - 1
    } else {
        raw
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(753, 1, Era::BC)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.month, self.year, self.era)
    }
}
