//! Term calendar: the fixed grid of (season, year) slots a plan can use.

mod term;

pub use term::{Season, Term};

use crate::error::ConfigError;

/// A bounded span of academic years, three terms each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermCalendar {
    first_year: i32,
    last_year: i32,
}

impl TermCalendar {
    pub fn new(first_year: i32, last_year: i32) -> Result<Self, ConfigError> {
        // Same span as a term label's four-digit year.
        for year in [first_year, last_year] {
            if !(1000..=9999).contains(&year) {
                return Err(ConfigError::YearOutOfRange(year));
            }
        }
        if first_year > last_year {
            return Err(ConfigError::EmptyCalendar {
                first: first_year,
                last: last_year,
            });
        }
        Ok(Self {
            first_year,
            last_year,
        })
    }

    pub fn contains(&self, term: Term) -> bool {
        (self.first_year..=self.last_year).contains(&term.year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.first_year..=self.last_year
    }

    /// The three term columns shown under one year tab.
    pub fn terms_for_year(&self, year: i32) -> [Term; 3] {
        Season::ALL.map(|season| Term::new(season, year))
    }

    /// Every term in the calendar, in term order.
    pub fn terms(&self) -> Vec<Term> {
        self.years()
            .flat_map(|year| self.terms_for_year(year))
            .collect()
    }
}
