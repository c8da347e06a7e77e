use crate::error::TermParseError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Academic season. Declaration order is the within-year order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Fall,
    Winter,
    Summer,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Fall, Season::Winter, Season::Summer];

    pub fn rank(self) -> i32 {
        match self {
            Season::Fall => 0,
            Season::Winter => 1,
            Season::Summer => 2,
        }
    }

    /// Prefix used when minting placement ids (`f1`, `w2`, `s3`).
    pub fn prefix(self) -> char {
        match self {
            Season::Fall => 'f',
            Season::Winter => 'w',
            Season::Summer => 's',
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Fall => write!(f, "Fall"),
            Season::Winter => write!(f, "Winter"),
            Season::Summer => write!(f, "Summer"),
        }
    }
}

impl FromStr for Season {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fall" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            "summer" => Ok(Season::Summer),
            _ => Err(TermParseError::UnknownSeason(s.to_string())),
        }
    }
}

/// A (season, year) slot. Serialized as its label, e.g. `"Fall 2024"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Term {
    pub season: Season,
    pub year: i32,
}

impl Term {
    pub const fn new(season: Season, year: i32) -> Self {
        Self { season, year }
    }

    /// `year * 10 + season rank`. Unique per term.
    pub fn order(self) -> i32 {
        self.year * 10 + self.season.rank()
    }

    /// The immediately following term in the Fall, Winter, Summer cycle.
    pub fn next(self) -> Term {
        match self.season {
            Season::Fall => Term::new(Season::Winter, self.year),
            Season::Winter => Term::new(Season::Summer, self.year),
            Season::Summer => Term::new(Season::Fall, self.year + 1),
        }
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order().cmp(&other.order())
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z]+)\s+(\d{4})\s*$").expect("term label pattern is valid")
    })
}

impl FromStr for Term {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = label_pattern()
            .captures(s)
            .ok_or_else(|| TermParseError::Malformed(s.to_string()))?;
        let season: Season = caps[1].parse()?;
        let year = caps[2]
            .parse()
            .map_err(|_| TermParseError::Malformed(s.to_string()))?;
        Ok(Term::new(season, year))
    }
}

impl TryFrom<String> for Term {
    type Error = TermParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(label: &str) -> Term {
        label.parse().unwrap()
    }

    #[test]
    fn test_order_follows_season_cycle() {
        assert!(term("Fall 2024").order() < term("Winter 2024").order());
        assert!(term("Winter 2024").order() < term("Summer 2024").order());
        assert!(term("Summer 2024").order() < term("Fall 2025").order());
        assert_eq!(term("Summer 2024").order(), 20242);
    }

    #[test]
    fn test_next_wraps_to_following_fall() {
        assert_eq!(term("Fall 2024").next(), term("Winter 2024"));
        assert_eq!(term("Winter 2024").next(), term("Summer 2024"));
        assert_eq!(term("Summer 2024").next(), term("Fall 2025"));
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(term("  winter 2026 "), Term::new(Season::Winter, 2026));
        assert_eq!(term("Fall 2023").to_string(), "Fall 2023");
    }

    #[test]
    fn test_parse_rejects_bad_labels() {
        assert_eq!(
            "Spring 2024".parse::<Term>(),
            Err(TermParseError::UnknownSeason("Spring".to_string()))
        );
        assert!(matches!(
            "Fall2024".parse::<Term>(),
            Err(TermParseError::Malformed(_))
        ));
        assert!(matches!(
            "Fall 24".parse::<Term>(),
            Err(TermParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&term("Summer 2025")).unwrap();
        assert_eq!(json, "\"Summer 2025\"");
        let back: Term = serde_json::from_str(&json).unwrap();
        assert_eq!(back, term("Summer 2025"));
        assert!(serde_json::from_str::<Term>("\"Autumn 2025\"").is_err());
    }
}
