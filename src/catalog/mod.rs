//! Course catalog: the courses a student can pick from.

use crate::calendar::Term;
use crate::error::CatalogError;
use crate::plan::PlanStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier of a course (the service's subject id).
pub type CourseId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Elective,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Core => write!(f, "core"),
            Category::Elective => write!(f, "elective"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "core" => Ok(Category::Core),
            "elective" => Ok(Category::Elective),
            _ => Err(format!("Unknown course category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,

    /// Unique human identifier, e.g. "CSCI 1234"
    pub code: String,

    pub name: String,

    pub category: Category,
}

impl Course {
    pub fn new(
        id: CourseId,
        code: impl Into<String>,
        name: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            category,
        }
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Course>, CatalogError>;
}

/// A catalog course as offered in the picker, with its current placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerEntry<'a> {
    pub course: &'a Course,
    pub placed_in: Option<Term>,
}

impl fmt::Display for PickerEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.course.code, self.course.name)?;
        if let Some(term) = self.placed_in {
            write!(f, " (in {})", term)?;
        }
        Ok(())
    }
}

pub fn picker_entries<'a>(catalog: &'a [Course], plan: &PlanStore) -> Vec<PickerEntry<'a>> {
    catalog
        .iter()
        .map(|course| PickerEntry {
            course,
            placed_in: plan.find_term(&course.code),
        })
        .collect()
}

/// Look a course up by code, ignoring case and surrounding whitespace.
pub fn find_course<'a>(catalog: &'a [Course], code: &str) -> Option<&'a Course> {
    let wanted = code.trim();
    catalog
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Season, TermCalendar};
    use crate::plan::Status;

    fn catalog() -> Vec<Course> {
        vec![
            Course::new(1, "CSCI 2110", "Data Structures", Category::Core),
            Course::new(2, "CSCI 3136", "Principles of Programming Languages", Category::Core),
            Course::new(3, "MUSC 1000", "Music Appreciation", Category::Elective),
        ]
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Core".parse::<Category>(), Ok(Category::Core));
        assert_eq!(" ELECTIVE ".parse::<Category>(), Ok(Category::Elective));
        assert!("lab".parse::<Category>().is_err());
    }

    #[test]
    fn test_find_course_by_code() {
        let catalog = catalog();
        assert_eq!(find_course(&catalog, "csci 3136").map(|c| c.id), Some(2));
        assert!(find_course(&catalog, "CSCI 9999").is_none());
    }

    #[test]
    fn test_picker_entries_annotate_placed_courses() {
        let catalog = catalog();
        let mut plan = PlanStore::new(TermCalendar::new(2023, 2024).unwrap());
        let fall = Term::new(Season::Fall, 2023);
        plan.place_course(catalog[0].clone(), fall, Status::Completed)
            .unwrap();

        let entries = picker_entries(&catalog, &plan);
        assert_eq!(entries[0].placed_in, Some(fall));
        assert_eq!(
            entries[0].to_string(),
            "CSCI 2110 - Data Structures (in Fall 2023)"
        );
        assert_eq!(entries[2].placed_in, None);
        assert_eq!(entries[2].to_string(), "MUSC 1000 - Music Appreciation");
    }
}
