use crate::calendar::{Term, TermCalendar};
use crate::catalog::Course;
use crate::error::PlanError;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use super::types::{PersistedCourse, Placement, PlacementId, Status};

#[derive(Debug, Clone, Default)]
struct TermSlot {
    placements: Vec<Placement>,
    /// Last sequence number handed out in this term; never decreases
    last_seq: u32,
}

impl TermSlot {
    fn mint(&mut self, term: Term) -> PlacementId {
        self.last_seq += 1;
        PlacementId {
            season: term.season,
            seq: self.last_seq,
        }
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.placements.iter().position(|p| p.course.code == code)
    }
}

/// A persisted row that could not be loaded into the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub code: String,
    pub term_label: String,
    pub reason: String,
}

/// The active plan: every calendar term mapped to its ordered placements.
///
/// Each course code has at most one placement across all terms. All
/// mutations go through `&mut self`, so the owner serializes writes.
#[derive(Debug, Clone)]
pub struct PlanStore {
    calendar: TermCalendar,
    slots: BTreeMap<Term, TermSlot>,
    revision: u64,
}

impl PlanStore {
    pub fn new(calendar: TermCalendar) -> Self {
        let slots = calendar
            .terms()
            .into_iter()
            .map(|term| (term, TermSlot::default()))
            .collect();
        Self {
            calendar,
            slots,
            revision: 0,
        }
    }

    /// Build a plan from persisted rows, skipping rows that cannot be placed.
    pub fn hydrate(
        calendar: TermCalendar,
        records: Vec<PersistedCourse>,
    ) -> (Self, Vec<SkippedRecord>) {
        let mut store = Self::new(calendar);
        let mut skipped = Vec::new();

        for record in records {
            let placed = record
                .term_label
                .parse::<Term>()
                .map_err(|e| e.to_string())
                .and_then(|term| {
                    store
                        .place_course(record.course.clone(), term, record.status)
                        .map_err(|e| e.to_string())
                });

            if let Err(reason) = placed {
                warn!(
                    "Skipping persisted course {} ({}): {}",
                    record.course.code, record.term_label, reason
                );
                skipped.push(SkippedRecord {
                    code: record.course.code,
                    term_label: record.term_label,
                    reason,
                });
            }
        }

        // A freshly loaded plan starts at revision zero.
        store.revision = 0;
        (store, skipped)
    }

    pub fn calendar(&self) -> &TermCalendar {
        &self.calendar
    }

    /// Bumped on every mutation that changes the plan.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Where a course is placed, if anywhere.
    pub fn find_term(&self, code: &str) -> Option<Term> {
        self.find(code).map(|p| p.term)
    }

    pub fn find(&self, code: &str) -> Option<&Placement> {
        self.slots
            .values()
            .flat_map(|slot| slot.placements.iter())
            .find(|p| p.course.code == code)
    }

    /// The code of a placed course as stored, matched ignoring case and
    /// surrounding whitespace.
    pub fn placed_code(&self, code: &str) -> Option<&str> {
        let wanted = code.trim();
        self.slots
            .values()
            .flat_map(|slot| slot.placements.iter())
            .map(|p| p.course.code.as_str())
            .find(|placed| placed.eq_ignore_ascii_case(wanted))
    }

    /// Placements of one term in display order; empty for terms outside the calendar.
    pub fn placements(&self, term: Term) -> &[Placement] {
        self.slots
            .get(&term)
            .map(|slot| slot.placements.as_slice())
            .unwrap_or(&[])
    }

    pub fn placements_with_status(&self, term: Term, status: Option<Status>) -> Vec<&Placement> {
        self.placements(term)
            .iter()
            .filter(|p| status.map(|s| p.status == s).unwrap_or(true))
            .collect()
    }

    /// All calendar terms in order, with their placements.
    pub fn terms(&self) -> impl Iterator<Item = (Term, &[Placement])> {
        self.slots
            .iter()
            .map(|(term, slot)| (*term, slot.placements.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.slots.values().map(|slot| slot.placements.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a course to a term. Fails if the course is placed anywhere already.
    pub fn place_course(
        &mut self,
        course: Course,
        term: Term,
        status: Status,
    ) -> Result<Placement, PlanError> {
        if let Some(existing) = self.find_term(&course.code) {
            return Err(PlanError::AlreadyPlaced {
                code: course.code,
                term: existing,
            });
        }

        let slot = self.slot_mut(term)?;
        let placement = Placement {
            id: slot.mint(term),
            course,
            term,
            status,
        };
        slot.placements.push(placement.clone());

        debug!("Placed {} in {} as {}", placement.code(), term, placement.id);
        self.touch();
        Ok(placement)
    }

    /// Move a course to the end of another term, keeping its status.
    pub fn move_course(
        &mut self,
        code: &str,
        from: Term,
        to: Term,
    ) -> Result<Placement, PlanError> {
        self.move_course_to(code, from, to, None)
    }

    /// Move a course to `index` within `to` (appended when `None`, clamped
    /// to the list length). Moving within the same term only reorders.
    pub fn move_course_to(
        &mut self,
        code: &str,
        from: Term,
        to: Term,
        index: Option<usize>,
    ) -> Result<Placement, PlanError> {
        let not_found = || PlanError::NotFound {
            code: code.to_string(),
        };

        let source_pos = self
            .slots
            .get(&from)
            .and_then(|slot| slot.position(code))
            .ok_or_else(not_found)?;

        if from == to {
            if let Some(index) = index {
                let last = self.placements(from).len() - 1;
                self.reorder(from, source_pos, index.min(last))?;
            }
            return self.find(code).cloned().ok_or_else(not_found);
        }

        // Validate the destination before touching the source.
        self.slot_mut(to)?;

        let mut placement = self
            .slots
            .get_mut(&from)
            .map(|slot| slot.placements.remove(source_pos))
            .ok_or_else(not_found)?;

        let dest = self.slot_mut(to)?;
        placement.id = dest.mint(to);
        placement.term = to;
        let at = index
            .unwrap_or(dest.placements.len())
            .min(dest.placements.len());
        dest.placements.insert(at, placement.clone());

        debug!(
            "Moved {} from {} to {} as {}",
            code, from, to, placement.id
        );
        self.touch();
        Ok(placement)
    }

    /// Reorder within a term (display order only).
    pub fn reorder(&mut self, term: Term, from_index: usize, to_index: usize) -> Result<(), PlanError> {
        let slot = self.slot_mut(term)?;
        let len = slot.placements.len();
        for index in [from_index, to_index] {
            if index >= len {
                return Err(PlanError::IndexOutOfRange { term, index, len });
            }
        }
        if from_index == to_index {
            return Ok(());
        }

        let placement = slot.placements.remove(from_index);
        slot.placements.insert(to_index, placement);
        self.touch();
        Ok(())
    }

    /// Returns true if the course was placed and is now removed.
    pub fn remove_course(&mut self, code: &str) -> bool {
        let removed = self.slots.values_mut().any(|slot| {
            slot.position(code)
                .map(|pos| slot.placements.remove(pos))
                .is_some()
        });
        if removed {
            debug!("Removed {} from plan", code);
            self.touch();
        }
        removed
    }

    /// Update a course's status. Setting the current value changes nothing.
    pub fn set_status(&mut self, code: &str, status: Status) -> Result<(), PlanError> {
        let placement = self
            .slots
            .values_mut()
            .flat_map(|slot| slot.placements.iter_mut())
            .find(|p| p.course.code == code)
            .ok_or_else(|| PlanError::NotFound {
                code: code.to_string(),
            })?;

        if placement.status != status {
            placement.status = status;
            self.touch();
        }
        Ok(())
    }

    fn slot_mut(&mut self, term: Term) -> Result<&mut TermSlot, PlanError> {
        self.slots
            .get_mut(&term)
            .ok_or(PlanError::TermOutOfRange(term))
    }

    fn touch(&mut self) {
        self.revision += 1;
        debug_assert!(self.codes_unique(), "course placed in more than one term");
    }

    fn codes_unique(&self) -> bool {
        let mut seen = HashSet::new();
        self.slots
            .values()
            .flat_map(|slot| slot.placements.iter())
            .all(|p| seen.insert(p.course.code.as_str()))
    }
}
