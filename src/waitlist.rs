//! Waitlist board for the therapy reception.
//!
//! This module provides the WaitlistBoard struct which owns the waiting
//! patients and the released slots, and keeps the derived matches in step
//! with them: every mutation recomputes the matches before returning.

use crate::error::{ReceptionError, Result};
use crate::matcher::{compute_matches, Match};
use crate::models::{
    EntryStatus, NewOpenSlot, NewWaitlistEntry, OpenSlot, Priority, Session, Shift, SlotStatus,
    Specialty, WaitlistEntry,
};
use crate::settings::Settings;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Headline numbers shown above the waitlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaitlistStats {
    pub total_waiting: usize,
    pub high_priority: usize,
    pub available_slots: usize,
    pub matches_found: usize,
    pub average_wait_days: i64,
}

/// How long a patient has been waiting, for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WaitSeverity {
    Short,
    Moderate,
    Long,
}

impl WaitSeverity {
    pub fn from_days(days: i64) -> Self {
        if days >= 30 {
            WaitSeverity::Long
        } else if days >= 14 {
            WaitSeverity::Moderate
        } else {
            WaitSeverity::Short
        }
    }
}

/// Whether the session may change the waitlist (others only view it).
pub fn can_edit(session: Option<&Session>, settings: &Settings) -> bool {
    match session {
        Some(s) if s.active && s.is_admin() => true,
        Some(s) if s.active => s
            .reception_id
            .as_ref()
            .map_or(false, |id| settings.waitlist_editors.contains(id)),
        _ => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaitlistBoard {
    entries: Vec<WaitlistEntry>,
    slots: Vec<OpenSlot>,
    matches: Vec<Match>,
}

impl WaitlistBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board seeded with existing records, e.g. a backend listing.
    ///
    /// Slot shifts are re-derived from their start times.
    pub fn with_records(entries: Vec<WaitlistEntry>, mut slots: Vec<OpenSlot>) -> Self {
        for slot in &mut slots {
            slot.shift = Shift::from_start_time(slot.start_time);
        }
        let mut board = WaitlistBoard {
            entries,
            slots,
            matches: Vec::new(),
        };
        board.refresh();
        board
    }

    pub fn entries(&self) -> &[WaitlistEntry] {
        &self.entries
    }

    pub fn slots(&self) -> &[OpenSlot] {
        &self.slots
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn entry(&self, id: &str) -> Option<&WaitlistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn slot(&self, id: &str) -> Option<&OpenSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    fn refresh(&mut self) {
        self.matches = compute_matches(&self.entries, &self.slots);
    }

    /// Put a patient at the top of the waitlist.
    pub fn add_entry(&mut self, form: NewWaitlistEntry, today: NaiveDate) -> Result<&WaitlistEntry> {
        let entry = WaitlistEntry::new(form, today).map_err(|e| {
            warn!(error = %e, "rejected waitlist entry");
            e
        })?;
        info!(
            id = %entry.id,
            specialty = %entry.specialty,
            priority = entry.priority.name(),
            "patient added to waitlist"
        );
        self.entries.insert(0, entry);
        self.refresh();
        Ok(&self.entries[0])
    }

    /// Replace an entry's form fields. Id and status are kept.
    pub fn update_entry(&mut self, id: &str, form: NewWaitlistEntry, today: NaiveDate) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ReceptionError::EntryNotFound(id.to_string()))?;
        entry.apply(form, today)?;
        info!(id, "waitlist entry updated");
        self.refresh();
        Ok(())
    }

    pub fn remove_entry(&mut self, id: &str) -> Result<WaitlistEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ReceptionError::EntryNotFound(id.to_string()))?;
        let removed = self.entries.remove(index);
        info!(id, "waitlist entry removed");
        self.refresh();
        Ok(removed)
    }

    /// Publish a released slot.
    pub fn add_slot(&mut self, form: NewOpenSlot) -> Result<&OpenSlot> {
        let slot = OpenSlot::new(form).map_err(|e| {
            warn!(error = %e, "rejected open slot");
            e
        })?;
        info!(
            id = %slot.id,
            specialty = %slot.specialty,
            shift = %slot.shift,
            "open slot published"
        );
        self.slots.insert(0, slot);
        self.refresh();
        Ok(&self.slots[0])
    }

    pub fn remove_slot(&mut self, id: &str) -> Result<OpenSlot> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ReceptionError::SlotNotFound(id.to_string()))?;
        let removed = self.slots.remove(index);
        info!(id, "open slot removed");
        self.refresh();
        Ok(removed)
    }

    /// Give `slot_id` to the patient behind `entry_id`.
    ///
    /// Both sides leave the matching pool. Eligibility is not re-checked:
    /// the desk may override the ranking.
    pub fn schedule(&mut self, entry_id: &str, slot_id: &str) -> Result<()> {
        let entry_index = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| ReceptionError::EntryNotFound(entry_id.to_string()))?;
        let slot_index = self
            .slots
            .iter()
            .position(|s| s.id == slot_id)
            .ok_or_else(|| ReceptionError::SlotNotFound(slot_id.to_string()))?;

        if !self.entries[entry_index].is_waiting() {
            return Err(ReceptionError::EntryNotWaiting(entry_id.to_string()));
        }
        if !self.slots[slot_index].is_available() {
            return Err(ReceptionError::SlotNotAvailable(slot_id.to_string()));
        }

        self.entries[entry_index].status = EntryStatus::Scheduled;
        self.slots[slot_index].status = SlotStatus::Booked;
        info!(entry_id, slot_id, "patient scheduled from waitlist");
        self.refresh();
        Ok(())
    }

    /// Entries whose name, specialty or preferred therapist contains
    /// `search` (case-insensitive), optionally restricted to one specialty.
    pub fn filter(&self, search: &str, specialty: Option<Specialty>) -> Vec<&WaitlistEntry> {
        let needle = search.to_lowercase();
        let result: Vec<&WaitlistEntry> = self
            .entries
            .iter()
            .filter(|e| specialty.map_or(true, |s| e.specialty == s))
            .filter(|e| {
                e.patient_name.to_lowercase().contains(&needle)
                    || e.specialty.label().to_lowercase().contains(&needle)
                    || e
                        .preferred_therapist
                        .as_deref()
                        .unwrap_or("")
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect();
        debug!(search, ?specialty, hits = result.len(), "filtered waitlist");
        result
    }

    pub fn stats(&self) -> WaitlistStats {
        let total_wait: i64 = self.entries.iter().map(|e| e.wait_days).sum();
        let average_wait_days = if self.entries.is_empty() {
            0
        } else {
            (total_wait as f64 / self.entries.len() as f64).round() as i64
        };

        WaitlistStats {
            total_waiting: self.entries.iter().filter(|e| e.is_waiting()).count(),
            high_priority: self
                .entries
                .iter()
                .filter(|e| e.priority == Priority::High)
                .count(),
            available_slots: self.slots.iter().filter(|s| s.is_available()).count(),
            matches_found: self.matches.len(),
            average_wait_days,
        }
    }
}

impl fmt::Display for WaitlistBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WaitlistBoard(entries={}, slots={}, matches={})",
            self.entries.len(),
            self.slots.len(),
            self.matches.len()
        )
    }
}
