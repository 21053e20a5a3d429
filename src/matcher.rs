//! Waitlist to open-slot matching.
//!
//! Pairs every available slot with the waiting patients who would take it,
//! ranked so the front desk calls the most urgent, longest-waiting patient
//! first. The result is derived data and is rebuilt from scratch on every
//! call.

use crate::models::{OpenSlot, WaitlistEntry};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// One slot with its ranked candidates. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub slot: OpenSlot,
    pub candidates: Vec<WaitlistEntry>,
}

impl Match {
    /// Best-ranked candidate.
    pub fn first_choice(&self) -> Option<&WaitlistEntry> {
        self.candidates.first()
    }
}

/// Whether `entry` would accept `slot`.
///
/// Specialty must match, the shift must be the preferred one (or the
/// patient takes any shift), and the therapist must be the preferred one
/// (or the patient has no preference, blank included). Names are compared
/// exactly.
pub fn is_eligible(entry: &WaitlistEntry, slot: &OpenSlot) -> bool {
    entry.is_waiting()
        && entry.specialty == slot.specialty
        && entry.shift_preference.accepts(slot.shift)
        && entry
            .preferred_therapist
            .as_deref()
            .filter(|therapist| !therapist.trim().is_empty())
            .map_or(true, |therapist| therapist == slot.therapist)
}

/// Priority descending, then wait time descending.
fn rank(a: &WaitlistEntry, b: &WaitlistEntry) -> Ordering {
    match b.priority.cmp(&a.priority) {
        Ordering::Equal => b.wait_days.cmp(&a.wait_days),
        other => other,
    }
}

/// Group eligible waiting patients under each available slot.
///
/// Slots nobody can take are left out. Output follows slot order.
pub fn compute_matches(waitlist: &[WaitlistEntry], slots: &[OpenSlot]) -> Vec<Match> {
    let matches: Vec<Match> = slots
        .iter()
        .filter(|slot| slot.is_available())
        .filter_map(|slot| {
            let mut candidates: Vec<WaitlistEntry> = waitlist
                .iter()
                .filter(|entry| is_eligible(entry, slot))
                .cloned()
                .collect();

            if candidates.is_empty() {
                return None;
            }

            candidates.sort_by(rank);
            Some(Match {
                slot: slot.clone(),
                candidates,
            })
        })
        .collect();

    debug!(
        entries = waitlist.len(),
        slots = slots.len(),
        matches = matches.len(),
        "recomputed waitlist matches"
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EntryStatus, NewOpenSlot, Priority, Shift, ShiftPreference, SlotStatus, Specialty,
    };
    use chrono::{NaiveDate, NaiveTime};

    fn slot(specialty: Specialty, therapist: &str, hour: u32) -> OpenSlot {
        OpenSlot::new(NewOpenSlot {
            specialty,
            therapist: therapist.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
            room: "Sala 01".to_string(),
            notes: String::new(),
            created_by: "recepcao1002".to_string(),
        })
        .unwrap()
    }

    fn entry(
        name: &str,
        specialty: Specialty,
        therapist: Option<&str>,
        shift: ShiftPreference,
        priority: Priority,
        wait_days: i64,
    ) -> WaitlistEntry {
        WaitlistEntry {
            id: name.to_string(),
            patient_name: name.to_string(),
            specialty,
            preferred_therapist: therapist.map(str::to_string),
            shift_preference: shift,
            requested_on: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            requested_by: "Recepcao 103".to_string(),
            priority,
            notes: String::new(),
            guardian_contact: String::new(),
            wait_days,
            status: EntryStatus::Waiting,
        }
    }

    #[test]
    fn shift_preference_must_fit() {
        let morning = slot(Specialty::Psicologia, "Dr. Paulo", 9);
        let afternoon_only = entry(
            "Bia",
            Specialty::Psicologia,
            None,
            ShiftPreference::Only(Shift::Afternoon),
            Priority::High,
            3,
        );
        assert!(!is_eligible(&afternoon_only, &morning));

        let morning_only = WaitlistEntry {
            shift_preference: ShiftPreference::Only(Shift::Morning),
            ..afternoon_only
        };
        assert!(is_eligible(&morning_only, &morning));
    }

    #[test]
    fn therapist_comparison_is_exact() {
        let s = slot(Specialty::Fonoaudiologia, "Dra. Maria Silva", 9);
        let e = entry(
            "Caio",
            Specialty::Fonoaudiologia,
            Some("dra. maria silva"),
            ShiftPreference::Any,
            Priority::Low,
            1,
        );
        assert!(!is_eligible(&e, &s));
    }

    #[test]
    fn scheduled_entries_and_booked_slots_are_skipped() {
        let mut s = slot(Specialty::Musicoterapia, "Dr. Som", 19);
        let mut e = entry(
            "Davi",
            Specialty::Musicoterapia,
            None,
            ShiftPreference::Only(Shift::Evening),
            Priority::Medium,
            8,
        );
        assert_eq!(compute_matches(&[e.clone()], &[s.clone()]).len(), 1);

        e.status = EntryStatus::Scheduled;
        assert!(compute_matches(&[e.clone()], &[s.clone()]).is_empty());

        e.status = EntryStatus::Waiting;
        s.status = SlotStatus::Booked;
        assert!(compute_matches(&[e], &[s]).is_empty());
    }

    #[test]
    fn equal_rank_keeps_input_order() {
        let s = slot(Specialty::Fisioterapia, "Dr. Carlos Oliveira", 14);
        let first = entry(
            "Eva",
            Specialty::Fisioterapia,
            None,
            ShiftPreference::Any,
            Priority::Medium,
            10,
        );
        let second = entry(
            "Fabio",
            Specialty::Fisioterapia,
            None,
            ShiftPreference::Any,
            Priority::Medium,
            10,
        );
        let matches = compute_matches(&[first, second], &[s]);
        let names: Vec<&str> = matches[0]
            .candidates
            .iter()
            .map(|c| c.patient_name.as_str())
            .collect();
        assert_eq!(names, vec!["Eva", "Fabio"]);
    }

    #[test]
    fn one_patient_can_match_several_slots() {
        let slots = vec![
            slot(Specialty::Neuropsicologia, "Dra. Lia", 8),
            slot(Specialty::Neuropsicologia, "Dra. Lia", 15),
            slot(Specialty::Psicopedagogia, "Dra. Lia", 10),
        ];
        let e = entry(
            "Gil",
            Specialty::Neuropsicologia,
            Some("Dra. Lia"),
            ShiftPreference::Any,
            Priority::High,
            2,
        );
        let matches = compute_matches(&[e], &slots);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].slot.id, slots[0].id);
        assert_eq!(matches[1].slot.id, slots[1].id);
        assert_eq!(matches[1].first_choice().unwrap().patient_name, "Gil");
    }

    #[test]
    fn blank_therapist_means_any() {
        let s = slot(Specialty::Fonoaudiologia, "Dra. Maria Silva", 9);
        let e = entry(
            "Hana",
            Specialty::Fonoaudiologia,
            Some("  "),
            ShiftPreference::Any,
            Priority::Medium,
            4,
        );
        assert!(is_eligible(&e, &s));
        assert_eq!(compute_matches(&[e], &[s]).len(), 1);
    }
}
