use chrono::{NaiveDate, NaiveTime};
use reception_sync::models::{EntryStatus, NewOpenSlot};
use reception_sync::{
    compute_matches, OpenSlot, Priority, Shift, ShiftPreference, Specialty, WaitlistBoard,
    WaitlistEntry,
};

fn fono_slot() -> OpenSlot {
    OpenSlot::new(NewOpenSlot {
        specialty: Specialty::Fonoaudiologia,
        therapist: "Dra. Maria Silva".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        room: "Sala Fono 01".to_string(),
        notes: "Horário liberado por cancelamento".to_string(),
        created_by: "recepcao103".to_string(),
    })
    .unwrap()
}

fn patient(
    name: &str,
    specialty: Specialty,
    therapist: Option<&str>,
    priority: Priority,
    wait_days: i64,
) -> WaitlistEntry {
    WaitlistEntry {
        id: format!("id-{}", name),
        patient_name: name.to_string(),
        specialty,
        preferred_therapist: therapist.map(str::to_string),
        shift_preference: ShiftPreference::Any,
        requested_on: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        requested_by: "Recepcao 103".to_string(),
        priority,
        notes: String::new(),
        guardian_contact: String::new(),
        wait_days,
        status: EntryStatus::Waiting,
    }
}

fn names(entries: &[WaitlistEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.patient_name.as_str()).collect()
}

#[test]
fn empty_inputs_give_no_matches() {
    let someone = patient("Ana", Specialty::Fonoaudiologia, None, Priority::High, 15);
    assert!(compute_matches(&[], &[fono_slot()]).is_empty());
    assert!(compute_matches(&[someone], &[]).is_empty());
    assert!(compute_matches(&[], &[]).is_empty());
}

#[test]
fn only_the_compatible_patient_is_offered() {
    let slot = fono_slot();
    assert_eq!(slot.shift, Shift::Morning);

    let waitlist = vec![
        patient("Ana Clara", Specialty::Fonoaudiologia, None, Priority::High, 15),
        patient(
            "Lucas",
            Specialty::Fonoaudiologia,
            Some("Dr. Outro Nome"),
            Priority::High,
            40,
        ),
        patient("Joao", Specialty::Fisioterapia, None, Priority::High, 60),
    ];

    let matches = compute_matches(&waitlist, &[slot.clone()]);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].slot, slot);
    assert_eq!(names(&matches[0].candidates), vec!["Ana Clara"]);
}

#[test]
fn longer_wait_breaks_priority_ties() {
    let waitlist = vec![
        patient("Dez", Specialty::Fonoaudiologia, None, Priority::Medium, 10),
        patient("Vinte", Specialty::Fonoaudiologia, None, Priority::Medium, 20),
    ];
    let matches = compute_matches(&waitlist, &[fono_slot()]);
    assert_eq!(names(&matches[0].candidates), vec!["Vinte", "Dez"]);
}

#[test]
fn priority_beats_wait_time() {
    let waitlist = vec![
        patient("Baixa", Specialty::Fonoaudiologia, None, Priority::Low, 50),
        patient("Alta", Specialty::Fonoaudiologia, None, Priority::High, 1),
        patient("Media", Specialty::Fonoaudiologia, None, Priority::Medium, 30),
    ];
    let matches = compute_matches(&waitlist, &[fono_slot()]);
    assert_eq!(names(&matches[0].candidates), vec!["Alta", "Media", "Baixa"]);
}

#[test]
fn board_seeded_from_records_matches_immediately() {
    let board = WaitlistBoard::with_records(
        vec![patient("Ana", Specialty::Fonoaudiologia, Some("Dra. Maria Silva"), Priority::High, 15)],
        vec![fono_slot()],
    );
    assert_eq!(board.matches().len(), 1);
    assert_eq!(board.stats().matches_found, 1);
}

fn entry_json(id: &str, therapist: &str, shift: &str) -> String {
    format!(
        r#"{{"id": {id}, "nome_paciente": "Paciente {id}", "especialidade": "Fonoaudiologia",
            "terapeuta_preferencia": "{therapist}", "turno_preferencia": "{shift}",
            "data_solicitacao": "2024-07-15", "quem_solicitou": "Recepcao 103",
            "prioridade": "alta", "observacoes": "", "contato_responsavel": "(11) 99999-9999",
            "tempo_espera_dias": 15, "status": "aguardando"}}"#
    )
}

fn slot_json(start: &str, end: &str, sent_shift: &str) -> String {
    format!(
        r#"{{"id": 1, "especialidade": "Fonoaudiologia", "terapeuta": "Dra. Maria Silva",
            "data_disponivel": "2024-08-01", "hora_inicio": "{start}", "hora_fim": "{end}",
            "sala": "Sala Fono 01", "turno": "{sent_shift}", "observacoes": "",
            "created_by": "recepcao103", "status": "disponivel"}}"#
    )
}

#[test]
fn blank_therapist_from_backend_means_no_preference() {
    let entry: WaitlistEntry =
        serde_json::from_str(&entry_json("1", "", "Qualquer horário")).unwrap();
    assert_eq!(entry.id, "1");
    assert_eq!(entry.preferred_therapist, None);

    let slot: OpenSlot = serde_json::from_str(&slot_json("09:00:00", "10:00:00", "Manhã")).unwrap();
    assert_eq!(compute_matches(&[entry.clone()], &[slot.clone()]).len(), 1);

    let board = WaitlistBoard::with_records(vec![entry], vec![slot]);
    assert_eq!(board.matches().len(), 1);
}

#[test]
fn blank_therapist_built_in_place_still_matches() {
    let mut entry = patient("Ana", Specialty::Fonoaudiologia, None, Priority::High, 15);
    entry.preferred_therapist = Some(String::new());
    let board = WaitlistBoard::with_records(vec![entry], vec![fono_slot()]);
    assert_eq!(board.matches().len(), 1);
}

#[test]
fn loaded_slot_shift_comes_from_start_time() {
    let slot: OpenSlot =
        serde_json::from_str(&slot_json("19:00:00", "20:00:00", "Manhã")).unwrap();
    assert_eq!(slot.shift, Shift::Evening);

    let evening: WaitlistEntry = serde_json::from_str(&entry_json("2", "", "Noite")).unwrap();
    let morning: WaitlistEntry = serde_json::from_str(&entry_json("3", "", "Manhã")).unwrap();
    let matches = compute_matches(&[evening, morning], &[slot]);
    assert_eq!(matches.len(), 1);
    assert_eq!(names(&matches[0].candidates), vec!["Paciente 2"]);
}
