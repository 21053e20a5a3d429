//! Data models for the reception system.
//!
//! This module defines the core data structures used throughout the crate:
//! - Role / Session: who is signed in and at which reception desk
//! - Specialty, Shift, ShiftPreference, Priority: the fixed vocabularies
//! - WaitlistEntry: a patient waiting for a therapy slot
//! - OpenSlot: an appointment opportunity released by a therapist

use crate::error::{ReceptionError, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Roles a signed-in user can hold.
///
/// The backend knows three admin synonyms; they are interchangeable for
/// access purposes, see [`Role::is_admin_variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "admin_geral")]
    GeneralAdmin,
    #[serde(rename = "admin_limitado")]
    LimitedAdmin,
    #[serde(rename = "recepcao")]
    Reception,
}

impl Role {
    pub fn from_string(value: &str) -> Result<Self> {
        match value.trim() {
            "admin" => Ok(Role::Admin),
            "admin_geral" => Ok(Role::GeneralAdmin),
            "admin_limitado" => Ok(Role::LimitedAdmin),
            "recepcao" => Ok(Role::Reception),
            _ => Err(ReceptionError::InvalidRole(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::GeneralAdmin => "admin_geral",
            Role::LimitedAdmin => "admin_limitado",
            Role::Reception => "recepcao",
        }
    }

    /// True for every role with reception-independent privileges.
    pub fn is_admin_variant(&self) -> bool {
        matches!(self, Role::Admin | Role::GeneralAdmin | Role::LimitedAdmin)
    }
}

/// An authenticated identity, as returned by the backend's user payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
    #[serde(rename = "recepcao_id", default)]
    pub reception_id: Option<String>,
    #[serde(rename = "recepcao_nome", default)]
    pub reception_name: Option<String>,
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
struct LoginEnvelope {
    user: Option<Session>,
}

impl Session {
    /// Session for an admin, who belongs to no reception desk.
    pub fn admin(username: impl Into<String>, role: Role) -> Self {
        Session {
            username: username.into(),
            role,
            reception_id: None,
            reception_name: None,
            active: true,
        }
    }

    /// Session for a member of reception staff at the given desk.
    pub fn reception(username: impl Into<String>, reception_id: impl Into<String>) -> Self {
        let reception_id = reception_id.into();
        Session {
            username: username.into(),
            role: Role::Reception,
            reception_name: Some(format!("Recepcao {}", reception_id)),
            reception_id: Some(reception_id),
            active: true,
        }
    }

    /// Decode the `{ "user": { .. } }` body of a login or `/me` response.
    pub fn from_login_json(body: &str) -> Result<Self> {
        let envelope: LoginEnvelope = serde_json::from_str(body)?;
        envelope.user.ok_or(ReceptionError::MissingUser)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin_variant()
    }
}

/// Therapy specialties offered by the clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialty {
    Fonoaudiologia,
    Fisioterapia,
    #[serde(rename = "Terapia Ocupacional")]
    TerapiaOcupacional,
    Psicologia,
    Psicopedagogia,
    Neuropsicologia,
    Musicoterapia,
}

impl Specialty {
    pub const ALL: [Specialty; 7] = [
        Specialty::Fonoaudiologia,
        Specialty::Fisioterapia,
        Specialty::TerapiaOcupacional,
        Specialty::Psicologia,
        Specialty::Psicopedagogia,
        Specialty::Neuropsicologia,
        Specialty::Musicoterapia,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Specialty::Fonoaudiologia => "Fonoaudiologia",
            Specialty::Fisioterapia => "Fisioterapia",
            Specialty::TerapiaOcupacional => "Terapia Ocupacional",
            Specialty::Psicologia => "Psicologia",
            Specialty::Psicopedagogia => "Psicopedagogia",
            Specialty::Neuropsicologia => "Neuropsicologia",
            Specialty::Musicoterapia => "Musicoterapia",
        }
    }

    /// Exact, case-sensitive lookup by label.
    pub fn from_string(value: &str) -> Result<Self> {
        Specialty::ALL
            .into_iter()
            .find(|s| s.label() == value)
            .ok_or_else(|| ReceptionError::InvalidSpecialty(value.to_string()))
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse time-of-day bucket of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "Manhã")]
    Morning,
    #[serde(rename = "Tarde")]
    Afternoon,
    #[serde(rename = "Noite")]
    Evening,
}

impl Shift {
    /// Before noon is morning, before 18:00 afternoon, anything later evening.
    pub fn from_start_time(start: NaiveTime) -> Self {
        match start.hour() {
            h if h < 12 => Shift::Morning,
            h if h < 18 => Shift::Afternoon,
            _ => Shift::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shift::Morning => "Manhã",
            Shift::Afternoon => "Tarde",
            Shift::Evening => "Noite",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const ANY_SHIFT_LABEL: &str = "Qualquer horário";

/// Shift a waiting patient is willing to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShiftPreference {
    Any,
    Only(Shift),
}

impl ShiftPreference {
    pub fn from_string(value: &str) -> Result<Self> {
        match value {
            ANY_SHIFT_LABEL => Ok(ShiftPreference::Any),
            "Manhã" => Ok(ShiftPreference::Only(Shift::Morning)),
            "Tarde" => Ok(ShiftPreference::Only(Shift::Afternoon)),
            "Noite" => Ok(ShiftPreference::Only(Shift::Evening)),
            _ => Err(ReceptionError::InvalidShift(value.to_string())),
        }
    }

    pub fn accepts(&self, shift: Shift) -> bool {
        match self {
            ShiftPreference::Any => true,
            ShiftPreference::Only(preferred) => *preferred == shift,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShiftPreference::Any => ANY_SHIFT_LABEL,
            ShiftPreference::Only(shift) => shift.label(),
        }
    }
}

impl TryFrom<String> for ShiftPreference {
    type Error = ReceptionError;

    fn try_from(value: String) -> Result<Self> {
        ShiftPreference::from_string(&value)
    }
}

impl From<ShiftPreference> for String {
    fn from(value: ShiftPreference) -> Self {
        value.label().to_string()
    }
}

/// Priority levels for waiting patients.
///
/// Higher numeric values indicate higher priority, so the derived
/// ordering sorts `High` above `Medium` above `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "baixa")]
    Low = 1,
    #[serde(rename = "media")]
    Medium = 2,
    #[serde(rename = "alta")]
    High = 3,
}

impl Priority {
    pub fn from_string(value: &str) -> Result<Self> {
        match value.to_lowercase().trim() {
            "baixa" => Ok(Priority::Low),
            "media" | "média" => Ok(Priority::Medium),
            "alta" => Ok(Priority::High),
            _ => Err(ReceptionError::InvalidPriority(value.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Priority::Low => "BAIXA",
            Priority::Medium => "MEDIA",
            Priority::High => "ALTA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    #[serde(rename = "aguardando")]
    Waiting,
    #[serde(rename = "agendado")]
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    #[serde(rename = "disponivel")]
    Available,
    #[serde(rename = "ocupado")]
    Booked,
}

/// Form data for a waitlist entry, before the board assigns id and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWaitlistEntry {
    #[serde(rename = "nome_paciente")]
    pub patient_name: String,
    #[serde(rename = "especialidade")]
    pub specialty: Specialty,
    #[serde(
        rename = "terapeuta_preferencia",
        default,
        deserialize_with = "blank_as_none"
    )]
    pub preferred_therapist: Option<String>,
    #[serde(rename = "turno_preferencia")]
    pub shift_preference: ShiftPreference,
    #[serde(rename = "data_solicitacao")]
    pub requested_on: NaiveDate,
    #[serde(rename = "quem_solicitou")]
    pub requested_by: String,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
    #[serde(rename = "observacoes", default)]
    pub notes: String,
    #[serde(rename = "contato_responsavel", default)]
    pub guardian_contact: String,
}

/// A patient waiting for a slot in some specialty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "nome_paciente")]
    pub patient_name: String,
    #[serde(rename = "especialidade")]
    pub specialty: Specialty,
    /// `None` means any therapist will do.
    #[serde(
        rename = "terapeuta_preferencia",
        default,
        deserialize_with = "blank_as_none"
    )]
    pub preferred_therapist: Option<String>,
    #[serde(rename = "turno_preferencia")]
    pub shift_preference: ShiftPreference,
    #[serde(rename = "data_solicitacao")]
    pub requested_on: NaiveDate,
    #[serde(rename = "quem_solicitou")]
    pub requested_by: String,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
    #[serde(rename = "observacoes", default)]
    pub notes: String,
    #[serde(rename = "contato_responsavel", default)]
    pub guardian_contact: String,
    #[serde(rename = "tempo_espera_dias")]
    pub wait_days: i64,
    pub status: EntryStatus,
}

impl WaitlistEntry {
    /// Create a waiting entry from form data with validation.
    pub fn new(form: NewWaitlistEntry, today: NaiveDate) -> Result<Self> {
        let form = form.validated()?;
        Ok(WaitlistEntry {
            id: Uuid::new_v4().to_string(),
            wait_days: wait_days_between(form.requested_on, today),
            patient_name: form.patient_name,
            specialty: form.specialty,
            preferred_therapist: form.preferred_therapist,
            shift_preference: form.shift_preference,
            requested_on: form.requested_on,
            requested_by: form.requested_by,
            priority: form.priority,
            notes: form.notes,
            guardian_contact: form.guardian_contact,
            status: EntryStatus::Waiting,
        })
    }

    /// Overwrite the editable fields, keeping id and status.
    pub fn apply(&mut self, form: NewWaitlistEntry, today: NaiveDate) -> Result<()> {
        let form = form.validated()?;
        self.wait_days = wait_days_between(form.requested_on, today);
        self.patient_name = form.patient_name;
        self.specialty = form.specialty;
        self.preferred_therapist = form.preferred_therapist;
        self.shift_preference = form.shift_preference;
        self.requested_on = form.requested_on;
        self.requested_by = form.requested_by;
        self.priority = form.priority;
        self.notes = form.notes;
        self.guardian_contact = form.guardian_contact;
        Ok(())
    }

    pub fn is_waiting(&self) -> bool {
        self.status == EntryStatus::Waiting
    }
}

impl NewWaitlistEntry {
    fn validated(mut self) -> Result<Self> {
        if self.patient_name.trim().is_empty() {
            return Err(ReceptionError::EmptyField("Patient name"));
        }
        if self.requested_by.trim().is_empty() {
            return Err(ReceptionError::EmptyField("Requester"));
        }
        // The form sends "" for "no preference".
        self.preferred_therapist = self
            .preferred_therapist
            .filter(|therapist| !therapist.trim().is_empty());
        Ok(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(i64),
}

/// Backend ids arrive as numbers; uuids minted here are strings.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RecordId::deserialize(deserializer)? {
        RecordId::Text(text) => text,
        RecordId::Number(number) => number.to_string(),
    })
}

/// Backend records send `""` for "no preference".
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// Whole days since the request, clamped at zero for future-dated requests.
pub fn wait_days_between(requested_on: NaiveDate, today: NaiveDate) -> i64 {
    (today - requested_on).num_days().max(0)
}

/// Form data for an open slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOpenSlot {
    #[serde(rename = "especialidade")]
    pub specialty: Specialty,
    #[serde(rename = "terapeuta")]
    pub therapist: String,
    #[serde(rename = "data_disponivel")]
    pub date: NaiveDate,
    #[serde(rename = "hora_inicio")]
    pub start_time: NaiveTime,
    #[serde(rename = "hora_fim")]
    pub end_time: NaiveTime,
    #[serde(rename = "sala")]
    pub room: String,
    #[serde(rename = "observacoes", default)]
    pub notes: String,
    pub created_by: String,
}

/// An appointment opportunity released for the waitlist.
///
/// The shift is always derived from the start time; a `turno` sent by the
/// backend is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OpenSlotRecord")]
pub struct OpenSlot {
    pub id: String,
    #[serde(rename = "especialidade")]
    pub specialty: Specialty,
    #[serde(rename = "terapeuta")]
    pub therapist: String,
    #[serde(rename = "data_disponivel")]
    pub date: NaiveDate,
    #[serde(rename = "hora_inicio")]
    pub start_time: NaiveTime,
    #[serde(rename = "hora_fim")]
    pub end_time: NaiveTime,
    #[serde(rename = "sala")]
    pub room: String,
    #[serde(rename = "turno")]
    pub shift: Shift,
    #[serde(rename = "observacoes", default)]
    pub notes: String,
    pub created_by: String,
    pub status: SlotStatus,
}

#[derive(Deserialize)]
struct OpenSlotRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(rename = "especialidade")]
    specialty: Specialty,
    #[serde(rename = "terapeuta")]
    therapist: String,
    #[serde(rename = "data_disponivel")]
    date: NaiveDate,
    #[serde(rename = "hora_inicio")]
    start_time: NaiveTime,
    #[serde(rename = "hora_fim")]
    end_time: NaiveTime,
    #[serde(rename = "sala", default)]
    room: String,
    #[serde(rename = "observacoes", default)]
    notes: String,
    #[serde(default)]
    created_by: String,
    status: SlotStatus,
}

impl From<OpenSlotRecord> for OpenSlot {
    fn from(record: OpenSlotRecord) -> Self {
        OpenSlot {
            id: record.id,
            shift: Shift::from_start_time(record.start_time),
            specialty: record.specialty,
            therapist: record.therapist,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            room: record.room,
            notes: record.notes,
            created_by: record.created_by,
            status: record.status,
        }
    }
}

impl OpenSlot {
    /// Create an available slot with validation; the shift comes from the start time.
    pub fn new(form: NewOpenSlot) -> Result<Self> {
        if form.end_time <= form.start_time {
            return Err(ReceptionError::InvalidTimeWindow);
        }
        if form.therapist.trim().is_empty() {
            return Err(ReceptionError::EmptyField("Therapist"));
        }
        if form.created_by.trim().is_empty() {
            return Err(ReceptionError::EmptyField("Creator"));
        }

        Ok(OpenSlot {
            id: Uuid::new_v4().to_string(),
            shift: Shift::from_start_time(form.start_time),
            specialty: form.specialty,
            therapist: form.therapist,
            date: form.date,
            start_time: form.start_time,
            end_time: form.end_time,
            room: form.room,
            notes: form.notes,
            created_by: form.created_by,
            status: SlotStatus::Available,
        })
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// Length of the slot in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Factory function to build waitlist form data from raw form strings.
#[allow(clippy::too_many_arguments)]
pub fn waitlist_form(
    patient_name: &str,
    specialty: &str,
    preferred_therapist: &str,
    shift_preference: &str,
    requested_on: NaiveDate,
    requested_by: &str,
    priority: &str,
    notes: &str,
) -> Result<NewWaitlistEntry> {
    Ok(NewWaitlistEntry {
        patient_name: patient_name.to_string(),
        specialty: Specialty::from_string(specialty)?,
        preferred_therapist: Some(preferred_therapist.to_string()),
        shift_preference: ShiftPreference::from_string(shift_preference)?,
        requested_on,
        requested_by: requested_by.to_string(),
        priority: Priority::from_string(priority)?,
        notes: notes.to_string(),
        guardian_contact: String::new(),
    })
}
