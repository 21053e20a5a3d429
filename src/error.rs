/// Error type shared by the reception library and its CLI.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceptionError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("End time must be after start time")]
    InvalidTimeWindow,

    #[error("Invalid role: '{0}'. Must be one of: admin, admin_geral, admin_limitado, recepcao")]
    InvalidRole(String),

    #[error("Invalid specialty: '{0}'")]
    InvalidSpecialty(String),

    #[error("Invalid shift: '{0}'. Must be one of: Manhã, Tarde, Noite, Qualquer horário")]
    InvalidShift(String),

    #[error("Invalid priority: '{0}'. Must be one of: alta, media, baixa")]
    InvalidPriority(String),

    #[error("Unknown page: '{0}'")]
    UnknownPage(String),

    #[error("Waitlist entry not found: {0}")]
    EntryNotFound(String),

    #[error("Open slot not found: {0}")]
    SlotNotFound(String),

    #[error("Waitlist entry {0} is no longer waiting")]
    EntryNotWaiting(String),

    #[error("Open slot {0} is not available")]
    SlotNotAvailable(String),

    #[error("Login response is missing the user payload")]
    MissingUser,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReceptionError>;
