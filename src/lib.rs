//! Reception desk core for a therapy clinic.
//!
//! Two pure engines sit behind the front desk screens:
//! - [`access`] decides which pages a signed-in session may open;
//! - [`matcher`] pairs released appointment slots with waiting patients.
//!
//! [`waitlist::WaitlistBoard`] keeps the matches current as the desk edits
//! the waitlist, and [`routes`] holds the page table.

pub mod access;
pub mod error;
pub mod matcher;
pub mod models;
pub mod routes;
pub mod settings;
pub mod waitlist;

pub use access::{can_access, navigate, Navigation, RequiredRole, RouteRequirement};
pub use error::{ReceptionError, Result};
pub use matcher::{compute_matches, Match};
pub use models::{OpenSlot, Priority, Role, Session, Shift, ShiftPreference, Specialty, WaitlistEntry};
pub use routes::{visible_pages, Page};
pub use settings::Settings;
pub use waitlist::{WaitlistBoard, WaitlistStats};
