//! Entity structs for the Osseo records touched by the audit and job core.
//!
//! Each entity maps to a table in the libSQL database (see `osseo-db`
//! migrations). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON output and schema export.

mod appointment;
mod audit;
mod external_link;
mod user;

pub use appointment::Appointment;
pub use audit::{AuditEntry, NewAuditEntry};
pub use external_link::AppointmentExternalLink;
pub use user::User;
