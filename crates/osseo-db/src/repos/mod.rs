//! Repository modules for the audit log and the records background jobs touch.
//!
//! Each module adds methods to `ClinicService` via `impl ClinicService` blocks.

pub mod appointment;
pub mod audit;
pub mod external_link;
pub mod user;
