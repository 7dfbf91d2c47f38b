mod appointment;
mod audit;
mod job;
mod user;

pub use appointment::AppointmentCommands;
pub use audit::AuditCommands;
pub use job::JobCommands;
pub use user::UserCommands;
