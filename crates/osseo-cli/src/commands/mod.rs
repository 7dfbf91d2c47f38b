pub mod appointment;
pub mod audit;
pub mod dispatch;
pub mod job;
pub mod serve;
pub mod shared;
pub mod user;
