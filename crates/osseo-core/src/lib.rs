//! # osseo-core
//!
//! Core types, ID prefixes, and error types for Osseo.
//!
//! This crate provides the foundational types shared across all Osseo crates:
//! - Entity structs for the audit log and the records background jobs touch
//! - Closed enums for audited entity types, audit actions, and appointment status
//! - ID prefix constants
//! - Cross-cutting error types
//! - Actor identity passed from the request layer into the service
//! - Read models returned to history consumers
//! - Audit metadata sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod responses;
