//! Trust scoring and private blog network (PBN) risk detection for domains
//! proposed as link-building targets.
//!
//! The engine in [`vetting`] is pure: hand it a [`vetting::RecordSet`] and a
//! [`vetting::FlexibilityLevel`] and it returns one [`vetting::DomainAssessment`]
//! per row. Configuration, telemetry and the error type serve the binaries built
//! on top of it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod vetting;

pub use error::AppError;
