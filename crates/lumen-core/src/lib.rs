//! Core value types for the Lumen FHIR server.
//!
//! This crate holds the precision-tagged scalar types shared across the
//! server: [`FhirDateTime`] for date/time search literals and [`FhirDecimal`]
//! for exact decimal arithmetic, together with the [`CoreError`] taxonomy.

pub mod decimal;
pub mod error;
pub mod time;

pub use decimal::FhirDecimal;
pub use error::{CoreError, Result};
pub use time::{DatePrecision, FhirDateTime, ZoneSpec};
