//! Domain layer containing business entities and contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`validation`] - Click validation oracle
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business logic lives in [`crate::application::services`].
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler receives a redirect request
//! 2. [`crate::application::services::RedirectService`] resolves the short code
//! 3. [`crate::application::services::ClickRecorder`] inserts the click, asks the
//!    [`validation::ClickValidator`] once and stores the outcome
//! 4. [`crate::application::services::MonthlyLedger`] updates the monthly aggregate
//!    inside the same [`repositories::ClickTransaction`]

pub mod entities;
pub mod repositories;
pub mod validation;
