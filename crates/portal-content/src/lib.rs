//! Static patient-facing content for the testing portal.
//!
//! This crate provides the translation catalog and the terms of service
//! document shown in the patient time-of-test flow.

pub mod i18n;
pub mod tos;

pub use i18n::{Catalog, CatalogError, TextProvider};
pub use tos::*;
