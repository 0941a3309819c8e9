//! SNILS validation and extraction
//!
//! This crate provides tools for working with SNILS, the Russian individual
//! insurance account number (9-digit body followed by a 2-digit checksum):
//! - Checksum computation and validation
//! - Canonical `XXX-XXX-XXX YY` formatting
//! - Extraction of candidate numbers from free-form text

pub mod extractors;
pub mod validators;

pub use extractors::*;
pub use validators::*;
