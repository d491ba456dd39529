//! Shared test utilities for invoice-intake integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs against temporary roots
//! - PDF generation and fake collaborators for driving failure paths

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
