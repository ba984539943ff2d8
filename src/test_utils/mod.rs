//! Test utilities.
//!
//! This module provides:
//! - Test data factories for records, pages and fixed instants
//! - A scripted in-memory `PageSource` that records requests and can inject failures
//!   or cancellation
//! - A progress reporter that keeps every update

mod factories;
mod page_mocks;

pub use factories::*;
pub use page_mocks::*;
