//! Key ring test suite
//!
//! Organized into ring scenarios, lock/unlock security tests, expiry
//! filtering and property tests

mod property_tests;

// Test helpers and fixtures
pub mod helpers;
