//! Testing utilities and mock implementations
//!
//! Deterministic failure injectors and a mock suggester so the retry path
//! and the HTTP boundary can be tested without relying on randomness.

pub mod mocks;

pub use mocks::*;
