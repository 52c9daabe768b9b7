//! API Compatibility End-to-End Test Infrastructure
//!
//! This crate holds integration tests that exercise extraction and comparison
//! together, the way a release pipeline uses them:
//!
//! - **Breaking changes**: two versions of a module's facts, extracted and compared
//! - **Persistence**: listings written to disk, reloaded and compared
//! - **Determinism**: repeated extraction yields byte-identical listings
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p apicompat-tests
//! ```
//!
//! ## Determinism Testing
//!
//! ```rust,ignore
//! use apicompat_tests::determinism::verify_determinism;
//!
//! let result = verify_determinism(|| extract_listing(&facts).unwrap().to_json().unwrap(), 3);
//! result.assert_deterministic();
//! ```

pub mod determinism;
pub mod fixtures;

// Re-export commonly used items
pub use determinism::{verify_determinism, DeterminismResult, LineDiff};
pub use fixtures::{ListingDirs, ModuleBuilder};
