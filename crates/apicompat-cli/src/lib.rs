//! apicompat CLI library.
//!
//! This crate provides input loading, exclusions parsing and the command
//! implementations behind the `apicompat` binary.

pub mod commands;
pub mod exclusions;
pub mod input;
