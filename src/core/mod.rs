//! Core library components.
//!
//! Secret naming, tag resolution, the legacy registry, shell emission and
//! the vault backends. Nothing in here prints; the `cli` module owns output.

pub mod config;
pub mod constants;
pub mod registry;
pub mod resolve;
pub mod secret;
pub mod shell;
pub mod validation;
pub mod vault;
