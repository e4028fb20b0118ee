//! Domain types for the grassd processing service.
//!
//! Pure types only: engine configuration, the error taxonomy, module
//! descriptors with the category naming convention, and workspace token
//! generation. Everything that talks to the GRASS binaries lives in
//! `grassd-engine`.

pub mod config;
pub mod error;
pub mod module;
pub mod token;
