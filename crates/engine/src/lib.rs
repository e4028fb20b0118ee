//! GRASS engine integration.
//!
//! External command invocation, explicit per-job session handles, the
//! module registry (catalog listing and interface introspection), the job
//! runner, and the workspace reaper.

pub mod command;
pub mod reaper;
pub mod registry;
pub mod runner;
pub mod session;
