//! HTTP façade for the grassd processing service.
//!
//! A thin transport layer: translates the registry's and job runner's
//! operations into JSON request/response bodies and maps domain errors
//! onto HTTP statuses. All processing semantics live in `grassd-engine`.

pub mod config;
pub mod error;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
