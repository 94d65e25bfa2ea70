//! Macadamia advisory API: library crate for the HTTP server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `mb-e2e-tests`) can reach `AppState`, `ApiConfig` and
//! `build_router`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
