//! HTTP surface: router assembly and shared handler state.

pub mod routes;

pub use routes::{create_router, AppState};
