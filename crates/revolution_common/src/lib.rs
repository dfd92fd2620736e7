// --- File: crates/revolution_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error taxonomy and HTTP status mapping
pub mod handlers; // Shared HTTP handlers
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Appointment, blackout day and vehicle models
pub mod routes; // Shared route definitions
pub mod services; // Backend collaborator abstractions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, not_found, validation_error, BackendError, ErrorKind,
    HttpStatusCode, RevolutionError,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, DEFAULT_TIMEOUT_SECS},
    IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init_with_config, init_with_level};
