// --- File: crates/services/revolution_backend/src/lib.rs ---
pub mod app;
pub mod service_factory;
