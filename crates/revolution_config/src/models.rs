// --- File: crates/revolution_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Booking REST backend ---
// The token may be written as "secret_from_env" and is then read from BACKEND_API_TOKEN.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    pub base_url: String, // Mandatory, e.g. https://api.revolutioncarwash.mx/api
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>, // Defaults to the shared client timeout (30s)
}

// --- Scheduling rules ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// IANA timezone used for all wall-clock semantics.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// First bookable time of day, `HH:MM`, inclusive.
    #[serde(default = "default_open_time")]
    pub open_time: String,
    /// Last bookable time of day, `HH:MM`, inclusive.
    #[serde(default = "default_close_time")]
    pub close_time: String,
    #[serde(default = "default_slot_step_minutes")]
    pub slot_step_minutes: u32,
    /// How long the confirmation stays visible before the UI navigates away.
    #[serde(default = "default_success_redirect_ms")]
    pub success_redirect_ms: u64,
}

fn default_timezone() -> String {
    "America/Mexico_City".to_string()
}

fn default_open_time() -> String {
    "09:00".to_string()
}

fn default_close_time() -> String {
    "17:00".to_string()
}

fn default_slot_step_minutes() -> u32 {
    15
}

fn default_success_redirect_ms() -> u64 {
    1200
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            open_time: default_open_time(),
            close_time: default_close_time(),
            slot_step_minutes: default_slot_step_minutes(),
            success_redirect_ms: default_success_redirect_ms(),
        }
    }
}

// --- Logging ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>, // "info" when absent
    pub directory: Option<String>, // enables the rolling file layer
    pub file_prefix: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server and backend config are mandatory
    pub server: ServerConfig,
    pub backend: BackendConfig,

    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Directory with the built frontend assets, served as fallback when set.
    #[serde(default)]
    pub static_dir: Option<String>,
}
