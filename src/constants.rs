//! Application-wide constants, grouped by the subsystem that reads them

/// Settings persistence constants
pub mod storage {
    /// Directory under the platform config dir holding persisted records
    pub const APP_DIR: &str = "flux-studio";

    /// Fixed key of the background settings record
    pub const SETTINGS_KEY: &str = "flux_fluid_bg_settings_v1";

    /// File extension used by the file-backed key-value storage
    pub const RECORD_EXTENSION: &str = "json";
}

/// Background animation timing and physics constants
pub mod animation {
    /// Duration of the idle <-> focused variant transition (seconds)
    pub const FOCUS_TRANSITION_SECS: f32 = 2.0;

    /// Duration of the noise overlay opacity tween (seconds)
    pub const NOISE_TRANSITION_SECS: f32 = 1.5;

    /// Longest frame delta fed to the simulation (stalled windows, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Fixed integration step of the pointer spring (seconds)
    pub const SPRING_SUBSTEP: f32 = 1.0 / 240.0;

    /// Spring is considered at rest below this distance from its target (px)
    pub const SPRING_REST_DELTA: f32 = 0.01;

    /// Spring is considered at rest below this speed (px/s)
    pub const SPRING_REST_SPEED: f32 = 0.01;

    /// Direction of the primary layer's linear gradient (CSS degrees)
    pub const GRADIENT_ANGLE_DEG: f32 = 135.0;
}

/// Layer placement relative to the viewport (fractions of width/height)
pub mod layout {
    /// Primary layer: top-left corner sits at (-15%, -15%)
    pub const PRIMARY_INSET: f32 = -0.15;

    /// Secondary layer: bottom-right corner sits at (115%, 115%)
    pub const SECONDARY_INSET: f32 = -0.15;

    /// Accent layer: top edge at 35% of the height
    pub const ACCENT_TOP: f32 = 0.35;

    /// Accent layer: right edge 15% in from the right border
    pub const ACCENT_RIGHT: f32 = 0.15;

    /// Corner radius values at or above this are rendered as a full circle
    pub const CIRCLE_RADIUS_PX: f32 = 9999.0;
}

/// Mock project data source constants
pub mod api {
    /// Simulated latency of `list_projects` (ms)
    pub const LIST_LATENCY_MS: u64 = 800;

    /// Simulated latency of `get_impact` (ms)
    pub const IMPACT_LATENCY_MS: u64 = 600;

    /// Simulated latency of `create_project` (ms)
    pub const CREATE_LATENCY_MS: u64 = 1000;

    /// Simulated latency of `ai_assist` (ms)
    pub const ASSIST_LATENCY_MS: u64 = 1200;

    /// Length of generated project ids (base-36)
    pub const GENERATED_ID_LEN: usize = 9;
}

/// Logging setup
pub mod logging {
    /// Environment variable holding the default log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
}
