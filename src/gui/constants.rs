//! GUI-specific constants for layout and colors

/// Studio window dimensions
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 800.0;
pub const WINDOW_MIN_WIDTH: f32 = 900.0;
pub const WINDOW_MIN_HEIGHT: f32 = 600.0;

/// Layout spacing
pub const PADDING: f32 = 12.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Settings side panel
pub const SETTINGS_PANEL_WIDTH: f32 = 320.0;
pub const HEX_FIELD_WIDTH: f32 = 80.0;

/// Project cards and charts
pub const CARD_WIDTH: f32 = 240.0;
pub const CARD_HEIGHT: f32 = 150.0;
pub const CARD_ROUNDING: f32 = 14.0;
pub const CHART_HEIGHT: f32 = 120.0;

/// Translucent panel fill so the background stays visible
pub const GLASS_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(12, 12, 24, 200);
pub const CARD_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(20, 20, 36, 170);
pub const CARD_SELECTED_STROKE: egui::Color32 = egui::Color32::from_rgb(0, 194, 255);
pub const EFFICIENCY_BAR: egui::Color32 = egui::Color32::from_rgb(75, 80, 230);
pub const CARBON_BAR: egui::Color32 = egui::Color32::from_rgb(212, 52, 254);

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const STATUS_PENDING: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);
