//! Background render surface: frame composition and egui painting

pub mod paint;
pub mod surface;

pub use paint::{load_noise_texture, paint_frame};
pub use surface::{Fill, Frame, LayerDraw, NoiseDraw, RenderSurface};
