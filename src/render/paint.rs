//! egui painter for [`Frame`]s
//!
//! Each layer becomes a triangle-fan mesh: an opaque core plus a feathered
//! ring whose alpha falls to zero, which stands in for the CSS blur. Gradient
//! fills are per-vertex colors. `screen` is drawn additively; the other blend
//! modes fall back to normal alpha blending. The noise tile is alpha-blended
//! white at the overlay opacity rather than overlay-blended.

use egui::{self, Color32, ColorImage, Mesh, Rect, Shape, TextureHandle, TextureOptions, pos2, vec2};
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

use super::surface::{Fill, Frame, LayerDraw};
use crate::color::Rgb;
use crate::settings::BlendMode;

/// Segments per rounded corner (a quarter circle)
const CORNER_SEGMENTS: usize = 12;

/// Edge length of the generated noise tile (px)
pub const NOISE_TEXTURE_SIZE: usize = 128;

/// Paint a full frame into `rect`
pub fn paint_frame(painter: &egui::Painter, rect: Rect, frame: &Frame, noise: Option<&TextureHandle>) {
    painter.rect_filled(rect, 0.0, rgb_to_color32(frame.background));

    for draw in frame.layers.iter() {
        painter.add(Shape::mesh(layer_mesh(draw, rect)));
    }

    if let (Some(overlay), Some(texture)) = (frame.noise, noise) {
        let tile = overlay.tile_px.unwrap_or(NOISE_TEXTURE_SIZE as f32).max(1.0);
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(rect.width() / tile, rect.height() / tile));
        painter.image(texture.id(), rect, uv, noise_tint(overlay.opacity));
    }
}

/// Plain alpha-blended white; there is no overlay blend to draw the noise with
fn noise_tint(opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_white_alpha(alpha)
}

/// Grayscale noise tile, repeated across the viewport
pub fn load_noise_texture(ctx: &egui::Context) -> TextureHandle {
    let mut rng = rand::rng();
    let pixels: Vec<u8> = (0..NOISE_TEXTURE_SIZE * NOISE_TEXTURE_SIZE)
        .flat_map(|_| {
            let v: u8 = rng.random();
            [v, v, v, 255]
        })
        .collect();
    let image = ColorImage::from_rgba_unmultiplied([NOISE_TEXTURE_SIZE, NOISE_TEXTURE_SIZE], &pixels);
    ctx.load_texture("background-noise", image, TextureOptions::NEAREST_REPEAT)
}

/// Mesh of one layer: anchored, translated, scaled and rotated
pub fn layer_mesh(draw: &LayerDraw, viewport: Rect) -> Mesh {
    let bounds = draw.bounds(viewport.width(), viewport.height());
    let (cx, cy) = bounds.center();
    let center = pos2(viewport.min.x + cx + draw.translate.x, viewport.min.y + cy + draw.translate.y);

    let half = (bounds.size * draw.pose.scale / 2.0).max(0.0);
    let feather = draw.blur_px.max(0.0);
    let inner_half = (half - feather / 2.0).max(0.0);
    let outer_half = half + feather / 2.0;
    let corner = draw.corner_radius_px.unwrap_or(f32::INFINITY);

    let inner = rounded_square(inner_half, corner.min(inner_half));
    let outer = rounded_square(outer_half, (corner + feather / 2.0).min(outer_half));

    let rotation = draw.pose.rotation_deg.to_radians();
    let (sin, cos) = rotation.sin_cos();
    let place = |local: egui::Vec2| center + vec2(local.x * cos - local.y * sin, local.x * sin + local.y * cos);

    let opacity = draw.pose.opacity.clamp(0.0, 1.0);
    let color_at = |local: egui::Vec2, alpha: f32| {
        let rgb = match draw.fill {
            Fill::Solid(rgb) => rgb,
            Fill::LinearGradient { start, end, angle_deg } => {
                start.lerp(end, gradient_t(local, outer_half, angle_deg))
            }
        };
        blend_color(rgb, alpha, draw.blend)
    };

    let mut mesh = Mesh::default();
    let hub = mesh.vertices.len() as u32;
    mesh.colored_vertex(center, color_at(egui::Vec2::ZERO, opacity));

    let ring = inner.len() as u32;
    for local in inner.iter() {
        mesh.colored_vertex(place(*local), color_at(*local, opacity));
    }
    for local in outer.iter() {
        mesh.colored_vertex(place(*local), color_at(*local, 0.0));
    }

    for i in 0..ring {
        let next = (i + 1) % ring;
        let (inner_a, inner_b) = (hub + 1 + i, hub + 1 + next);
        let (outer_a, outer_b) = (hub + 1 + ring + i, hub + 1 + ring + next);
        mesh.add_triangle(hub, inner_a, inner_b);
        mesh.add_triangle(inner_a, outer_a, outer_b);
        mesh.add_triangle(inner_a, outer_b, inner_b);
    }
    mesh
}

/// Outline of a square of half-extent `half` with corner radius `radius`,
/// centered on the origin. Always `4 * (CORNER_SEGMENTS + 1)` points so
/// inner and outer outlines pair up index by index.
fn rounded_square(half: f32, radius: f32) -> Vec<egui::Vec2> {
    let radius = radius.clamp(0.0, half);
    let straight = half - radius;
    let corners = [
        (vec2(straight, straight), 0.0),
        (vec2(-straight, straight), FRAC_PI_2),
        (vec2(-straight, -straight), 2.0 * FRAC_PI_2),
        (vec2(straight, -straight), 3.0 * FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (corner_center, start_angle) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = start_angle + FRAC_PI_2 * step as f32 / CORNER_SEGMENTS as f32;
            points.push(corner_center + radius * vec2(angle.cos(), angle.sin()));
        }
    }
    points
}

/// Position along a CSS linear gradient, 0 at the start color
fn gradient_t(local: egui::Vec2, half: f32, angle_deg: f32) -> f32 {
    if half <= 0.0 {
        return 0.0;
    }
    // CSS angles: 0deg points up, increasing clockwise (y grows downward)
    let angle = angle_deg.to_radians();
    let direction = vec2(angle.sin(), -angle.cos());
    let reach = half * (direction.x.abs() + direction.y.abs());
    (local.dot(direction) / reach * 0.5 + 0.5).clamp(0.0, 1.0)
}

fn blend_color(rgb: Rgb, alpha: f32, mode: BlendMode) -> Color32 {
    let alpha = alpha.clamp(0.0, 1.0);
    match mode {
        // Premultiplied color with zero alpha adds onto what is underneath
        BlendMode::Screen => {
            let scale = |c: u8| (c as f32 * alpha).round() as u8;
            Color32::from_rgba_premultiplied(scale(rgb.r), scale(rgb.g), scale(rgb.b), 0)
        }
        BlendMode::Overlay | BlendMode::SoftLight | BlendMode::Normal | BlendMode::Multiply => {
            Color32::from_rgba_unmultiplied(rgb.r, rgb.g, rgb.b, (alpha * 255.0).round() as u8)
        }
    }
}

fn rgb_to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}
