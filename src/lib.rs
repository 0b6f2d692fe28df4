//! Flux Studio: an architecture-project dashboard whose animated background
//! (three drifting gradient layers plus a noise overlay) is tunable live
//! from a settings panel and persisted between sessions.

#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod color;
pub mod constants;
pub mod gui;
pub mod motion;
pub mod render;
pub mod settings;
