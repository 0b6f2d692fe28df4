pub mod components;
pub mod constants;
pub mod studio;

pub use studio::run_gui;
