pub mod project_board;
pub mod settings_panel;
