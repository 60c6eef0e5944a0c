pub mod comments;
pub mod common;
pub mod debug;
pub mod help_overlay;
pub mod spinner;
pub mod status_bar;
pub mod stories;
