pub mod app;
pub mod card_view;
pub mod status_panel;
pub mod theme;
pub mod top_bar;

pub use app::TorchLearnApp;
