//! eframe/egui presentation layer.
//!
//! The UI emits [`Message`](crate::message::Message) values; all state
//! mutation goes through the handler layer and the controller.

mod app;
mod info;
mod settings;
mod toolbar;

pub use app::ViewerApp;
