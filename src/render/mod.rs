//! Report artifact rendering (text, JSON snapshot, email HTML, chat messages)

pub mod html;
pub mod json;
pub mod message;
pub mod text;

pub use html::EmailRenderer;
pub use json::write_snapshot;
pub use text::write_text_report;
