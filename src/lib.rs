//! bizchat library crate
//!
//! A terminal client for a business-assistant backend: chat with the
//! assistant, browse generated FAQs and products, and upload the documents
//! the assistant answers from.

pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod logging;
pub mod session;
pub mod spinner;
pub mod ui;
pub mod upload;
pub mod util;
pub mod view;
