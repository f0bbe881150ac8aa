pub mod background;
pub mod input;
pub mod messages;
pub mod runtime;

pub use messages::BackgroundMessage;
pub use runtime::run_tui;

use crate::api::Backend;
use std::sync::mpsc;
use std::sync::Arc;

pub struct RuntimeContext<'a> {
    pub backend: Arc<dyn Backend>,
    pub tx: &'a mpsc::Sender<BackgroundMessage>,
}
