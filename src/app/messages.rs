use crate::api::{ApiError, Faq, Product, UploadReceipt};
use crate::upload::UploadJob;

/// Messages from background tasks to the main UI thread
pub enum BackgroundMessage {
    /// A chat send finished (successfully or not)
    ChatSettled {
        ticket: u64,
        result: Result<String, ApiError>,
    },
    FaqsLoaded(Result<Vec<Faq>, ApiError>),
    ProductsLoaded(Result<Vec<Product>, ApiError>),
    UploadFinished {
        job: UploadJob,
        result: Result<UploadReceipt, ApiError>,
    },
    /// Startup status check
    BusinessInfo(Result<Option<String>, ApiError>),
    /// Generic error (crashed task, etc)
    Error(String),
}
