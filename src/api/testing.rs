//! Scripted backend for unit tests

use super::{ApiError, Backend, Faq, Product, UploadReceipt};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub replies: Mutex<VecDeque<Result<String, ApiError>>>,
    pub faqs: Mutex<Option<Result<Vec<Faq>, ApiError>>>,
    pub products: Mutex<Option<Result<Vec<Product>, ApiError>>>,
    pub upload_result: Mutex<Option<Result<UploadReceipt, ApiError>>>,
    pub business: Mutex<Option<Result<Option<String>, ApiError>>>,
    pub panic_on_send: bool,
    pub panic_on_faqs: bool,
    pub sent: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<(PathBuf, String)>>,
    pub calls: AtomicUsize,
}

impl FakeBackend {
    pub fn replying(replies: Vec<Result<String, ApiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn with_faqs(self, faqs: Result<Vec<Faq>, ApiError>) -> Self {
        *self.faqs.lock().unwrap() = Some(faqs);
        self
    }

    pub fn with_products(self, products: Result<Vec<Product>, ApiError>) -> Self {
        *self.products.lock().unwrap() = Some(products);
        self
    }

    pub fn with_upload(self, result: Result<UploadReceipt, ApiError>) -> Self {
        *self.upload_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_business(self, name: Option<&str>) -> Self {
        *self.business.lock().unwrap() = Some(Ok(name.map(str::to_string)));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn send_message(&self, message: &str) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(message.to_string());
        if self.panic_on_send {
            panic!("backend exploded");
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".into())))
    }

    async fn get_faqs(&self) -> Result<Vec<Faq>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_faqs {
            panic!("faq generation exploded");
        }
        self.faqs.lock().unwrap().clone().unwrap_or(Ok(Vec::new()))
    }

    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.products.lock().unwrap().clone().unwrap_or(Ok(Vec::new()))
    }

    async fn upload(&self, file: &Path, business_name: &str) -> Result<UploadReceipt, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uploads
            .lock()
            .unwrap()
            .push((file.to_path_buf(), business_name.to_string()));
        self.upload_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ApiError::Rejected("no scripted upload".into())))
    }

    async fn business_info(&self) -> Result<Option<String>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.business.lock().unwrap().clone().unwrap_or(Ok(None))
    }
}
