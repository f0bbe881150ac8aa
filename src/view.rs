//! Panel switching and panel contents
//!
//! The controller never performs I/O. [`ViewController::activate`] returns
//! the loader the caller has to run, and the `apply_*` methods take the
//! loader's result. Results for a panel that is no longer active are
//! discarded.

use crate::api::{ApiError, Faq, Product, UploadReceipt};
use crate::session::{Panel, SessionState};
use crate::upload::{format_size, UploadForm, UploadJob, UploadPanel, UploadRules};
use crate::util::sanitize_display;

pub const NO_FAQS: &str =
    "No FAQs available yet. Upload business documents (F4) to generate them.";
pub const NO_PRODUCTS: &str =
    "No products found. Upload documents that describe your products or services (F4).";

/// Loader the caller must run after an activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelLoad {
    None,
    Faqs,
    Products,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    /// Chat, or nothing at all
    Empty,
    Loading,
    Faqs(Vec<Faq>),
    Products(Vec<Product>),
    /// Guidance shown for an empty list
    Notice(String),
    Error(String),
    Upload(UploadPanel),
}

/// What happened to a finished upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded { business_name: String },
    Failed { message: String },
}

#[derive(Debug)]
pub struct ViewController {
    content: PanelContent,
    highlighted: Option<Panel>,
    scroll: usize,
    /// Uploading state of the job in flight, restored on re-entry
    pending_upload: Option<UploadPanel>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            content: PanelContent::Empty,
            highlighted: None,
            scroll: 0,
            pending_upload: None,
        }
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    pub fn highlighted(&self) -> Option<Panel> {
        self.highlighted
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// Pull the offset back to what the last frame could show.
    pub fn clamp_scroll(&mut self, max_top: usize) {
        self.scroll = self.scroll.min(max_top);
    }

    /// Toggle `panel`: activating the active panel collapses everything.
    pub fn activate(&mut self, state: &mut SessionState, panel: Panel) -> PanelLoad {
        if state.is_active(panel) {
            tracing::debug!(panel = panel.label(), "collapsing panels");
            self.collapse(state);
            return PanelLoad::None;
        }

        let previous = state.set_active_panel(Some(panel));
        tracing::debug!(
            from = previous.map(|p| p.label()).unwrap_or("none"),
            to = panel.label(),
            "switching panel"
        );
        self.highlighted = Some(panel);
        self.scroll = 0;

        match panel {
            Panel::Chat => {
                self.content = PanelContent::Empty;
                PanelLoad::None
            }
            Panel::Faq => {
                self.content = PanelContent::Loading;
                PanelLoad::Faqs
            }
            Panel::Products => {
                self.content = PanelContent::Loading;
                PanelLoad::Products
            }
            Panel::Upload => {
                self.content = PanelContent::Upload(match &self.pending_upload {
                    Some(uploading) => uploading.clone(),
                    None => UploadPanel::Form(UploadForm::new()),
                });
                PanelLoad::None
            }
        }
    }

    /// Make the chat visible without toggling it off.
    pub fn show_chat(&mut self, state: &mut SessionState) {
        if !state.is_active(Panel::Chat) {
            self.activate(state, Panel::Chat);
        }
    }

    pub fn collapse(&mut self, state: &mut SessionState) {
        state.set_active_panel(None);
        self.highlighted = None;
        self.content = PanelContent::Empty;
        self.scroll = 0;
    }

    pub fn apply_faqs(&mut self, state: &SessionState, result: Result<Vec<Faq>, ApiError>) -> bool {
        if !state.is_active(Panel::Faq) {
            tracing::debug!("discarding FAQ load for inactive panel");
            return false;
        }
        self.content = match result {
            Ok(faqs) if faqs.is_empty() => PanelContent::Notice(NO_FAQS.to_string()),
            Ok(faqs) => PanelContent::Faqs(
                faqs.into_iter()
                    .map(|faq| Faq {
                        question: sanitize_display(&faq.question),
                        answer: sanitize_display(&faq.answer),
                    })
                    .collect(),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load FAQs");
                PanelContent::Error(format!("Could not load FAQs. {}", err.user_message()))
            }
        };
        true
    }

    pub fn apply_products(
        &mut self,
        state: &SessionState,
        result: Result<Vec<Product>, ApiError>,
    ) -> bool {
        if !state.is_active(Panel::Products) {
            tracing::debug!("discarding product load for inactive panel");
            return false;
        }
        self.content = match result {
            Ok(products) if products.is_empty() => {
                PanelContent::Notice(NO_PRODUCTS.to_string())
            }
            Ok(products) => PanelContent::Products(
                products
                    .into_iter()
                    .map(|p| Product {
                        name: sanitize_display(&p.name),
                        description: sanitize_display(&p.description),
                        price: sanitize_display(&p.price),
                    })
                    .collect(),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load products");
                PanelContent::Error(format!("Could not load products. {}", err.user_message()))
            }
        };
        true
    }

    /// The upload form, if the panel is currently showing it
    pub fn upload_form_mut(&mut self) -> Option<&mut UploadForm> {
        match &mut self.content {
            PanelContent::Upload(UploadPanel::Form(form)) => Some(form),
            _ => None,
        }
    }

    /// An upload has been dispatched and has not finished yet
    pub fn is_uploading(&self) -> bool {
        self.pending_upload.is_some()
    }

    /// Validate the form. On success the panel switches to its uploading
    /// state and the job to send is returned; on failure the form shows the
    /// error and nothing is returned. Only one upload runs at a time.
    pub fn submit_upload(&mut self, state: &SessionState, rules: &UploadRules) -> Option<UploadJob> {
        if !state.is_active(Panel::Upload) || self.is_uploading() {
            return None;
        }
        let form = self.upload_form_mut()?;
        match form.validate(rules) {
            Ok(job) => {
                let note = (job.size > rules.max_bytes).then(|| {
                    format!(
                        "This file is {}; the server may reject files over {}.",
                        format_size(job.size),
                        format_size(rules.max_bytes)
                    )
                });
                if note.is_some() {
                    tracing::warn!(size = job.size, max = rules.max_bytes, "uploading oversized file");
                }
                let uploading = UploadPanel::Uploading {
                    file_name: job.file_name(),
                    business_name: job.business_name.clone(),
                    note,
                };
                self.pending_upload = Some(uploading.clone());
                self.content = PanelContent::Upload(uploading);
                Some(job)
            }
            Err(err) => {
                tracing::debug!(error = %err, "upload form rejected locally");
                form.error = Some(err.to_string());
                None
            }
        }
    }

    /// Apply the upload result. The business name is recorded even if the
    /// user has since switched panels.
    pub fn finish_upload(
        &mut self,
        state: &mut SessionState,
        job: UploadJob,
        result: Result<UploadReceipt, ApiError>,
    ) -> UploadOutcome {
        self.pending_upload = None;
        let visible = state.is_active(Panel::Upload);
        match result {
            Ok(receipt) => {
                let job = job.resolve(true);
                state.set_business_name(&receipt.business_name);
                tracing::info!(
                    business = %receipt.business_name,
                    id = receipt.business_id.as_deref().unwrap_or("-"),
                    file = %job.file_name(),
                    "upload succeeded"
                );
                let business_name = state
                    .business_name()
                    .unwrap_or(job.business_name.as_str())
                    .to_string();
                if visible {
                    self.content = PanelContent::Upload(UploadPanel::Succeeded {
                        business_name: business_name.clone(),
                        message: receipt.message.as_deref().map(sanitize_display),
                    });
                }
                UploadOutcome::Succeeded { business_name }
            }
            Err(err) => {
                let job = job.resolve(false);
                let message = err.user_message();
                tracing::warn!(error = %err, file = %job.file_name(), "upload failed");
                if visible {
                    self.content = PanelContent::Upload(UploadPanel::Failed {
                        message: sanitize_display(&message),
                        form: job.to_form(),
                    });
                }
                UploadOutcome::Failed { message }
            }
        }
    }

    /// Back to the form after a failure, previous inputs kept.
    pub fn retry_upload(&mut self) -> bool {
        if let PanelContent::Upload(UploadPanel::Failed { form, .. }) = &self.content {
            let form = form.clone();
            self.content = PanelContent::Upload(UploadPanel::Form(form));
            return true;
        }
        false
    }

    /// Start over with an empty form after a success.
    pub fn reset_upload_form(&mut self) -> bool {
        if let PanelContent::Upload(UploadPanel::Succeeded { .. }) = &self.content {
            self.content = PanelContent::Upload(UploadPanel::Form(UploadForm::new()));
            return true;
        }
        false
    }
}
