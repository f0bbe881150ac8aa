//! Background task handling for bizchat
//!
//! Every network call runs as a tokio task and reports back through the
//! `BackgroundMessage` channel; the UI loop applies the results in
//! `drain_messages`, so all state mutation stays on the UI thread.
//!
//! Channel sends use `let _ =`: if the receiver is gone the app is shutting
//! down and nobody is waiting for the result.

use crate::api::ApiError;
use crate::app::messages::BackgroundMessage;
use crate::app::RuntimeContext;
use crate::chat::{self, PendingSend};
use crate::ui::App;
use crate::upload::UploadJob;
use crate::util::{panic_detail, truncate};
use crate::view::{PanelLoad, UploadOutcome};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;

pub fn drain_messages(app: &mut App, rx: &mpsc::Receiver<BackgroundMessage>) {
    while let Ok(msg) = rx.try_recv() {
        apply_message(app, msg);
    }
}

pub fn apply_message(app: &mut App, msg: BackgroundMessage) {
    match msg {
        BackgroundMessage::ChatSettled { ticket, result } => {
            app.chat.settle(&mut app.state, ticket, result);
        }
        BackgroundMessage::FaqsLoaded(result) => {
            app.view.apply_faqs(&app.state, result);
        }
        BackgroundMessage::ProductsLoaded(result) => {
            app.view.apply_products(&app.state, result);
        }
        BackgroundMessage::UploadFinished { job, result } => {
            let business_before = app.state.business_name().map(str::to_string);
            match app.view.finish_upload(&mut app.state, job, result) {
                UploadOutcome::Succeeded { business_name } => {
                    app.show_toast(&format!("+ Documents processed for {}", business_name));
                    if app.config.announce_uploads {
                        app.chat.announce_business(&business_name);
                    }
                    if business_before.as_deref() != Some(business_name.as_str()) {
                        tracing::info!(business = %business_name, "active business changed");
                    }
                }
                UploadOutcome::Failed { message } => {
                    if !app.state.is_active(crate::session::Panel::Upload) {
                        app.show_toast(&format!("Upload failed: {}", truncate(&message, 80)));
                    }
                }
            }
        }
        BackgroundMessage::BusinessInfo(result) => {
            match result {
                Ok(Some(name)) => {
                    app.state.set_business_name(&name);
                    tracing::info!(business = %name, "server has an active business");
                }
                Ok(None) => {
                    tracing::info!("no active business on the server yet");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "startup status check failed");
                    app.show_toast(&format!(
                        "Server check failed: {}",
                        truncate(&err.user_message(), 80)
                    ));
                }
            }
            if app.chat.transcript().is_empty() {
                app.chat.greet(&app.state);
            }
        }
        BackgroundMessage::Error(e) => {
            tracing::error!(error = %e, "background task error");
            app.show_toast(&format!("Error: {}", truncate(&e, 80)));
        }
    }
}

/// Dispatch a chat send. The task always answers with `ChatSettled`, even
/// if the request panics.
pub fn spawn_chat_send(ctx: &RuntimeContext, pending: PendingSend) {
    let backend = ctx.backend.clone();
    let tx = ctx.tx.clone();
    spawn_background(ctx.tx.clone(), "send_message", async move {
        let result = chat::dispatch(backend.as_ref(), &pending.text).await;
        let _ = tx.send(BackgroundMessage::ChatSettled {
            ticket: pending.ticket,
            result,
        });
    });
}

/// Run the loader an activation asked for.
pub fn spawn_panel_load(ctx: &RuntimeContext, load: PanelLoad) {
    let backend = ctx.backend.clone();
    let tx = ctx.tx.clone();
    match load {
        PanelLoad::None => {}
        PanelLoad::Faqs => spawn_background(ctx.tx.clone(), "get_faqs", async move {
            let result = guarded(backend.get_faqs()).await;
            let _ = tx.send(BackgroundMessage::FaqsLoaded(result));
        }),
        PanelLoad::Products => spawn_background(ctx.tx.clone(), "get_products", async move {
            let result = guarded(backend.get_products()).await;
            let _ = tx.send(BackgroundMessage::ProductsLoaded(result));
        }),
    }
}

/// Send a validated upload. Like chat sends, this always reports back so
/// the panel never stays stuck in its uploading state.
pub fn spawn_upload(ctx: &RuntimeContext, job: UploadJob) {
    let backend = ctx.backend.clone();
    let tx = ctx.tx.clone();
    spawn_background(ctx.tx.clone(), "upload", async move {
        let result = guarded(backend.upload(&job.file, &job.business_name)).await;
        let _ = tx.send(BackgroundMessage::UploadFinished { job, result });
    });
}

/// Run a request, turning a panic into `ApiError::Crashed` so the waiting
/// panel always gets a result.
async fn guarded<T, F>(request: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match AssertUnwindSafe(request).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let detail = panic_detail(panic);
            tracing::error!(%detail, "backend request panicked");
            Err(ApiError::Crashed(detail))
        }
    }
}

pub fn spawn_business_check(ctx: &RuntimeContext) {
    let backend = ctx.backend.clone();
    let tx = ctx.tx.clone();
    spawn_background(ctx.tx.clone(), "get_business_info", async move {
        let result = backend.business_info().await;
        let _ = tx.send(BackgroundMessage::BusinessInfo(result));
    });
}

pub fn spawn_background<F>(tx: mpsc::Sender<BackgroundMessage>, task_name: &'static str, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let detail = panic_detail(panic);
            tracing::error!(task = task_name, %detail, "background task panicked");
            let _ = tx.send(BackgroundMessage::Error(format!(
                "Background task '{}' crashed unexpectedly: {}",
                task_name, detail
            )));
        }
    });
}
