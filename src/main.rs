use anyhow::{anyhow, bail, Context, Result};
use bizchat::api::{ApiError, Backend, HttpBackend};
use bizchat::chat::SendPolicy;
use bizchat::config::Config;
use bizchat::logging::{self, LogTarget};
use bizchat::spinner::Spinner;
use bizchat::ui::App;
use bizchat::upload::{format_size, UploadForm};
use bizchat::util::sanitize_display;
use bizchat::view::{NO_FAQS, NO_PRODUCTS};
use clap::Parser;
use std::future::Future;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "bizchat",
    about = "Chat with your business assistant from the terminal",
    version
)]
struct Args {
    /// Backend base URL
    #[arg(long, env = "BIZCHAT_SERVER_URL")]
    server: Option<String>,

    /// Send one message, print the reply and exit
    #[arg(long, value_name = "TEXT")]
    ask: Option<String>,

    /// Print the FAQs and exit
    #[arg(long, conflicts_with_all = ["ask", "products", "upload"])]
    faqs: bool,

    /// Print the product list and exit
    #[arg(long, conflicts_with_all = ["ask", "upload"])]
    products: bool,

    /// Upload a document and exit (requires --business)
    #[arg(long, value_name = "FILE", requires = "business", conflicts_with = "ask")]
    upload: Option<PathBuf>,

    /// Business name for --upload
    #[arg(long, value_name = "NAME")]
    business: Option<String>,

    /// Refuse to chat until a business has uploaded documents
    #[arg(long, conflicts_with = "allow_without_business")]
    require_business: bool,

    /// Let the chat send messages before any upload
    #[arg(long)]
    allow_without_business: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Log file for the interactive client
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

impl Args {
    fn is_one_shot(&self) -> bool {
        self.ask.is_some() || self.faqs || self.products || self.upload.is_some()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    if args.write_config {
        config.save().map_err(|e| anyhow!(e))?;
        println!("Wrote {}", Config::config_location());
        return Ok(());
    }

    let log_target = if args.is_one_shot() {
        LogTarget::Stderr
    } else {
        match config.log_file.clone().or_else(Config::default_log_path) {
            Some(path) => LogTarget::File(path),
            None => LogTarget::Stderr,
        }
    };
    logging::init(log_target)?;

    let backend = HttpBackend::from_config(&config)?;
    tracing::debug!(server = %backend.base_url(), "backend ready");

    if let Some(text) = &args.ask {
        return ask(&backend, &config, text).await;
    }
    if args.faqs {
        return print_faqs(&backend).await;
    }
    if args.products {
        return print_products(&backend).await;
    }
    if let Some(file) = &args.upload {
        let business = args.business.as_deref().unwrap_or_default();
        return upload(&backend, &config, file, business).await;
    }

    let app = App::new(config);
    bizchat::app::run_tui(app, Arc::new(backend)).await
}

/// File, then environment, then flags
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = Config::load();
    config.apply_env();

    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if let Some(secs) = args.timeout {
        config.request_timeout_secs = secs;
    }
    if args.require_business {
        config.send_policy = SendPolicy::RequireBusiness;
    } else if args.allow_without_business {
        config.send_policy = SendPolicy::AllowWithoutBusiness;
    }
    if let Some(path) = &args.log_file {
        config.log_file = Some(path.clone());
    }

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration ({}): {}", Config::config_location(), e))?;
    Ok(config)
}

/// Await a request with a console spinner when stderr is a terminal
async fn with_spinner<T, F>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    if !std::io::stderr().is_terminal() {
        return fut.await;
    }

    let mut spinner = Spinner::new().with_message(message);
    spinner.start();
    tokio::pin!(fut);
    let mut interval = tokio::time::interval(Duration::from_millis(80));
    let result = loop {
        tokio::select! {
            result = &mut fut => break result,
            _ = interval.tick() => spinner.tick(),
        }
    };
    spinner.stop();
    result
}

fn api_failure(err: ApiError) -> anyhow::Error {
    anyhow!(err.user_message())
}

async fn ask(backend: &HttpBackend, config: &Config, text: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Nothing to send");
    }

    if config.send_policy == SendPolicy::RequireBusiness {
        let business = with_spinner("Checking server", backend.business_info())
            .await
            .map_err(api_failure)?;
        if business.is_none() {
            bail!("No business documents uploaded yet. Upload them first with --upload FILE --business NAME.");
        }
    }

    let reply = with_spinner("Waiting for reply", backend.send_message(text))
        .await
        .map_err(api_failure)?;
    println!("{}", sanitize_display(&reply));
    Ok(())
}

async fn print_faqs(backend: &HttpBackend) -> Result<()> {
    let faqs = with_spinner("Loading FAQs", backend.get_faqs())
        .await
        .map_err(api_failure)?;
    if faqs.is_empty() {
        println!("{}", NO_FAQS);
        return Ok(());
    }
    for (i, faq) in faqs.iter().enumerate() {
        println!("{}. {}", i + 1, sanitize_display(&faq.question));
        for line in sanitize_display(&faq.answer).lines() {
            println!("   {}", line);
        }
        println!();
    }
    Ok(())
}

async fn print_products(backend: &HttpBackend) -> Result<()> {
    let products = with_spinner("Loading products", backend.get_products())
        .await
        .map_err(api_failure)?;
    if products.is_empty() {
        println!("{}", NO_PRODUCTS);
        return Ok(());
    }
    for product in &products {
        if product.price.is_empty() {
            println!("- {}", sanitize_display(&product.name));
        } else {
            println!(
                "- {} ({})",
                sanitize_display(&product.name),
                sanitize_display(&product.price)
            );
        }
        for line in sanitize_display(&product.description).lines() {
            println!("  {}", line);
        }
    }
    Ok(())
}

async fn upload(
    backend: &HttpBackend,
    config: &Config,
    file: &std::path::Path,
    business: &str,
) -> Result<()> {
    let rules = config.upload_rules();
    let form = UploadForm::with_values(&file.to_string_lossy(), business);
    let job = form.validate(&rules).context("Upload not sent")?;
    if job.size > rules.max_bytes {
        eprintln!(
            "  Note: {} is {}; the server may reject files over {}.",
            job.file_name(),
            format_size(job.size),
            format_size(rules.max_bytes)
        );
    }

    let label = format!("Uploading {}", job.file_name());
    let receipt = with_spinner(&label, backend.upload(&job.file, &job.business_name))
        .await
        .map_err(api_failure)?;
    tracing::info!(business = %receipt.business_name, id = ?receipt.business_id, "upload accepted");
    println!(
        "{}",
        receipt
            .message
            .as_deref()
            .map(sanitize_display)
            .unwrap_or_else(|| format!("Documents processed for {}", receipt.business_name))
    );
    Ok(())
}
