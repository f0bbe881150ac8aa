//! Session cookie persistence
//!
//! The server tracks the active business in its session cookie. Saving that
//! cookie lets a later run talk to the same business, so `--ask` works after
//! an earlier `--upload`.

use crate::config::write_private_file;
use reqwest::cookie::{CookieStore, Jar};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Debug, Serialize, Deserialize)]
struct SavedSession {
    server_url: String,
    /// `name=value` pairs as the server last sent them
    cookies: Vec<String>,
}

/// Cookie jar shared with the HTTP client, optionally backed by a file
pub struct SessionCookies {
    jar: Arc<Jar>,
    server: Url,
    path: Option<PathBuf>,
    last_saved: Mutex<Vec<String>>,
}

impl SessionCookies {
    /// A jar that lives as long as the process
    pub fn in_memory(server: &Url) -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            server: server.clone(),
            path: None,
            last_saved: Mutex::new(Vec::new()),
        }
    }

    /// A jar seeded from `path`. Cookies saved for another server are ignored.
    pub fn persistent(server: &Url, path: PathBuf) -> Self {
        let jar = Jar::default();
        let cookies = load_cookies(&path, server);
        for cookie in &cookies {
            jar.add_cookie_str(&format!("{}; Path=/", cookie), server);
        }
        if !cookies.is_empty() {
            tracing::debug!(path = %path.display(), count = cookies.len(), "restored server session");
        }

        Self {
            jar: Arc::new(jar),
            server: server.clone(),
            path: Some(path),
            last_saved: Mutex::new(cookies),
        }
    }

    pub fn jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    /// Cookies the jar would send to the server right now
    pub fn current(&self) -> Vec<String> {
        self.jar
            .cookies(&self.server)
            .and_then(|header| header.to_str().ok().map(split_cookie_header))
            .unwrap_or_default()
    }

    /// Write the jar to disk if it changed since the last write. Failures are
    /// logged; the in-memory session keeps working.
    pub fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let current = self.current();
        let mut last_saved = match self.last_saved.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *last_saved == current {
            return;
        }

        let saved = SavedSession {
            server_url: self.server.to_string(),
            cookies: current.clone(),
        };
        let written = serde_json::to_string_pretty(&saved)
            .map_err(|e| e.to_string())
            .and_then(|content| write_private_file(path, &content));
        match written {
            Ok(()) => {
                tracing::debug!(path = %path.display(), count = current.len(), "saved server session");
                *last_saved = current;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to save server session");
            }
        }
    }
}

fn split_cookie_header(header: &str) -> Vec<String> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .map(str::to_string)
        .collect()
}

fn load_cookies(path: &Path, server: &Url) -> Vec<String> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str::<SavedSession>(&content) {
        Ok(saved) if saved.server_url == server.as_str() => saved.cookies,
        Ok(saved) => {
            tracing::debug!(saved = %saved.server_url, server = %server, "ignoring session for another server");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable session file");
            Vec::new()
        }
    }
}
