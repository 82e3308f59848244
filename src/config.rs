//! Flat-file configuration loading
//!
//! The runner is configured from three text files: the form URL, the option
//! text to submit, and an optional proxy list. The two required files must
//! exist and contain something other than whitespace; the proxy file may be
//! absent, in which case every request goes out directly.

use crate::proxy::{parser, Proxy, ProxyScheme};
use crate::Result;
use anyhow::{bail, Context};
use reqwest::Url;
use std::fs;
use std::path::Path;

/// Loaded run configuration, immutable for the duration of a session
#[derive(Debug, Clone)]
pub struct Config {
    /// Target form endpoint
    pub form_url: Url,
    /// Option text submitted on every request
    pub option_text: String,
    /// Upstream proxies, possibly empty
    pub proxies: Vec<Proxy>,
}

impl Config {
    /// Load configuration from the given files.
    ///
    /// Fails if the URL or option file is missing or whitespace-only, or if
    /// the URL does not parse. A missing proxy file is not an error.
    pub fn load<P: AsRef<Path>>(url_file: P, option_file: P, proxy_file: P) -> Result<Self> {
        let raw_url = read_required(url_file.as_ref(), "form URL")?;
        let form_url = Url::parse(&raw_url)
            .with_context(|| format!("invalid form URL: {}", raw_url))?;

        let option_text = read_required(option_file.as_ref(), "option text")?;
        let proxies = load_proxies(proxy_file.as_ref())?;

        Ok(Self {
            form_url,
            option_text,
            proxies,
        })
    }
}

/// Read a required single-value file, trimmed. Missing or whitespace-only
/// files are configuration errors.
fn read_required(path: &Path, what: &str) -> Result<String> {
    if !path.exists() {
        bail!("{} file not found: {}", what, path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {} file {}", what, path.display()))?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        bail!("{} file is empty: {}", what, path.display());
    }

    Ok(trimmed.to_string())
}

fn load_proxies(path: &Path) -> Result<Vec<Proxy>> {
    if !path.exists() {
        log::info!("proxy file {} not found, using direct connections", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read proxy file {}", path.display()))?;

    let proxies = parser::parse_str(&content, ProxyScheme::Http);

    let candidates = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count();
    if candidates > proxies.len() {
        log::warn!(
            "skipped {} unparseable line(s) in {}",
            candidates - proxies.len(),
            path.display()
        );
    }

    Ok(proxies)
}
