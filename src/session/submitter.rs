//! HTTP submitter for the target form

use crate::proxy::Proxy;
use crate::session::models::SubmissionOutcome;
use crate::Result;
use reqwest::{Client, Proxy as ReqwestProxy, Url};
use std::time::{Duration, Instant};

/// Default timeout for a single submission in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default form field the option text is submitted under
const DEFAULT_FIELD_NAME: &str = "option";

const DEFAULT_USER_AGENT: &str = concat!("form-runner/", env!("CARGO_PKG_VERSION"));

/// Configuration for the form submitter
#[derive(Debug, Clone)]
pub struct SubmitterConfig {
    /// Timeout for each submission
    pub timeout: Duration,
    /// Form field name the option text is sent under
    pub field_name: String,
    /// User agent for HTTP requests
    pub user_agent: String,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SubmitterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_field_name(mut self, field_name: String) -> Self {
        self.field_name = field_name;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Submits the configured option to the target form, optionally through a
/// proxy. A fresh client is built per attempt so each one carries exactly
/// the proxy it was assigned.
pub struct FormSubmitter {
    config: SubmitterConfig,
    form_url: Url,
    option_text: String,
}

impl FormSubmitter {
    /// Create a submitter with default configuration
    pub fn new(form_url: Url, option_text: String) -> Self {
        Self::with_config(form_url, option_text, SubmitterConfig::default())
    }

    /// Create a submitter with custom configuration
    pub fn with_config(form_url: Url, option_text: String, config: SubmitterConfig) -> Self {
        Self {
            config,
            form_url,
            option_text,
        }
    }

    pub fn form_url(&self) -> &Url {
        &self.form_url
    }

    /// Send one submission and classify the outcome. Never returns an error;
    /// every failure mode is folded into the outcome so the loop can continue.
    pub async fn submit(&self, proxy: Option<&Proxy>) -> SubmissionOutcome {
        let start = Instant::now();
        let routed = proxy.cloned();

        let client = match self.create_client(proxy) {
            Ok(client) => client,
            Err(e) => return SubmissionOutcome::network_error(routed, e.to_string()),
        };

        let request = client
            .post(self.form_url.clone())
            .form(&[(self.config.field_name.as_str(), self.option_text.as_str())])
            .send();

        match tokio::time::timeout(self.config.timeout, request).await {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    let elapsed = start.elapsed().as_millis() as u64;
                    SubmissionOutcome::accepted(routed, elapsed)
                } else {
                    SubmissionOutcome::rejected(routed, response.status().to_string())
                }
            }
            Ok(Err(e)) if e.is_timeout() => SubmissionOutcome::timed_out(routed),
            Ok(Err(e)) => SubmissionOutcome::network_error(routed, e.to_string()),
            Err(_) => SubmissionOutcome::timed_out(routed),
        }
    }

    /// Create a reqwest client carrying the given proxy
    fn create_client(&self, proxy: Option<&Proxy>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent);

        if let Some(proxy) = proxy {
            builder = builder.proxy(ReqwestProxy::all(proxy.url())?);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ProxyScheme;

    fn submitter() -> FormSubmitter {
        FormSubmitter::new(
            Url::parse("https://forms.example.com/x").unwrap(),
            "Yes".to_string(),
        )
    }

    #[test]
    fn test_submitter_config_default() {
        let config = SubmitterConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.field_name, DEFAULT_FIELD_NAME);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_submitter_config_builder() {
        let config = SubmitterConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_field_name("entry".to_string())
            .with_user_agent("custom-agent".to_string());

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.field_name, "entry");
        assert_eq!(config.user_agent, "custom-agent");
    }

    #[test]
    fn test_submitter_creation() {
        let submitter = submitter();
        assert_eq!(submitter.form_url().as_str(), "https://forms.example.com/x");
        assert_eq!(submitter.option_text, "Yes");
    }

    #[test]
    fn test_create_client_direct() {
        assert!(submitter().create_client(None).is_ok());
    }

    #[test]
    fn test_create_client_with_proxy() {
        let proxy = Proxy::new("10.0.0.1".to_string(), 8080, ProxyScheme::Http);
        assert!(submitter().create_client(Some(&proxy)).is_ok());
    }

    #[test]
    fn test_create_client_with_socks_proxy() {
        let proxy = Proxy::new("10.0.0.1".to_string(), 1080, ProxyScheme::Socks5);
        assert!(submitter().create_client(Some(&proxy)).is_ok());
    }
}
