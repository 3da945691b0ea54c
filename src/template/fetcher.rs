//! Resource fetching for local and remote assets
//!
//! This is the only part of the pipeline that does I/O. Each fetch is a
//! single attempt with no retries.

use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::config::TemplateConfig;
use crate::error::TemplateError;

use super::resolver::AssetLocation;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of raw asset bytes
///
/// Hosts can supply their own implementation (caching, sandboxed storage,
/// test doubles) through [`super::SvgTemplate::render_with`].
pub trait ResourceFetcher {
    /// Fetch the complete content at `location`
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>, TemplateError>;
}

/// Default fetcher: the filesystem for local paths, blocking HTTP(S) for URLs
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use svg_template::DefaultFetcher;
///
/// let fetcher = DefaultFetcher::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_verify_tls(true);
/// ```
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    verify_tls: bool,
    timeout: Duration,
}

impl DefaultFetcher {
    /// Create a fetcher with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher using the configured TLS policy and timeout
    pub fn from_config(config: &TemplateConfig) -> Self {
        Self {
            verify_tls: config.verify_tls,
            timeout: config.fetch_timeout,
        }
    }

    /// Enable or disable certificate and hostname verification
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch_local(&self, path: &Path) -> Result<Vec<u8>, TemplateError> {
        std::fs::read(path).map_err(|e| {
            debug!(path:? = path, error:% = e; "Local SVG asset unreadable");
            TemplateError::NotFound {
                path: path.to_path_buf(),
            }
        })
    }

    /// Build the agent for a single request
    ///
    /// A fresh agent per call keeps a disabled verification scoped to it.
    fn agent(&self) -> ureq::Agent {
        let tls = ureq::tls::TlsConfig::builder()
            .disable_verification(!self.verify_tls)
            .build();
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .tls_config(tls)
            .build();
        config.into()
    }

    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, TemplateError> {
        let agent = self.agent();

        debug!(url = url, verify_tls = self.verify_tls; "Fetching remote SVG asset");
        let mut response = agent
            .get(url)
            .call()
            .map_err(|e| TemplateError::fetch(url, e.to_string()))?;

        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TemplateError::fetch(url, e.to_string()))?;

        if bytes.is_empty() {
            return Err(TemplateError::fetch(url, "empty response body"));
        }
        Ok(bytes)
    }
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self {
            verify_tls: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ResourceFetcher for DefaultFetcher {
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>, TemplateError> {
        match location {
            AssetLocation::Local(path) => self.fetch_local(path),
            AssetLocation::External(url) => self.fetch_http(url),
        }
    }
}
