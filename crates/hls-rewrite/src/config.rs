use std::time::Duration;

use reqwest::Client;

use crate::error::ManifestError;

const DEFAULT_USER_AGENT: &str = concat!("hls-rewrite/", env!("CARGO_PKG_VERSION"));

/// Configurable options for manifest acquisition.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string sent with manifest requests.
    pub user_agent: String,

    /// Overall timeout for the entire HTTP request. Zero disables it.
    pub timeout: Duration,

    /// Connection timeout (time to establish the initial connection).
    pub connect_timeout: Duration,

    /// Whether to follow redirects.
    pub follow_redirects: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            follow_redirects: true,
        }
    }
}

impl FetchConfig {
    /// Creates a reqwest Client with the provided configuration.
    pub fn create_client(&self) -> Result<Client, ManifestError> {
        let mut builder = Client::builder()
            .user_agent(self.user_agent.as_str())
            .redirect(if self.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            });

        if !self.timeout.is_zero() {
            builder = builder.timeout(self.timeout);
        }

        if !self.connect_timeout.is_zero() {
            builder = builder.connect_timeout(self.connect_timeout);
        }

        builder.build().map_err(ManifestError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_a_client() {
        let config = FetchConfig::default();
        assert!(config.user_agent.starts_with("hls-rewrite/"));
        assert!(config.create_client().is_ok());
    }
}
