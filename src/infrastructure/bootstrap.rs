//! Composition root: builds the control-plane client from configuration.

use tracing::{debug, warn};

use crate::adapter::outbound::http::HttpTransport;
use crate::adapter::outbound::zeabur::ZeaburClient;
use crate::application::resilient::ResilientClient;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// The production client: reqwest transport, retry policy, typed operations.
pub type Client = ZeaburClient<HttpTransport>;

/// Wire the client from `config`.
///
/// # Errors
///
/// Fails with a configuration error when the credential is missing, before
/// any network call is attempted.
pub fn build_client(config: &Config) -> Result<Client> {
    let token = config.require_token()?;
    let transport = HttpTransport::from_config(&config.api, token)?;
    let policy = config.api.retry_policy();
    debug!(
        endpoint = %transport.endpoint(),
        max_attempts = policy.max_attempts(),
        base_delay = ?policy.base_delay(),
        "Control-plane client ready"
    );
    if config.api.allow_insecure_tls_fallback {
        warn!("Insecure TLS fallback is enabled; a failed handshake may be retried without certificate verification");
    }
    let api = ResilientClient::new(transport, policy)
        .with_insecure_tls_fallback(config.api.allow_insecure_tls_fallback);
    Ok(ZeaburClient::new(api))
}
