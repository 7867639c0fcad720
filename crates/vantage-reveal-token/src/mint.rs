extern crate biscuit_auth as biscuit;

use biscuit::macros::biscuit;
use chrono::Utc;
use std::error::Error;
use tracing::info;
use vantage_token_core::{KeyPair, TokenTimeConfig};

use crate::REVEAL_PURPOSE;

/// Builder for creating reveal capability tokens.
///
/// A reveal token authorizes exactly one class of sensitive read (balance
/// disclosure) for exactly one subject, for a short window. It is minted only
/// after the subject proved possession of their session credential via the
/// reveal code exchange.
///
/// # Example
/// ```rust
/// use vantage_reveal_token::RevealCapability;
/// use vantage_token_core::{KeyPair, TokenTimeConfig};
///
/// let keypair = KeyPair::new();
///
/// let token = RevealCapability::new("cust:42".to_string(), TokenTimeConfig::default())
///     .issue(&keypair)
///     .expect("Failed to create reveal token");
/// ```
pub struct RevealCapability {
    subject: String,
    time_config: TokenTimeConfig,
}

impl RevealCapability {
    /// Creates a new reveal token builder.
    ///
    /// # Arguments
    /// * `subject` - The authenticated identity the token is bound to
    /// * `time_config` - Time configuration for token validity
    pub fn new(subject: String, time_config: TokenTimeConfig) -> Self {
        Self {
            subject,
            time_config,
        }
    }

    /// Issues (builds and signs) the reveal token.
    ///
    /// The authority block contains:
    /// - `subject({subject})` and `purpose("balance_reveal")` facts
    /// - `check if actor($a), $a == {subject}` - only the bound identity may present it
    /// - time expiration check
    ///
    /// # Arguments
    /// * `keypair` - The keypair to sign the token with
    ///
    /// # Returns
    /// Base64-encoded biscuit token
    pub fn issue(self, keypair: &KeyPair) -> Result<String, Box<dyn Error>> {
        let start_time = self
            .time_config
            .start_time
            .unwrap_or_else(|| Utc::now().timestamp());
        let expiration = start_time + self.time_config.duration;

        let subject = self.subject;
        let purpose = REVEAL_PURPOSE;

        let builder = biscuit!(
            r#"
                subject({subject});
                purpose({purpose});
                check if actor($a), $a == {subject};
                check if time($time), $time < {expiration};
            "#
        );

        let biscuit = builder.build(keypair)?;
        info!("reveal biscuit (authority): {}", biscuit);
        let token = biscuit.to_base64()?;
        Ok(token)
    }
}

/// Creates a base64-encoded reveal token with default time configuration (5 minutes).
pub fn create_reveal_token(subject: String, key: &KeyPair) -> Result<String, Box<dyn Error>> {
    RevealCapability::new(subject, TokenTimeConfig::default()).issue(key)
}

/// Creates a base64-encoded reveal token with custom time configuration.
pub fn create_reveal_token_with_time(
    subject: String,
    key: &KeyPair,
    time_config: TokenTimeConfig,
) -> Result<String, Box<dyn Error>> {
    RevealCapability::new(subject, time_config).issue(key)
}
