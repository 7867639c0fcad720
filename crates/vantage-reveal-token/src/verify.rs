extern crate biscuit_auth as biscuit;

use biscuit::macros::{authorizer, check};
use chrono::Utc;
use tracing::debug;
use vantage_token_core::{Biscuit, PublicKey, Rejection, TokenError, parse_check_failure};

use crate::REVEAL_PURPOSE;

/// Verifier for reveal capability tokens with detailed error reporting.
///
/// Every call is independently verifiable from the token's own contents plus
/// the verification key; the verifier holds no state between calls and
/// mutates nothing.
///
/// The detailed [`TokenError`] result is for internal diagnostics and tests.
/// Anything client-facing must go through [`authorize`], which collapses all
/// failure modes into a single generic rejection.
pub struct RevealVerifier {
    token: String,
    public_key: PublicKey,
    identity: String,
}

impl RevealVerifier {
    /// Creates a new reveal token verifier.
    ///
    /// # Arguments
    /// * `token` - The base64-encoded reveal token to verify
    /// * `public_key` - The public key used to verify the token signature
    /// * `identity` - The authenticated identity presenting the token
    pub fn new(token: String, public_key: PublicKey, identity: String) -> Self {
        Self {
            token,
            public_key,
            identity,
        }
    }

    /// Performs the token verification with the configured parameters.
    ///
    /// Checks, in one authorization pass:
    /// - signature integrity under `public_key`
    /// - the token's subject equals the presenting identity
    /// - the token carries the fixed `balance_reveal` purpose fact
    /// - the expiry instant has not passed
    ///
    /// # Returns
    /// * `Ok(())` - If the token is valid and meets all verification requirements
    /// * `Err(TokenError)` - If verification fails for any reason
    pub fn verify(self) -> Result<(), TokenError> {
        let biscuit = Biscuit::from_base64(&self.token, self.public_key)?;
        let now = Utc::now().timestamp();
        let identity = self.identity.clone();
        let purpose = REVEAL_PURPOSE;

        let authz = authorizer!(
            r#"
                time({now});
                actor({identity});
                allow if true;
            "#
        );

        // The token must carry the fixed purpose fact in its authority block
        let authz = authz.check(check!(r#"check if purpose({purpose});"#))?;

        let mut authz = authz
            .build(&biscuit)
            .map_err(|e| TokenError::internal(format!("Failed to build authorizer: {e}")))?;

        match authz.authorize() {
            Ok(_) => Ok(()),
            Err(e) => Err(convert_reveal_verification_error(e, &self.identity)),
        }
    }
}

/// The capability gate: authorizes one sensitive balance read.
///
/// All failures - missing/garbage token, bad signature, expiry, identity
/// mismatch, wrong purpose - collapse into
/// [`Rejection::InvalidOrExpiredCapability`] so the endpoint cannot be used
/// as an oracle for which condition failed. The differentiated cause is
/// logged at debug level only and never reaches the caller.
///
/// An absent caller identity fails closed with
/// [`Rejection::UpstreamIdentityMissing`]: primary authentication should have
/// rejected the request long before this point.
pub fn authorize(
    capability_token: &str,
    caller_identity: &str,
    public_key: PublicKey,
) -> Result<(), Rejection> {
    if caller_identity.is_empty() {
        debug!("reveal gate reached without an authenticated identity");
        return Err(Rejection::UpstreamIdentityMissing);
    }

    match RevealVerifier::new(
        capability_token.to_string(),
        public_key,
        caller_identity.to_string(),
    )
    .verify()
    {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!("reveal token rejected for {caller_identity}: {e}");
            Err(Rejection::InvalidOrExpiredCapability)
        }
    }
}

/// Convert biscuit authorization errors to detailed reveal-token errors
fn convert_reveal_verification_error(err: biscuit::error::Token, identity: &str) -> TokenError {
    use biscuit::error::{Logic, Token};

    match err {
        Token::FailedLogic(logic_err) => match &logic_err {
            Logic::Unauthorized { checks, .. } | Logic::NoMatchingPolicy { checks } => {
                for failed_check in checks.iter() {
                    let (block_id, check_id, rule) = match failed_check {
                        biscuit::error::FailedCheck::Block(block_check) => (
                            block_check.block_id,
                            block_check.check_id,
                            block_check.rule.clone(),
                        ),
                        biscuit::error::FailedCheck::Authorizer(auth_check) => {
                            (0, auth_check.check_id, auth_check.rule.clone())
                        }
                    };

                    let parsed_error = parse_check_failure(block_id, check_id, &rule);

                    match parsed_error {
                        TokenError::IdentityMismatch { expected, .. } => {
                            return TokenError::IdentityMismatch {
                                expected,
                                actual: identity.to_string(),
                            };
                        }
                        TokenError::Expired { .. }
                        | TokenError::PurposeMismatch { .. }
                        | TokenError::CheckFailed { .. } => return parsed_error,
                        _ => {}
                    }
                }

                TokenError::from(Token::FailedLogic(logic_err))
            }
            other => TokenError::from(Token::FailedLogic(other.clone())),
        },
        other => TokenError::from(other),
    }
}
