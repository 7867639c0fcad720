use tracing::{debug, error};
use vantage_reveal_code::{derive_reveal_code, is_valid_code_format};
use vantage_token_core::{KeyPair, Rejection, TokenTimeConfig};

use crate::mint::RevealCapability;

/// Exchanges a correct reveal code for a freshly minted reveal token.
///
/// The caller is already authenticated: `caller_identity` and
/// `caller_session_credential` come from a validated session, and this
/// function performs no primary authentication of its own. It re-derives the
/// expected code from the session credential and compares it to the
/// submitted one; the expected value is never logged or returned on any
/// path.
///
/// Deliberately not idempotent: each successful call mints an independent
/// token, and concurrent valid tokens for the same subject are allowed.
///
/// # Arguments
/// * `presented_code` - The code the client submitted (must be 4 ASCII digits)
/// * `caller_identity` - The authenticated identity from the session layer
/// * `caller_session_credential` - The exact bearer credential issued at login
/// * `keypair` - The keypair reveal tokens are signed with
/// * `time_config` - Validity window for the minted token (default: 5 minutes)
///
/// # Returns
/// Base64-encoded reveal token on success, a redacted [`Rejection`] otherwise.
pub fn verify_code_and_issue(
    presented_code: &str,
    caller_identity: &str,
    caller_session_credential: &str,
    keypair: &KeyPair,
    time_config: TokenTimeConfig,
) -> Result<String, Rejection> {
    if caller_identity.is_empty() {
        debug!("code exchange reached without an authenticated identity");
        return Err(Rejection::UpstreamIdentityMissing);
    }

    // Malformed and wrong codes are indistinguishable to the caller
    if !is_valid_code_format(presented_code) {
        debug!("reveal code exchange for {caller_identity}: malformed code");
        return Err(Rejection::CodeMismatch);
    }

    let expected = derive_reveal_code(caller_session_credential);
    if presented_code != expected {
        debug!("reveal code exchange for {caller_identity}: code mismatch");
        return Err(Rejection::CodeMismatch);
    }

    RevealCapability::new(caller_identity.to_string(), time_config)
        .issue(keypair)
        .map_err(|e| {
            // Minting from the fixed template should not fail; if it does,
            // fail closed rather than surface internals.
            error!("failed to mint reveal token for {caller_identity}: {e}");
            Rejection::InvalidOrExpiredCapability
        })
}
