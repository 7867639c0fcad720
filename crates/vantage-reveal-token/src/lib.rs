//! # Vantage Reveal Token
//!
//! Reveal capability tokens for the Vantage private-banking surface.
//!
//! Disclosure of sensitive balance data is gated behind a second,
//! session-scoped proof of possession: a 4-digit code derived from the login
//! session credential (see `vantage-reveal-code`). Submitting the correct
//! code mints a short-lived capability token; presenting that token on a
//! gated read is the only way the balance is released.
//!
//! ## Flow
//!
//! 1. Client authenticates and receives its session credential. The derived
//!    code is shown once as a login convenience in this simulated product.
//! 2. Client submits the code; [`verify_code_and_issue`] re-derives the
//!    expected value from the session credential, compares, and on match
//!    mints a reveal token bound to the caller's identity.
//! 3. Client presents the token on the [`REVEAL_TOKEN_HEADER`] header of a
//!    sensitive read; [`authorize`] verifies signature, identity, purpose,
//!    and expiry, statelessly and without mutating anything.
//!
//! ## Authority Block
//!
//! ```datalog
//! subject(identity);
//! purpose("balance_reveal");
//! check if actor($a), $a == identity;
//! check if time($time), $time < expiration;
//! ```
//!
//! The token class is deliberately non-delegatable, non-attenuable, and
//! non-revocable: its five-minute lifetime is the sole mitigation against
//! leakage, while the primary session credential keeps its stateful
//! revocation in the auth subsystem. Multiple live tokens per subject are
//! allowed.
//!
//! ## Example
//!
//! ```rust
//! use vantage_reveal_token::{authorize, verify_code_and_issue};
//! use vantage_reveal_code::derive_reveal_code;
//! use vantage_token_core::{KeyPair, TokenTimeConfig};
//!
//! let keypair = KeyPair::new();
//! let session_credential = "eyJhbGciOiJIUzI1NiJ9.eyJpZCI6NDJ9.c2lnbmF0dXJl";
//!
//! let code = derive_reveal_code(session_credential);
//! let token = verify_code_and_issue(
//!     &code,
//!     "cust:42",
//!     session_credential,
//!     &keypair,
//!     TokenTimeConfig::default(),
//! )
//! .expect("correct code mints a token");
//!
//! authorize(&token, "cust:42", keypair.public()).expect("gate accepts");
//! ```

mod exchange;
mod mint;
mod verify;

pub use exchange::verify_code_and_issue;
pub use mint::{RevealCapability, create_reveal_token, create_reveal_token_with_time};
pub use verify::{RevealVerifier, authorize};

// Re-export commonly needed types from core
pub use vantage_token_core::{
    Biscuit, KeyPair, PublicKey, Rejection, TokenError, TokenTimeConfig, biscuit_key_from_string,
    decode_token, encode_token, parse_token,
};

/// Fixed purpose tag carried by every reveal token, distinguishing it from
/// the session credential and any other capability class.
pub const REVEAL_PURPOSE: &str = "balance_reveal";

/// Request header the client presents the reveal token on for gated reads.
pub const REVEAL_TOKEN_HEADER: &str = "x-balance-token";

/// Lifetime of the primary session credential, in seconds. Reveal tokens
/// default to 300 (see [`TokenTimeConfig::default`]), strictly shorter than
/// the session that minted them.
pub const SESSION_DURATION_SECS: i64 = 900;

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_reveal_code::derive_reveal_code;

    #[test]
    fn test_full_reveal_flow() {
        let keypair = KeyPair::new();
        let public_key = keypair.public();

        // Login: session credential issued, code derived for display
        let session_credential = "abc.def.sig1";
        let code = derive_reveal_code(session_credential);
        assert_eq!(code, "9244");

        // Wrong guess first
        assert_eq!(
            verify_code_and_issue(
                "0000",
                "cust:42",
                session_credential,
                &keypair,
                TokenTimeConfig::default(),
            ),
            Err(Rejection::CodeMismatch)
        );

        // Correct echo mints a token the gate accepts, repeatedly
        let token = verify_code_and_issue(
            &code,
            "cust:42",
            session_credential,
            &keypair,
            TokenTimeConfig::default(),
        )
        .expect("correct code should mint");

        assert!(authorize(&token, "cust:42", public_key).is_ok());
        assert!(authorize(&token, "cust:42", public_key).is_ok());

        // The reveal token is not a session credential substitute for anyone else
        assert_eq!(
            authorize(&token, "cust:7", public_key),
            Err(Rejection::InvalidOrExpiredCapability)
        );
    }

    #[test]
    fn test_reveal_token_shorter_than_session() {
        assert!(TokenTimeConfig::default().duration < SESSION_DURATION_SECS);
    }

    #[test]
    fn test_expired_flow() {
        let keypair = KeyPair::new();
        let public_key = keypair.public();
        let session_credential = "abc.def.sig1";
        let code = derive_reveal_code(session_credential);

        // Fast-forward past the window by minting with a backdated start
        let token = verify_code_and_issue(
            &code,
            "cust:42",
            session_credential,
            &keypair,
            TokenTimeConfig {
                start_time: Some(chrono::Utc::now().timestamp() - 600),
                duration: 300,
            },
        )
        .expect("code exchange does not depend on the token window");

        assert_eq!(
            authorize(&token, "cust:42", public_key),
            Err(Rejection::InvalidOrExpiredCapability)
        );
    }
}
