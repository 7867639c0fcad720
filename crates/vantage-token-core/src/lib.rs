//! # Vantage Token Core
//!
//! Core utilities and types shared across Vantage token implementations.
//!
//! This crate provides the common functionality used by the reveal-token
//! crates, including:
//!
//! - Token encoding/decoding utilities
//! - Time configuration for token validity
//! - Common error types, both the detailed internal `TokenError` and the
//!   redacted client-facing `Rejection`
//! - Biscuit type re-exports

pub mod error;
pub mod rule_parser;
pub mod time;
pub mod utils;

pub use error::{CheckFailure, Rejection, TokenError};
pub use rule_parser::parse_check_failure;
pub use time::TokenTimeConfig;
pub use utils::{biscuit_key_from_string, decode_token, encode_token, parse_token};

// Re-export biscuit types that are needed for public API
pub use biscuit_auth::{Biscuit, KeyPair, PublicKey};
