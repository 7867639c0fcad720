//! # Vantage Reveal Code
//!
//! Deterministic derivation of the per-session reveal code.
//!
//! A login session's bearer credential deterministically yields a 4-digit
//! code. The code is never stored: both the login surface (which displays it
//! to the user in the simulated product) and the verify endpoint (which
//! checks the user's echo of it) recompute it from the same credential
//! string. That makes byte-exactness of the credential the load-bearing
//! invariant - the derivation must see the exact bytes issued at login, with
//! no trimming, re-encoding, or case normalization anywhere between issuance
//! and verification.
//!
//! ## Derivation
//!
//! SHA-256 over the credential bytes; the first four digest bytes read as a
//! big-endian u32; reduced mod 10000; zero-padded to four digits. The
//! function is total: any string input, including the empty string, yields a
//! well-formed code.

use sha2::{Digest, Sha256};

/// Number of decimal digits in a reveal code.
pub const CODE_LENGTH: usize = 4;

/// Size of the code space (10^CODE_LENGTH).
const CODE_SPACE: u32 = 10_000;

/// Derives the 4-digit reveal code for a session credential.
///
/// Pure and deterministic: byte-identical input yields the identical code
/// within and across process restarts. No salt, no server-side state, no
/// time dependence.
///
/// # Example
/// ```rust
/// use vantage_reveal_code::derive_reveal_code;
///
/// let code = derive_reveal_code("abc.def.sig1");
/// assert_eq!(code.len(), 4);
/// assert_eq!(code, derive_reveal_code("abc.def.sig1"));
/// ```
pub fn derive_reveal_code(session_credential: &str) -> String {
    let digest = Sha256::digest(session_credential.as_bytes());
    // Equivalent to reading the first 8 hex characters of the digest
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    format!("{:04}", prefix % CODE_SPACE)
}

/// Checks that a client-submitted code is exactly four ASCII digits.
///
/// Boundary schema check for the verify endpoint: anything else is rejected
/// before the value reaches the comparison, without distinguishing malformed
/// from merely wrong.
pub fn is_valid_code_format(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let credential = "eyJhbGciOiJIUzI1NiJ9.eyJpZCI6NDJ9.c2lnbmF0dXJl";
        let first = derive_reveal_code(credential);
        for _ in 0..10 {
            assert_eq!(
                derive_reveal_code(credential),
                first,
                "repeated derivation must be stable"
            );
        }
    }

    #[test]
    fn test_known_vectors() {
        // Stable for this derivation across releases; a change here is a
        // breaking change that invalidates every displayed code.
        assert_eq!(derive_reveal_code("abc.def.sig1"), "9244");
        assert_eq!(derive_reveal_code(""), "2610");
    }

    #[test]
    fn test_leading_zero_padding() {
        assert_eq!(derive_reveal_code("b"), "0566");
    }

    #[test]
    fn test_format_of_derived_codes() {
        let samples = [
            "",
            "a",
            "abc.def.sig1",
            "eyJhbGciOiJIUzI1NiJ9.eyJpZCI6NDJ9.c2lnbmF0dXJl",
            "some much longer credential string with spaces and \u{00e9} unicode",
        ];
        for credential in samples {
            let code = derive_reveal_code(credential);
            assert!(
                is_valid_code_format(&code),
                "derived code {code:?} for {credential:?} is not 4 ASCII digits"
            );
        }
    }

    #[test]
    fn test_single_character_sensitivity() {
        let base = "eyJhbGciOiJIUzI1NiJ9.eyJpZCI6NDJ9.c2lnbmF0dXJl";
        let original = derive_reveal_code(base);
        assert_eq!(original, "4340");

        for i in 0..base.len() {
            let replacement = if base.as_bytes()[i] == b'x' { "X" } else { "x" };
            let mutated = format!("{}{}{}", &base[..i], replacement, &base[i + 1..]);
            assert_ne!(
                derive_reveal_code(&mutated),
                original,
                "mutation at byte {i} collided with the original code"
            );
        }
    }

    #[test]
    fn test_no_implicit_trimming() {
        // Whitespace is part of the input; a credential that picks up a stray
        // space on the wire must derive a different code, not be normalized.
        assert_ne!(
            derive_reveal_code("abc.def.sig1 "),
            derive_reveal_code("abc.def.sig1")
        );
        assert_eq!(derive_reveal_code("abc.def.sig1 "), "8080");
    }

    #[test]
    fn test_consistency_across_bearer_header_round_trip() {
        // The credential travels as "Authorization: Bearer <token>" and is
        // split back out by the auth middleware; the code derived before and
        // after that round trip must match.
        let credential = "eyJhbGciOiJIUzI1NiJ9.eyJpZCI6NDJ9.c2lnbmF0dXJl";
        let at_login = derive_reveal_code(credential);

        let header = format!("Bearer {credential}");
        let after_wire = header.split(' ').nth(1).unwrap();
        let at_verify = derive_reveal_code(after_wire);

        assert_eq!(at_login, at_verify);
    }

    #[test]
    fn test_code_format_validation() {
        assert!(is_valid_code_format("0412"));
        assert!(is_valid_code_format("0000"));
        assert!(is_valid_code_format("9999"));

        assert!(!is_valid_code_format(""));
        assert!(!is_valid_code_format("123"));
        assert!(!is_valid_code_format("12345"));
        assert!(!is_valid_code_format("12a4"));
        assert!(!is_valid_code_format(" 123"));
        assert!(!is_valid_code_format("12.4"));
        // Non-ASCII digits must not pass
        assert!(!is_valid_code_format("١٢٣٤"));
    }
}
