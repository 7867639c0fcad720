//! Token encoding/decoding and key parsing utilities.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use biscuit_auth::Algorithm;

use crate::error::TokenError;
use crate::{Biscuit, PublicKey};

/// Encode raw token bytes to the biscuit wire format (URL-safe base64, no padding).
pub fn encode_token(token: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(token)
}

/// Decode a base64 token string back to raw bytes.
pub fn decode_token(token: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| TokenError::Base64DecodingError {
            reason: e.to_string(),
        })
}

/// Parse a base64-encoded token and verify its signature against the public key.
pub fn parse_token(token: &str, public_key: PublicKey) -> Result<Biscuit, TokenError> {
    Ok(Biscuit::from_base64(token, public_key)?)
}

/// Takes a public key encoded as a string in the format "ed25519/..." or "secp256r1/..."
/// and returns a PublicKey.
pub fn biscuit_key_from_string(key: String) -> Result<PublicKey, TokenError> {
    let parts = key.split('/').collect::<Vec<&str>>();
    if parts.len() != 2 {
        return Err(TokenError::invalid_key_format(
            "Key must be in format 'algorithm/hexkey'",
        ));
    }

    let alg = match parts[0] {
        "ed25519" => Algorithm::Ed25519,
        "secp256r1" => Algorithm::Secp256r1,
        _ => {
            return Err(TokenError::invalid_key_format(
                "Unsupported algorithm, must be ed25519 or secp256r1",
            ));
        }
    };

    let key_bytes = hex::decode(parts[1])?;

    let key = PublicKey::from_bytes(&key_bytes, alg)
        .map_err(|e| TokenError::invalid_key_format(e.to_string()))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;
    use biscuit_auth::macros::biscuit;

    #[test]
    fn test_encode_decode_round_trip() {
        let bytes = vec![0x00, 0x01, 0xfe, 0xff, 0x42];
        let encoded = encode_token(&bytes);
        assert!(!encoded.contains('='), "wire format must be unpadded");
        assert_eq!(decode_token(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_token("not base64!!").unwrap_err();
        assert!(matches!(err, TokenError::Base64DecodingError { .. }));
    }

    #[test]
    fn test_encode_matches_biscuit_wire_format() {
        let keypair = KeyPair::new();
        let biscuit = biscuit!(r#"subject("cust:1");"#).build(&keypair).unwrap();

        let bytes = biscuit.to_vec().unwrap();
        assert_eq!(encode_token(&bytes), biscuit.to_base64().unwrap());
    }

    #[test]
    fn test_parse_token_wrong_key_fails() {
        let keypair = KeyPair::new();
        let other = KeyPair::new();
        let token = biscuit!(r#"subject("cust:1");"#)
            .build(&keypair)
            .unwrap()
            .to_base64()
            .unwrap();

        assert!(parse_token(&token, keypair.public()).is_ok());
        let err = parse_token(&token, other.public()).unwrap_err();
        assert!(err.is_signature_error(), "got {err:?}");
    }

    #[test]
    fn test_biscuit_key_from_string() {
        let keypair = KeyPair::new();
        let hex_key = hex::encode(keypair.public().to_bytes());

        let parsed = biscuit_key_from_string(format!("ed25519/{hex_key}")).unwrap();
        assert_eq!(parsed.to_bytes(), keypair.public().to_bytes());

        assert!(biscuit_key_from_string("ed25519".to_string()).is_err());
        assert!(biscuit_key_from_string(format!("rsa/{hex_key}")).is_err());
        assert!(biscuit_key_from_string("ed25519/nothex".to_string()).is_err());
    }
}
