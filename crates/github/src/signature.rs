//! Webhook signature verification.
//!
//! GitHub signs every delivery with HMAC-SHA256 over the raw request body
//! and sends the hex digest in the `X-Hub-Signature-256` header as
//! `sha256=<hex>`. Verification must run over the exact bytes that arrived
//! on the wire: re-serialising a parsed body changes whitespace and key
//! order and breaks the digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm tag GitHub prefixes the hex digest with.
const SIGNATURE_PREFIX: &str = "sha256=";

/// Verifies a GitHub webhook signature.
///
/// Fails closed: returns `false` (never panics or errors) for a missing or
/// empty header, a header without the `sha256=` prefix, a digest that is
/// not valid hex, or a digest that does not match. The digest comparison is
/// constant-time so attackers cannot recover a valid signature byte by byte
/// from response timing.
///
/// `body` must be the unparsed byte stream exactly as received.
pub fn verify_signature(body: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some(received_hex) = signature_header.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Ok(received) = hex::decode(received_hex) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(body);
    let expected = mac.finalize().into_bytes();

    // ct_eq requires equal lengths; a wrong-length digest can never match.
    if received.len() != expected.len() {
        return false;
    }
    expected.as_slice().ct_eq(received.as_slice()).into()
}

/// Computes the `sha256=<hex>` header value for a body and secret.
///
/// The counterpart of [`verify_signature`]; used by tests and by callers
/// that need to sign outbound payloads the same way GitHub signs inbound
/// ones.
pub fn sign(body: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(body);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";
    const BODY: &[u8] = br#"{"test": "data"}"#;

    #[test]
    fn accepts_a_correctly_signed_body() {
        let header = sign(BODY, SECRET);
        assert!(verify_signature(BODY, &header, SECRET));
    }

    #[test]
    fn rejects_empty_and_unprefixed_headers() {
        assert!(!verify_signature(BODY, "", SECRET));
        let unprefixed = sign(BODY, SECRET)
            .strip_prefix(SIGNATURE_PREFIX)
            .unwrap()
            .to_string();
        assert!(!verify_signature(BODY, &unprefixed, SECRET));
        assert!(!verify_signature(BODY, "sha1=abcdef", SECRET));
    }

    #[test]
    fn rejects_non_hex_and_wrong_length_digests() {
        assert!(!verify_signature(BODY, "sha256=invalid", SECRET));
        assert!(!verify_signature(BODY, "sha256=abcd", SECRET));
        assert!(!verify_signature(BODY, "sha256=", SECRET));
    }

    #[test]
    fn any_flipped_body_byte_breaks_the_signature() {
        let header = sign(BODY, SECRET);
        for i in 0..BODY.len() {
            let mut mutated = BODY.to_vec();
            mutated[i] ^= 0x01;
            assert!(
                !verify_signature(&mutated, &header, SECRET),
                "flipping body byte {i} should invalidate the signature"
            );
        }
    }

    #[test]
    fn any_flipped_secret_byte_breaks_the_signature() {
        let header = sign(BODY, SECRET);
        for i in 0..SECRET.len() {
            let mut mutated = SECRET.to_vec();
            mutated[i] ^= 0x01;
            assert!(
                !verify_signature(BODY, &header, &mutated),
                "flipping secret byte {i} should invalidate the signature"
            );
        }
    }

    #[test]
    fn empty_body_still_verifies() {
        let header = sign(b"", SECRET);
        assert!(verify_signature(b"", &header, SECRET));
    }
}
