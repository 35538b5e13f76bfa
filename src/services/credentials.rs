use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const CREDENTIAL_CONTEXT: &[u8] = b"cafe-api/report-closed";

/// Shared secret guarding destructive operations.
///
/// Only an HMAC tag of the configured key is kept. A presented key is checked by
/// recomputing its tag and comparing with `Mac::verify_slice`, which runs in
/// constant time and does not leak the key length.
#[derive(Clone)]
pub struct ApiKey {
    tag: Vec<u8>,
}

impl ApiKey {
    pub fn new(secret: &str) -> Self {
        Self {
            tag: tag_for(secret).finalize().into_bytes().to_vec(),
        }
    }

    /// Returns true when `candidate` equals the configured secret
    pub fn verify(&self, candidate: &str) -> bool {
        tag_for(candidate).verify_slice(&self.tag).is_ok()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

fn tag_for(key: &str) -> HmacSha256 {
    // HMAC accepts keys of any length, including empty ones
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts keys of any length"));
    mac.update(CREDENTIAL_CONTEXT);
    mac
}
