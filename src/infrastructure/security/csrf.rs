// src/infrastructure/security/csrf.rs
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac, digest::InvalidLength};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const MIN_SECRET_LEN: usize = 32;

/// Stateless CSRF tokens: `HMAC-SHA256(secret, session id)`, base64url.
#[derive(Clone)]
pub struct CsrfTokens {
    keyed: HmacSha256,
}

impl CsrfTokens {
    pub fn new(secret: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            keyed: HmacSha256::new_from_slice(secret)?,
        })
    }

    pub fn random() -> Result<Self, InvalidLength> {
        let mut secret = [0u8; MIN_SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        Self::new(&secret)
    }

    fn mac(&self, session_id: &str) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(session_id.as_bytes());
        mac
    }

    pub fn token_for(&self, session_id: &str) -> String {
        URL_SAFE_NO_PAD.encode(self.mac(session_id).finalize().into_bytes())
    }

    /// Constant-time check of a presented token.
    pub fn verify(&self, session_id: &str, presented: &str) -> bool {
        match URL_SAFE_NO_PAD.decode(presented.trim()) {
            Ok(bytes) => self.mac(session_id).verify_slice(&bytes).is_ok(),
            Err(_) => false,
        }
    }
}
