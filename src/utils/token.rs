use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};

/// 32 octets = 256 bits d'aléa
const TOKEN_BYTES: usize = 32;

/// Génère un token de récupération opaque, encodé en base64 URL-safe sans padding
pub fn generate_recover_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
