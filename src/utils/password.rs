use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::{RngCore, rngs::OsRng};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Valeur Werkzeug par défaut
pub const DEFAULT_ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Hash un mot de passe au format Werkzeug
/// PBKDF2-HMAC-SHA256 avec un salt aléatoire de 16 bytes.
/// Calcul volontairement lent : à appeler hors de l'event loop (spawn_blocking)
pub fn hash_password(password: &str, iterations: u32) -> AppResult<String> {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut key)
        .map_err(|e| AppError::Hashing(e.to_string()))?;

    // Format: pbkdf2:sha256:iterations$salt$hash
    Ok(format!(
        "pbkdf2:sha256:{}${}${}",
        iterations,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(key)
    ))
}

/// Vérifie un hash produit par hash_password
#[cfg(test)]
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let invalid = || AppError::Hashing("Invalid hash format".to_string());

    let mut parts = stored_hash.split('$');
    let (header, salt, expected) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(salt), Some(expected), None) => (header, salt, expected),
        _ => return Err(invalid()),
    };

    let iterations = header
        .strip_prefix("pbkdf2:sha256:")
        .and_then(|i| i.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let salt = URL_SAFE_NO_PAD.decode(salt).map_err(|_| invalid())?;
    let expected = URL_SAFE_NO_PAD.decode(expected).map_err(|_| invalid())?;

    let mut computed = vec![0u8; expected.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| AppError::Hashing(e.to_string()))?;

    Ok(computed == expected)
}
