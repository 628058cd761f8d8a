use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::{Rng, distributions::Alphanumeric};
use base64::{Engine, engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD}};

use crate::errors::AppError;

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Hash un mot de passe au format Werkzeug (compatible Python)
/// Format: pbkdf2:sha256:iterations$salt$hash
/// Le salt est une chaîne alphanumérique utilisée telle quelle, le hash est en hexadécimal
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_iterations(password, ITERATIONS)
}

fn hash_password_with_iterations(password: &str, iterations: u32) -> Result<String, AppError> {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();

    let mut key = [0u8; KEY_LENGTH];
    derive(password, salt.as_bytes(), iterations, &mut key)?;

    Ok(format!("pbkdf2:sha256:{}${}${}", iterations, salt, hex::encode(key)))
}

/// Vérifie un mot de passe contre un hash Werkzeug
/// Accepte aussi l'ancien format où salt et hash étaient en base64
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 3 {
        return Err(AppError::internal("parse password hash: invalid format"));
    }

    let (method, salt_str, hash_str) = (parts[0], parts[1], parts[2]);
    let iterations = parse_method(method)?;

    let (salt, expected_hash) = if is_hex(hash_str) {
        let hash = hex::decode(hash_str)
            .map_err(|e| AppError::internal(format!("decode password hash: {}", e)))?;
        (salt_str.as_bytes().to_vec(), hash)
    } else {
        (decode_base64(salt_str)?, decode_base64(hash_str)?)
    };

    if expected_hash.is_empty() {
        return Err(AppError::internal("parse password hash: empty digest"));
    }

    let mut computed = vec![0u8; expected_hash.len()];
    derive(password, &salt, iterations, &mut computed)?;

    Ok(constant_time_eq(&computed, &expected_hash))
}

fn derive(password: &str, salt: &[u8], iterations: u32, out: &mut [u8]) -> Result<(), AppError> {
    pbkdf2::<HmacSha256>(password.as_bytes(), salt, iterations, out)
        .map_err(|e| AppError::internal(format!("derive PBKDF2 key: {}", e)))
}

/// "pbkdf2:sha256:260000" -> 260000 (Werkzeug omet parfois les itérations)
fn parse_method(method: &str) -> Result<u32, AppError> {
    let header_parts: Vec<&str> = method.split(':').collect();
    match header_parts.as_slice() {
        ["pbkdf2", "sha256"] => Ok(ITERATIONS),
        ["pbkdf2", "sha256", iterations] => iterations
            .parse::<u32>()
            .map_err(|_| AppError::internal("parse password hash: invalid iterations")),
        _ => Err(AppError::internal(format!("parse password hash: unsupported method {}", method))),
    }
}

fn is_hex(input: &str) -> bool {
    !input.is_empty() && input.len() % 2 == 0 && input.chars().all(|c| c.is_ascii_hexdigit())
}

/// Décode une chaîne base64 quel que soit l'alphabet ou le padding
fn decode_base64(input: &str) -> Result<Vec<u8>, AppError> {
    let padded = add_base64_padding(input);

    STANDARD.decode(&padded)
        .or_else(|_| URL_SAFE.decode(&padded))
        .or_else(|_| URL_SAFE_NO_PAD.decode(input))
        .or_else(|_| STANDARD_NO_PAD.decode(input))
        .map_err(|_| AppError::internal("decode password hash: not base64"))
}

/// Ajoute le padding '=' manquant pour base64
fn add_base64_padding(input: &str) -> String {
    let padding_needed = (4 - (input.len() % 4)) % 4;
    format!("{}{}", input, "=".repeat(padding_needed))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
