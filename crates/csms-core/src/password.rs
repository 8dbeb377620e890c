use crate::error::{CsmsError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "v1";
const ITERATIONS: u32 = 10_000;
const SALT_LEN: usize = 16;

/// Hash a password as `v1$<iterations>$<salt b64>$<hash b64>`.
pub fn hash(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let derived = derive(password, &salt, ITERATIONS)?;
    Ok(format!(
        "{SCHEME}${ITERATIONS}${}${}",
        STANDARD.encode(salt),
        STANDARD.encode(derived)
    ))
}

/// Check `password` against a stored hash. Malformed hashes never verify.
pub fn verify(password: &str, stored: &str) -> bool {
    let parts: Vec<&str> = stored.split('$').collect();
    let [scheme, iterations, salt, expected] = parts.as_slice() else {
        return false;
    };
    if *scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD.decode(salt), STANDARD.decode(expected)) else {
        return false;
    };
    let Ok(actual) = derive(password, &salt, iterations) else {
        return false;
    };

    // Both digests are tagged under the salt so the final compare runs in
    // constant time via `verify_slice`.
    let tag = |bytes: &[u8]| {
        HmacSha256::new_from_slice(&salt).map(|mut m| {
            m.update(bytes);
            m
        })
    };
    match (tag(&actual), tag(&expected)) {
        (Ok(actual), Ok(expected)) => actual
            .verify_slice(&expected.finalize().into_bytes())
            .is_ok(),
        _ => false,
    }
}

/// PBKDF2-HMAC-SHA256 with a 32-byte output.
fn derive(password: &str, salt: &[u8], iterations: u32) -> Result<[u8; 32]> {
    if iterations == 0 {
        return Err(CsmsError::validation("password hash iterations must be > 0"));
    }
    let mut out = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    Ok(out)
}
