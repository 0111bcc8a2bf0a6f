use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use error_stack::{Report, Result, ResultExt};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Could not hash password")]
pub struct HashPasswordError;

#[derive(Debug, Error)]
#[error("Could not verify password")]
pub struct VerifyPasswordError;

/// Hashes a password with argon2id and a freshly generated salt.
///
/// This is CPU heavy on purpose, so the async variant below must be
/// used anywhere near the request path.
pub fn hash(password: &str) -> Result<String, HashPasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Report::new(HashPasswordError).attach_printable(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks `password` against a PHC formatted `hash`. A malformed hash
/// is an error, a mismatched password is `Ok(false)`.
pub fn verify(password: &str, hash: &str) -> Result<bool, VerifyPasswordError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| Report::new(VerifyPasswordError).attach_printable(e.to_string()))
        .attach_printable("stored password hash is not in PHC format")?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(..) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Report::new(VerifyPasswordError).attach_printable(e.to_string())),
    }
}

pub async fn hash_async(password: String) -> Result<String, HashPasswordError> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .change_context(HashPasswordError)?
}

pub async fn verify_async(password: String, hash: String) -> Result<bool, VerifyPasswordError> {
    tokio::task::spawn_blocking(move || verify(&password, &hash))
        .await
        .change_context(VerifyPasswordError)?
}
