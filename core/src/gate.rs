//! Admin authorization.
//!
//! [`PrefixTokenGate`] only checks the shape of a token: it must start with
//! `admin_` and be longer than ten characters. Anyone who knows the shape can
//! forge one. Replace the gate with a real verifier before exposing admin
//! routes to an untrusted network.

use crate::environment::Clock;
use crate::error::BookingError;
use constant_time_eq::constant_time_eq;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::sync::Arc;

/// Prefix of every admin token.
pub const ADMIN_TOKEN_PREFIX: &str = "admin_";

/// Decides whether a token carries admin rights.
pub trait AdminGate: Send + Sync {
    /// Whether `token` is accepted.
    fn is_authorized(&self, token: &str) -> bool;
}

/// Accepts tokens with a fixed prefix and a minimum length.
#[derive(Debug, Clone)]
pub struct PrefixTokenGate {
    prefix: String,
    min_len: usize,
}

impl PrefixTokenGate {
    /// Accepts tokens starting with `prefix` and strictly longer than `min_len`.
    #[must_use]
    pub fn new(prefix: impl Into<String>, min_len: usize) -> Self {
        Self {
            prefix: prefix.into(),
            min_len,
        }
    }
}

impl Default for PrefixTokenGate {
    fn default() -> Self {
        Self::new(ADMIN_TOKEN_PREFIX, 10)
    }
}

impl AdminGate for PrefixTokenGate {
    fn is_authorized(&self, token: &str) -> bool {
        token.starts_with(&self.prefix) && token.len() > self.min_len
    }
}

/// Exchanges the admin password for a token the gate accepts.
pub struct AdminLogin {
    password: String,
    clock: Arc<dyn Clock>,
}

impl AdminLogin {
    /// Length of the random token suffix.
    pub const SUFFIX_LEN: usize = 12;

    /// Creates a login checker for `password`.
    #[must_use]
    pub fn new(password: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            password: password.into(),
            clock,
        }
    }

    /// Returns `admin_<millis>_<random>` if `password` matches.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidInput`] if `password` is empty
    /// - [`BookingError::Unauthorized`] if it does not match
    pub fn login(&self, password: &str) -> Result<String, BookingError> {
        if password.is_empty() {
            return Err(BookingError::InvalidInput("password is required".to_string()));
        }
        if self.password.is_empty() || !constant_time_eq(password.as_bytes(), self.password.as_bytes())
        {
            tracing::warn!("Admin login rejected");
            return Err(BookingError::Unauthorized);
        }

        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::SUFFIX_LEN)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect();
        tracing::info!("Admin login accepted");
        Ok(format!(
            "{ADMIN_TOKEN_PREFIX}{}_{suffix}",
            self.clock.now().timestamp_millis()
        ))
    }
}

impl std::fmt::Debug for AdminLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminLogin").finish_non_exhaustive()
    }
}
