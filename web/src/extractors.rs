//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation id
//! - `AdminCredential`: the raw admin tokens the request carries
//! - `IsAdmin`: whether any of them passes the admin gate
//! - `RequireAdmin`: rejects with 401 unless one does
//!
//! Admin tokens are read from the `Authorization` header (with or without a
//! `Bearer ` prefix) and the `adminToken` query parameter, in that order.

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{Uri, request::Parts},
};
use std::collections::HashMap;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Set by the correlation middleware; falls back to the `X-Correlation-ID`
/// header, then to a new UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }
        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// The admin tokens a request presents, header first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminCredential(pub Vec<String>);

impl AdminCredential {
    fn from_parts(parts: &Parts) -> Self {
        let from_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
            .filter(|token| !token.is_empty())
            .map(ToString::to_string);

        Self(from_header.into_iter().chain(query_token(&parts.uri)).collect())
    }

    /// Whether any presented token passes the gate.
    #[must_use]
    pub fn is_admin(&self, state: &AppState) -> bool {
        self.0.iter().any(|token| state.gate.is_authorized(token))
    }
}

fn query_token(uri: &Uri) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params
        .get("adminToken")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminCredential
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// Whether the request's admin token passes the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsAdmin(pub bool);

#[async_trait]
impl FromRequestParts<AppState> for IsAdmin {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(AdminCredential::from_parts(parts).is_admin(state)))
    }
}

/// Proof that the request carries an accepted admin token.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match IsAdmin::from_request_parts(parts, state).await {
            Ok(IsAdmin(true)) => Ok(Self),
            _ => Err(AppError::unauthorized()),
        }
    }
}
