// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for token-authenticated callers.
//!
//! Use `Auth` in handlers that require an identity and `MaybeAuth` where an
//! anonymous caller is acceptable. A missing `Authorization` header means
//! anonymous; a header that is present but malformed or invalid is an
//! authentication failure, never anonymous.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ServiceError;
use crate::models::UserSummary;
use crate::state::AppState;

use super::TokenService;

/// Extractor for required authentication.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_my_wallets(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<WalletListResponse>, ServiceError> {
///     // user.id is the verified caller
/// }
/// ```
pub struct Auth(pub UserSummary);

/// Extractor for optional authentication: `None` only when no
/// `Authorization` header was sent at all.
pub struct MaybeAuth(pub Option<UserSummary>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, ServiceError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = header
        .to_str()
        .map_err(|_| ServiceError::auth("invalid authorization header"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServiceError::auth("expected 'Bearer <token>'"))?;
    Ok(Some(token))
}

impl FromRequestParts<AppState> for Auth {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts)?.ok_or_else(|| ServiceError::auth("authentication required"))?;
        let user = TokenService::new(state.store(), state.token_salt()).verify(token)?;
        Ok(Auth(user.summary()))
    }
}

impl FromRequestParts<AppState> for MaybeAuth {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(MaybeAuth(None)),
            Some(token) => {
                let user = TokenService::new(state.store(), state.token_salt()).verify(token)?;
                Ok(MaybeAuth(Some(user.summary())))
            }
        }
    }
}
