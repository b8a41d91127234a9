// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{CredentialVault, TokenService},
    error::ServiceError,
    models::User,
    state::AppState,
};

/// Request to register a new account or log in.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    /// Username; letters and digits only, case-insensitive.
    pub username: String,
    /// Password; must not be empty.
    pub password: String,
}

/// Response carrying a bearer token and the resolved user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests. Never expires.
    pub token: String,
    /// The authenticated user's profile.
    pub user: User,
}

/// Register a new user and issue a token.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServiceError> {
    let vault = CredentialVault::new(state.store(), state.token_salt());
    let user = vault.register(&request.username, &request.password)?;

    let token = TokenService::new(state.store(), state.token_salt()).issue(&user.id);
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Verify a username/password pair and issue a token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login succeeded", body = AuthResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown username")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let vault = CredentialVault::new(state.store(), state.token_salt());
    let user = vault.verify(&request.username, &request.password)?;

    let token = TokenService::new(state.store(), state.token_salt()).issue(&user.id);
    Ok(Json(AuthResponse { token, user }))
}
