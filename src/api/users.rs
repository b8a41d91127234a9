// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User directory endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{Auth, CredentialVault},
    error::ServiceError,
    ledger::UserDirectory,
    models::{User, UserSummary},
    state::AppState,
};

/// Default page size for the user listing.
const DEFAULT_USER_PAGE: usize = 20;

/// Query parameters for the user listing.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Narrow the listing to user ids starting with this prefix.
    pub prefix: Option<String>,
    /// Continuation cursor from a previous page.
    pub cursor: Option<String>,
    /// Page size.
    pub limit: Option<usize>,
}

/// One page of user summaries.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Response for username resolution.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveUserResponse {
    pub user_id: String,
}

/// List registered users, paginated.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>, ServiceError> {
    let page = UserDirectory::new(state.store()).list(
        query.prefix.as_deref(),
        query.cursor.as_deref(),
        query.limit.unwrap_or(DEFAULT_USER_PAGE),
    )?;

    Ok(Json(UserListResponse {
        users: page.users,
        cursor: page.cursor,
        has_more: page.has_more,
    }))
}

/// Get a user profile by id.
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ServiceError> {
    let user = UserDirectory::new(state.store()).get(&user_id)?;
    Ok(Json(user))
}

/// Resolve a username (case-insensitive) to its user id.
#[utoipa::path(
    get,
    path = "/v1/users/resolve/{username}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username to resolve")),
    responses(
        (status = 200, description = "Resolved user id", body = ResolveUserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown username")
    )
)]
pub async fn resolve_user(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ResolveUserResponse>, ServiceError> {
    let user_id =
        CredentialVault::new(state.store(), state.token_salt()).resolve_user_id(&username)?;
    Ok(Json(ResolveUserResponse { user_id }))
}
