// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet lifecycle and access-control endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{Auth, MaybeAuth},
    error::ServiceError,
    ledger::{AccessControl, WalletLedger},
    models::{Wallet, WalletSummary},
    state::AppState,
};

/// Request to create a new wallet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// Wallet name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Opaque structured payload stored with the wallet.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Value,
}

/// Response containing the caller's wallet summaries.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WalletListResponse {
    pub wallets: Vec<WalletSummary>,
    pub total: usize,
}

/// Request to grant wallet access to another user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessRequest {
    /// The user to add to the access list.
    pub user_id: String,
}

/// Create a new wallet with the caller as sole member.
#[utoipa::path(
    post,
    path = "/v1/wallets",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created", body = Wallet),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<Wallet>), ServiceError> {
    let wallet = WalletLedger::new(state.store()).create(
        &user,
        &request.name,
        &request.description,
        request.extra,
    )?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

/// List the wallets the caller is a member of.
#[utoipa::path(
    get,
    path = "/v1/wallets",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's wallets", body = WalletListResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_wallets(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<WalletListResponse>, ServiceError> {
    let wallets = WalletLedger::new(state.store()).list_for_user(&user)?;
    let total = wallets.len();
    Ok(Json(WalletListResponse { wallets, total }))
}

/// List every wallet in the store.
#[utoipa::path(
    get,
    path = "/v1/wallets/all",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All wallets", body = [Wallet]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_all_wallets(
    Auth(_user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Wallet>>, ServiceError> {
    let wallets = WalletLedger::new(state.store()).list_all()?;
    Ok(Json(wallets))
}

/// Get a wallet by id.
///
/// With a token, membership is enforced. Without one, the lookup goes
/// through the identity-less path and succeeds for any wallet — the
/// access-control gap documented in the ledger module.
#[utoipa::path(
    get,
    path = "/v1/wallets/{wallet_id}",
    tag = "Wallets",
    params(("wallet_id" = String, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet details", body = Wallet),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn get_wallet(
    MaybeAuth(user): MaybeAuth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<Wallet>, ServiceError> {
    let wallet = WalletLedger::new(state.store()).get(&wallet_id, user.as_ref())?;
    Ok(Json(wallet))
}

/// Mark a wallet as closed.
#[utoipa::path(
    post,
    path = "/v1/wallets/{wallet_id}/close",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(("wallet_id" = String, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet closed", body = Wallet),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn close_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<Wallet>, ServiceError> {
    let wallet = WalletLedger::new(state.store()).close(&wallet_id, &user)?;
    Ok(Json(wallet))
}

/// Delete a wallet and scrub it from every member's wallet list.
#[utoipa::path(
    delete,
    path = "/v1/wallets/{wallet_id}",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(("wallet_id" = String, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Deleted wallet", body = Wallet),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn delete_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<Wallet>, ServiceError> {
    let wallet = WalletLedger::new(state.store()).delete(&wallet_id, &user)?;
    Ok(Json(wallet))
}

/// Grant another user access to a wallet.
#[utoipa::path(
    post,
    path = "/v1/wallets/{wallet_id}/access",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(("wallet_id" = String, Path, description = "Wallet ID")),
    request_body = GrantAccessRequest,
    responses(
        (status = 200, description = "Updated wallet", body = Wallet),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Wallet or target user not found"),
        (status = 409, description = "Target is already a member")
    )
)]
pub async fn grant_access(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Json(request): Json<GrantAccessRequest>,
) -> Result<Json<Wallet>, ServiceError> {
    let wallet = AccessControl::new(state.store()).grant(&wallet_id, &request.user_id, &user)?;
    Ok(Json(wallet))
}

/// Revoke a user's access to a wallet.
#[utoipa::path(
    delete,
    path = "/v1/wallets/{wallet_id}/access/{user_id}",
    tag = "Wallets",
    security(("bearer_auth" = [])),
    params(
        ("wallet_id" = String, Path, description = "Wallet ID"),
        ("user_id" = String, Path, description = "User to remove")
    ),
    responses(
        (status = 200, description = "Updated wallet", body = Wallet),
        (status = 400, description = "Target has no access"),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Target is the last member")
    )
)]
pub async fn revoke_access(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path((wallet_id, user_id)): Path<(String, String)>,
) -> Result<Json<Wallet>, ServiceError> {
    let wallet = AccessControl::new(state.store()).revoke(&wallet_id, &user_id, &user)?;
    Ok(Json(wallet))
}
