// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ServiceError,
    ledger::{transactions::DEFAULT_PAGE_SIZE, TransactionLog, TransactionPatch},
    models::Transaction,
    state::AppState,
};

/// Request to post a new transaction.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Entry title.
    pub name: String,
    /// Signed amount; accepted as a JSON number or numeric string. Anything
    /// else posts as zero.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub amount: serde_json::Value,
    /// Opaque structured payload stored with the entry.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Value,
}

/// Query parameters for the transaction listing.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Continuation cursor from a previous page.
    pub cursor: Option<String>,
    /// Page size.
    pub limit: Option<usize>,
}

/// One page of a wallet's transactions.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Post a new transaction against a wallet.
#[utoipa::path(
    post,
    path = "/v1/wallets/{wallet_id}/transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("wallet_id" = String, Path, description = "Wallet ID")),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction posted", body = Transaction),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn create_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ServiceError> {
    let tx = TransactionLog::new(state.store()).create(
        &wallet_id,
        &request.name,
        &request.amount,
        request.extra,
        &user,
    )?;
    Ok((StatusCode::CREATED, Json(tx)))
}

/// List a wallet's transactions, paginated by the store cursor.
#[utoipa::path(
    get,
    path = "/v1/wallets/{wallet_id}/transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("wallet_id" = String, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "One page of transactions", body = TransactionListResponse),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Wallet not found")
    )
)]
pub async fn list_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<TransactionListResponse>, ServiceError> {
    let page = TransactionLog::new(state.store()).list(
        &wallet_id,
        query.cursor.as_deref(),
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        &user,
    )?;

    Ok(Json(TransactionListResponse {
        transactions: page.transactions,
        cursor: page.cursor,
        has_more: page.has_more,
    }))
}

/// List every transaction created by the caller, across all wallets.
#[utoipa::path(
    get,
    path = "/v1/transactions/mine",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's transactions", body = [Transaction]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, ServiceError> {
    let transactions = TransactionLog::new(state.store()).list_by_creator(&user.id)?;
    Ok(Json(transactions))
}

/// Get a transaction by id.
#[utoipa::path(
    get,
    path = "/v1/transactions/{transaction_id}",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("transaction_id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction details", body = Transaction),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, ServiceError> {
    let tx = TransactionLog::new(state.store()).get(&transaction_id, &user)?;
    Ok(Json(tx))
}

/// Patch a transaction's mutable fields.
#[utoipa::path(
    put,
    path = "/v1/transactions/{transaction_id}",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("transaction_id" = String, Path, description = "Transaction ID")),
    request_body = TransactionPatch,
    responses(
        (status = 200, description = "Updated transaction", body = Transaction),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn update_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<Transaction>, ServiceError> {
    let tx = TransactionLog::new(state.store()).update(&transaction_id, patch, &user)?;
    Ok(Json(tx))
}

/// Delete a transaction, reversing its balance contribution.
#[utoipa::path(
    delete,
    path = "/v1/transactions/{transaction_id}",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("transaction_id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Deleted transaction", body = Transaction),
        (status = 401, description = "Caller is not a member"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn delete_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, ServiceError> {
    let tx = TransactionLog::new(state.store()).delete(&transaction_id, &user)?;
    Ok(Json(tx))
}
