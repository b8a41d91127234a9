// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service error taxonomy.
//!
//! Every failure is raised at the point of detection and propagates unchanged
//! to the boundary; there is no retry and no rollback of earlier writes in a
//! multi-key sequence. The HTTP layer renders each variant as a JSON body
//! with a coarse status classification.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::KvError;

/// Typed failure for every core operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed input (bad username pattern, empty password, ...).
    #[error("{0}")]
    Validation(String),

    /// Duplicate username, duplicate access grant.
    #[error("{0}")]
    Conflict(String),

    /// Unknown key.
    #[error("{0}")]
    NotFound(String),

    /// Missing/invalid token, wrong password, caller not a wallet member.
    #[error("{0}")]
    Auth(String),

    /// Operation would break a structural invariant (last-member removal).
    #[error("{0}")]
    Invariant(String),

    /// Underlying key-value store failure.
    #[error("storage error: {0}")]
    Storage(#[from] KvError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }

    /// HTTP status for this failure class.
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) | ServiceError::Invariant(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type for core operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "storage failure");
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
