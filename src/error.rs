// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP error body and the error taxonomy shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Failure categories reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field or query parameter is absent
    MissingParameter,
    /// Input is present but does not parse
    MalformedInput,
    /// Signature bytes are malformed or do not recover a key
    InvalidSignature,
    /// Signature is valid but was produced by another account
    Unauthorized,
    /// The transaction could not be assembled
    BuildFailed,
    /// The node rejected the relayer's transaction
    BroadcastFailed,
    NodeUnavailable,
    NodeRpcError,
    ExplorerUnavailable,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MissingParameter => "missing_parameter",
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::InvalidSignature => "invalid_signature",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::BuildFailed => "build_failed",
            ErrorKind::BroadcastFailed => "broadcast_failed",
            ErrorKind::NodeUnavailable => "node_unavailable",
            ErrorKind::NodeRpcError => "node_rpc_error",
            ErrorKind::ExplorerUnavailable => "explorer_unavailable",
            ErrorKind::Internal => "internal",
        }
    }

    /// HTTP status for this kind.
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::MissingParameter
            | ErrorKind::MalformedInput
            | ErrorKind::InvalidSignature
            | ErrorKind::BuildFailed => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::BroadcastFailed | ErrorKind::NodeRpcError => StatusCode::BAD_GATEWAY,
            ErrorKind::NodeUnavailable | ErrorKind::ExplorerUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<String>,
}

/// JSON error body.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable error
    pub error: String,
    /// Stable error code
    pub error_code: String,
    /// Underlying cause, when one is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: kind.status_code(),
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingParameter, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedInput, message)
    }

    pub fn internal(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message).with_details(details)
    }

    /// Failure of a read-through upstream call.
    ///
    /// Read endpoints answer 500 with the upstream text in `details`, while
    /// keeping the specific kind in `errorCode`.
    pub fn upstream(kind: ErrorKind, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind,
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.kind.code().to_string(),
            details: self.details,
        });
        (self.status, body).into_response()
    }
}
