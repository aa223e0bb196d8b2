// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::blockchain::{BuildError, NodeError, VerifyError};
use crate::error::{ApiError, ErrorKind};

/// Reasons a relay request stops before a transaction hash is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("Missing required fields: {0}")]
    MissingParameter(String),

    #[error("{0}")]
    MalformedInput(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid signature")]
    Unauthorized,

    #[error("{0}")]
    BuildFailed(String),

    #[error("Broadcast rejected by node: {0}")]
    BroadcastFailed(String),

    #[error("Node unavailable: {0}")]
    NodeUnavailable(String),

    #[error("Node RPC error {code}: {message}")]
    NodeRpc { code: i64, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::MissingParameter(_) => ErrorKind::MissingParameter,
            RelayError::MalformedInput(_) => ErrorKind::MalformedInput,
            RelayError::InvalidSignature(_) => ErrorKind::InvalidSignature,
            RelayError::Unauthorized => ErrorKind::Unauthorized,
            RelayError::BuildFailed(_) => ErrorKind::BuildFailed,
            RelayError::BroadcastFailed(_) => ErrorKind::BroadcastFailed,
            RelayError::NodeUnavailable(_) => ErrorKind::NodeUnavailable,
            RelayError::NodeRpc { .. } => ErrorKind::NodeRpcError,
            RelayError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<NodeError> for RelayError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::Unavailable(message) | NodeError::InvalidRpcUrl(message) => {
                RelayError::NodeUnavailable(message)
            }
            NodeError::Rpc { code, message } => RelayError::NodeRpc { code, message },
            NodeError::Signing(message) => RelayError::Internal(message),
        }
    }
}

impl From<BuildError> for RelayError {
    fn from(err: BuildError) -> Self {
        RelayError::BuildFailed(err.to_string())
    }
}

impl From<VerifyError> for RelayError {
    fn from(err: VerifyError) -> Self {
        let detail = match err {
            VerifyError::InvalidSignatureFormat(detail) | VerifyError::RecoveryFailed(detail) => {
                detail
            }
        };
        RelayError::InvalidSignature(detail)
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        let kind = err.kind();
        match err {
            RelayError::Internal(detail) => ApiError::internal("Failed to relay transaction", detail),
            RelayError::BroadcastFailed(detail) => {
                ApiError::new(kind, "Failed to broadcast transaction").with_details(detail)
            }
            other => ApiError::new(kind, other.to_string()),
        }
    }
}
