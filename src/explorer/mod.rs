// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Block Explorer Client
//!
//! Read-through access to an Etherscan-compatible `txlist` endpoint.
//!
//! The explorer answers `{status, message, result}`. `status == "1"` carries
//! a transaction array; `status == "0"` is either "No transactions found"
//! (an empty history, not an error) or a failure whose text is in
//! `message`/`result`.

use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::config::Secret;

const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

/// Ordered transaction history lookups.
#[async_trait]
pub trait ExplorerClient: Send + Sync {
    /// Past transactions touching `address`, newest first.
    async fn fetch_history(
        &self,
        address: Address,
    ) -> Result<Vec<ExplorerTransaction>, ExplorerError>;
}

/// A transaction record as reported by the explorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ExplorerTransaction {
    /// Transaction hash
    pub hash: String,
    /// Block number (decimal string)
    pub block_number: String,
    /// Unix timestamp (decimal string)
    pub time_stamp: String,
    pub block_hash: String,
    /// Position within the block (decimal string)
    pub transaction_index: String,
    /// RFC 3339 rendering of `timeStamp`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    pub from: String,
    pub to: String,
    /// Value in wei (decimal string)
    pub value: String,
    pub nonce: String,
    pub gas: String,
    pub gas_price: String,
    pub gas_used: String,
    pub cumulative_gas_used: String,
    /// "1" if execution failed
    pub is_error: String,
    /// Receipt status, "1" on success
    #[serde(rename = "txreceipt_status")]
    pub txreceipt_status: String,
    /// Hex call data
    pub input: String,
    pub contract_address: String,
    pub confirmations: String,
    /// Four-byte selector of `input`
    pub method_id: String,
    pub function_name: String,
}

impl ExplorerTransaction {
    fn block(&self) -> u64 {
        self.block_number.parse().unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct TxListResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExplorerError {
    #[error("Explorer unavailable: {0}")]
    Unavailable(String),

    #[error("Explorer returned an error: {0}")]
    Api(String),

    #[error("Explorer response was invalid: {0}")]
    InvalidResponse(String),
}

/// Etherscan-compatible HTTP client.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    base_url: String,
    api_key: Secret,
    http: Client,
}

impl EtherscanClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Secret,
        timeout: Duration,
    ) -> Result<Self, ExplorerError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExplorerError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            api_key,
            http,
        })
    }
}

#[async_trait]
impl ExplorerClient for EtherscanClient {
    async fn fetch_history(
        &self,
        address: Address,
    ) -> Result<Vec<ExplorerTransaction>, ExplorerError> {
        let address = address.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address.as_str()),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("sort", "desc"),
                ("apikey", self.api_key.expose()),
            ])
            .send()
            .await
            .map_err(|e| ExplorerError::Unavailable(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Api(format!("HTTP {status}")));
        }

        let body: TxListResponse = response
            .json()
            .await
            .map_err(|e| ExplorerError::InvalidResponse(e.without_url().to_string()))?;

        let transactions = parse_txlist(body)?;
        tracing::debug!(address = %address, count = transactions.len(), "Fetched explorer history");
        Ok(transactions)
    }
}

/// Turn a raw `txlist` response into an ordered history.
fn parse_txlist(body: TxListResponse) -> Result<Vec<ExplorerTransaction>, ExplorerError> {
    if body.status != "1" {
        let empty_result = matches!(&body.result, Value::Array(items) if items.is_empty());
        if body.message == NO_TRANSACTIONS_MESSAGE || empty_result {
            return Ok(Vec::new());
        }

        let detail = match body.result {
            Value::String(text) if !text.is_empty() => format!("{}: {text}", body.message),
            _ => body.message,
        };
        return Err(ExplorerError::Api(detail));
    }

    let mut transactions: Vec<ExplorerTransaction> = serde_json::from_value(body.result)
        .map_err(|e| ExplorerError::InvalidResponse(e.to_string()))?;

    for tx in &mut transactions {
        tx.date_time = tx
            .time_stamp
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.to_rfc3339());
    }

    // Newest first, regardless of what the upstream sort honoured
    transactions.sort_by_key(|tx| std::cmp::Reverse(tx.block()));
    Ok(transactions)
}
