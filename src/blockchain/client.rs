// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM JSON-RPC node client.
//!
//! [`NodeClient`] is the seam the relay pipeline and the HTTP handlers talk
//! to. [`RpcNodeClient`] implements it over an alloy HTTP provider and holds
//! the relayer's wallet, so the relayer key never leaves this module.

use std::{future::Future, time::Duration};

use alloy::{
    eips::eip2718::Encodable2718,
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::{RpcError, TransportErrorKind},
};
use async_trait::async_trait;

use super::erc20::Erc20Contract;
use super::erc721::Erc721Contract;
use super::types::{TokenStandard, UnsignedTx};

/// JSON-RPC code used when a failure carries no upstream error code.
pub const UNKNOWN_RPC_ERROR_CODE: i64 = -32603;

/// Read and broadcast access to a chain node.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Address of the relayer account that signs and pays for relayed
    /// transactions.
    fn relayer_address(&self) -> Address;

    /// Transaction count of `address`, including pending transactions when
    /// `pending` is set.
    async fn get_nonce(&self, address: Address, pending: bool) -> Result<u64, NodeError>;

    async fn get_chain_id(&self) -> Result<u64, NodeError>;

    /// Current legacy gas price in wei.
    async fn get_gas_price(&self) -> Result<u128, NodeError>;

    async fn get_block_number(&self) -> Result<u64, NodeError>;

    /// Native balance in wei.
    async fn get_native_balance(&self, address: Address) -> Result<U256, NodeError>;

    /// Token balance of `holder` read through the contract's `balanceOf`.
    async fn get_token_balance(
        &self,
        token: Address,
        holder: Address,
        standard: TokenStandard,
    ) -> Result<U256, NodeError>;

    /// Sign `tx` with the relayer key and submit it.
    async fn sign_and_broadcast(&self, tx: UnsignedTx) -> Result<TxHash, NodeError>;

    /// Submit an already signed, EIP-2718 encoded transaction.
    async fn broadcast_raw(&self, raw: Bytes) -> Result<TxHash, NodeError>;
}

/// Node client backed by an alloy HTTP provider.
pub struct RpcNodeClient {
    provider: DynProvider<Ethereum>,
    wallet: EthereumWallet,
    relayer: Address,
    /// Chain id observed by the startup probe
    chain_id: u64,
    timeout: Duration,
}

impl RpcNodeClient {
    /// Connect to the node at `rpc_url` and verify it answers.
    ///
    /// Fails with [`NodeError::Unavailable`] if the chain id probe does not
    /// succeed within `timeout`.
    pub async fn connect(
        rpc_url: &str,
        signer: PrivateKeySigner,
        timeout: Duration,
    ) -> Result<Self, NodeError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| NodeError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        let chain_id = with_timeout(timeout, "eth_chainId", async {
            provider.get_chain_id().await.map_err(map_rpc_error)
        })
        .await
        .map_err(|e| NodeError::Unavailable(format!("startup probe failed: {e}")))?;

        let relayer = signer.address();
        let wallet = EthereumWallet::from(signer);

        tracing::info!(relayer = %relayer, chain_id, "Connected to chain node");

        Ok(Self {
            provider,
            wallet,
            relayer,
            chain_id,
            timeout,
        })
    }
}

#[async_trait]
impl NodeClient for RpcNodeClient {
    fn relayer_address(&self) -> Address {
        self.relayer
    }

    async fn get_nonce(&self, address: Address, pending: bool) -> Result<u64, NodeError> {
        with_timeout(self.timeout, "eth_getTransactionCount", async {
            let count = self.provider.get_transaction_count(address);
            let count = if pending { count.pending() } else { count.latest() };
            count.await.map_err(map_rpc_error)
        })
        .await
    }

    async fn get_chain_id(&self) -> Result<u64, NodeError> {
        Ok(self.chain_id)
    }

    async fn get_gas_price(&self) -> Result<u128, NodeError> {
        with_timeout(self.timeout, "eth_gasPrice", async {
            self.provider.get_gas_price().await.map_err(map_rpc_error)
        })
        .await
    }

    async fn get_block_number(&self) -> Result<u64, NodeError> {
        with_timeout(self.timeout, "eth_blockNumber", async {
            self.provider.get_block_number().await.map_err(map_rpc_error)
        })
        .await
    }

    async fn get_native_balance(&self, address: Address) -> Result<U256, NodeError> {
        with_timeout(self.timeout, "eth_getBalance", async {
            self.provider.get_balance(address).await.map_err(map_rpc_error)
        })
        .await
    }

    async fn get_token_balance(
        &self,
        token: Address,
        holder: Address,
        standard: TokenStandard,
    ) -> Result<U256, NodeError> {
        with_timeout(self.timeout, "eth_call", async {
            match standard {
                TokenStandard::Erc20 => {
                    Erc20Contract::new(&self.provider, token)
                        .balance_of(holder)
                        .await
                }
                TokenStandard::Erc721 => {
                    Erc721Contract::new(&self.provider, token)
                        .balance_of(holder)
                        .await
                }
            }
        })
        .await
    }

    async fn sign_and_broadcast(&self, tx: UnsignedTx) -> Result<TxHash, NodeError> {
        let request = tx.into_request();
        let envelope =
            <TransactionRequest as TransactionBuilder<Ethereum>>::build(request, &self.wallet)
                .await
                .map_err(|e| NodeError::Signing(e.to_string()))?;

        let tx_hash = self.broadcast_raw(envelope.encoded_2718().into()).await?;
        tracing::debug!(tx_hash = %tx_hash, "Relayer transaction submitted");
        Ok(tx_hash)
    }

    async fn broadcast_raw(&self, raw: Bytes) -> Result<TxHash, NodeError> {
        with_timeout(self.timeout, "eth_sendRawTransaction", async {
            let pending = self
                .provider
                .send_raw_transaction(&raw)
                .await
                .map_err(map_rpc_error)?;
            Ok(*pending.tx_hash())
        })
        .await
    }
}

/// Bound an outbound call by `limit`, surfacing expiry as unavailability.
async fn with_timeout<T, F>(limit: Duration, method: &'static str, call: F) -> Result<T, NodeError>
where
    F: Future<Output = Result<T, NodeError>>,
{
    tokio::time::timeout(limit, call).await.map_err(|_| {
        NodeError::Unavailable(format!("{method} timed out after {}s", limit.as_secs()))
    })?
}

/// Convert a transport-level alloy error into a [`NodeError`].
pub(crate) fn map_rpc_error(err: RpcError<TransportErrorKind>) -> NodeError {
    if let Some(payload) = err.as_error_resp() {
        return NodeError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        };
    }

    match err {
        RpcError::Transport(kind) => NodeError::Unavailable(kind.to_string()),
        other => NodeError::Rpc {
            code: UNKNOWN_RPC_ERROR_CODE,
            message: other.to_string(),
        },
    }
}

/// Convert a contract call error into a [`NodeError`].
pub(crate) fn map_contract_error(err: alloy::contract::Error) -> NodeError {
    match err {
        alloy::contract::Error::TransportError(e) => map_rpc_error(e),
        other => NodeError::Rpc {
            code: UNKNOWN_RPC_ERROR_CODE,
            message: other.to_string(),
        },
    }
}

/// Errors that can occur during node operations.
///
/// Messages carry upstream node text only; the relayer key is never
/// formatted into any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Node unavailable: {0}")]
    Unavailable(String),

    #[error("Node RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transaction signing failed: {0}")]
    Signing(String),
}
