// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory node and explorer doubles for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy::primitives::{address, b256, Address, Bytes, TxHash, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;

use crate::blockchain::{
    encode_intent, NodeClient, NodeError, TokenStandard, UnsignedTx,
};
use crate::explorer::{ExplorerClient, ExplorerError, ExplorerTransaction};
use crate::relay::{IntegerInput, RelayRequest};

pub const RELAYER: Address = address!("00000000000000000000000000000000000000ee");
pub const TX_HASH: B256 =
    b256!("1111111111111111111111111111111111111111111111111111111111111111");
pub const RELAYER_NONCE: u64 = 42;
pub const CHAIN_ID: u64 = 11_155_111;
pub const GAS_PRICE: u128 = 2_000_000_000;

pub struct MockNode {
    native_balance: Result<U256, NodeError>,
    token_balance: Result<U256, NodeError>,
    read_error: Option<NodeError>,
    broadcast_result: Result<TxHash, NodeError>,
    calls: AtomicUsize,
    broadcasts: AtomicUsize,
    last_tx: Mutex<Option<UnsignedTx>>,
    last_raw: Mutex<Option<Bytes>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            native_balance: Ok(U256::ZERO),
            token_balance: Ok(U256::ZERO),
            read_error: None,
            broadcast_result: Ok(TX_HASH),
            calls: AtomicUsize::new(0),
            broadcasts: AtomicUsize::new(0),
            last_tx: Mutex::new(None),
            last_raw: Mutex::new(None),
        }
    }

    pub fn with_native_balance(mut self, wei: U256) -> Self {
        self.native_balance = Ok(wei);
        self
    }

    pub fn with_token_balance(mut self, amount: U256) -> Self {
        self.token_balance = Ok(amount);
        self
    }

    pub fn with_balance_error(mut self, err: NodeError) -> Self {
        self.native_balance = Err(err.clone());
        self.token_balance = Err(err);
        self
    }

    /// Fail nonce, gas price, chain id and block number reads.
    pub fn with_read_error(mut self, err: NodeError) -> Self {
        self.read_error = Some(err);
        self
    }

    pub fn with_broadcast_error(mut self, err: NodeError) -> Self {
        self.broadcast_result = Err(err);
        self
    }

    /// Number of node calls of any kind.
    pub fn network_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn broadcasts(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }

    pub fn last_tx(&self) -> Option<UnsignedTx> {
        self.last_tx.lock().unwrap().clone()
    }

    pub fn last_raw(&self) -> Option<Bytes> {
        self.last_raw.lock().unwrap().clone()
    }

    fn read<T>(&self, value: T) -> Result<T, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.read_error {
            Some(err) => Err(err.clone()),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl NodeClient for MockNode {
    fn relayer_address(&self) -> Address {
        RELAYER
    }

    async fn get_nonce(&self, _address: Address, _pending: bool) -> Result<u64, NodeError> {
        self.read(RELAYER_NONCE)
    }

    async fn get_chain_id(&self) -> Result<u64, NodeError> {
        self.read(CHAIN_ID)
    }

    async fn get_gas_price(&self) -> Result<u128, NodeError> {
        self.read(GAS_PRICE)
    }

    async fn get_block_number(&self) -> Result<u64, NodeError> {
        self.read(1_234)
    }

    async fn get_native_balance(&self, _address: Address) -> Result<U256, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.native_balance.clone()
    }

    async fn get_token_balance(
        &self,
        _token: Address,
        _holder: Address,
        _standard: TokenStandard,
    ) -> Result<U256, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token_balance.clone()
    }

    async fn sign_and_broadcast(&self, tx: UnsignedTx) -> Result<TxHash, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        *self.last_tx.lock().unwrap() = Some(tx);
        self.broadcast_result.clone()
    }

    async fn broadcast_raw(&self, raw: Bytes) -> Result<TxHash, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        *self.last_raw.lock().unwrap() = Some(raw);
        self.broadcast_result.clone()
    }
}

pub struct MockExplorer {
    result: Result<Vec<ExplorerTransaction>, ExplorerError>,
    calls: AtomicUsize,
}

impl MockExplorer {
    pub fn with_transactions(transactions: Vec<ExplorerTransaction>) -> Self {
        Self {
            result: Ok(transactions),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ExplorerError) -> Self {
        Self {
            result: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExplorerClient for MockExplorer {
    async fn fetch_history(
        &self,
        _address: Address,
    ) -> Result<Vec<ExplorerTransaction>, ExplorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Build a relay request signed by `signer` the way a wallet would.
pub fn signed_request(
    signer: &PrivateKeySigner,
    to: Address,
    value: u64,
    nonce: u64,
    data: Option<&[u8]>,
    token_type: Option<&str>,
) -> RelayRequest {
    let from = signer.address();
    let digest = encode_intent(&from, &to, U256::from(value), U256::from(nonce), data.unwrap_or_default());
    let signature = signer.sign_message_sync(digest.as_slice()).unwrap();

    RelayRequest {
        from: Some(from.to_checksum(None)),
        to: Some(to.to_string()),
        value: Some(IntegerInput::Text(value.to_string())),
        data: data.map(|d| format!("0x{}", alloy::hex::encode(d))),
        signed: Some(format!("0x{}", alloy::hex::encode(signature.as_bytes()))),
        nonce: Some(IntegerInput::Number(nonce)),
        token_type: token_type.map(str::to_string),
    }
}
