// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::blockchain::{NodeClient, TokenContracts};
use crate::explorer::ExplorerClient;
use crate::relay::RelayService;

#[derive(Clone)]
pub struct AppState {
    pub node: Arc<dyn NodeClient>,
    pub explorer: Arc<dyn ExplorerClient>,
    pub relay: Arc<RelayService>,
    pub tokens: TokenContracts,
}

impl AppState {
    pub fn new(
        node: Arc<dyn NodeClient>,
        explorer: Arc<dyn ExplorerClient>,
        tokens: TokenContracts,
    ) -> Self {
        let relay = Arc::new(RelayService::new(node.clone(), tokens.clone()));
        Self {
            node,
            explorer,
            relay,
            tokens,
        }
    }
}
