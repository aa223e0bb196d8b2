// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{sync::Arc, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;

use gasless_relay_server::{
    api::router,
    blockchain::{load_relayer_signer, KeyError, NodeError, RpcNodeClient},
    config::{self, AppConfig, ConfigError},
    explorer::{EtherscanClient, ExplorerError},
    state::AppState,
    telemetry::init_tracing,
};

/// In-flight requests get this long to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("Failed to install rustls crypto provider")]
    CryptoProvider,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Failed to connect to node: {0}")]
    Node(#[from] NodeError),

    #[error("Failed to build explorer client: {0}")]
    Explorer(#[from] ExplorerError),

    #[error("Failed to load TLS certificate: {0}")]
    Tls(std::io::Error),

    #[error("Server failed: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("{}", StartupError::CryptoProvider);
        std::process::exit(1);
    }

    init_tracing(config::log_format_from_env());

    if let Err(err) = run().await {
        tracing::error!(error = %err, "Relay server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    let addr = config.bind_address()?;

    let signer = load_relayer_signer(&config.relayer_key)?;
    let node = RpcNodeClient::connect(&config.node_rpc_url, signer, config.upstream_timeout).await?;
    tracing::info!(
        erc20 = ?config.tokens.erc20,
        erc721 = ?config.tokens.erc721,
        "Token contracts configured"
    );

    let explorer = EtherscanClient::new(
        config.explorer_api_url.clone(),
        config.explorer_api_key.clone(),
        config.upstream_timeout,
    )?;

    let state = AppState::new(Arc::new(node), Arc::new(explorer), config.tokens.clone());
    let app = router(state);

    let handle = Handle::new();
    let shutdown = CancellationToken::new();
    tokio::spawn(listen_for_shutdown(shutdown.clone()));
    tokio::spawn({
        let handle = handle.clone();
        let shutdown = shutdown.clone();
        async move {
            shutdown.cancelled().await;
            tracing::info!("Shutting down, draining in-flight requests");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    match &config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .map_err(StartupError::Tls)?;
            tracing::info!("Gasless relay listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(StartupError::Serve)?;
        }
        None => {
            tracing::info!("Gasless relay listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(StartupError::Serve)?;
        }
    }

    Ok(())
}

async fn listen_for_shutdown(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    shutdown.cancel();
}
