//! TCP connect probe adapter.

use async_trait::async_trait;
use serde_json::json;
use tokio::net::TcpStream;

use crate::backend::adapter::{AdapterError, ProbeAdapter};

/// Probes a backend with a plain TCP connect round-trip.
///
/// The caller times the call and applies the timeout, so this adapter only
/// has to succeed or fail.
#[derive(Debug, Clone)]
pub struct TcpProbeAdapter {
    address: String,
}

impl TcpProbeAdapter {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

#[async_trait]
impl ProbeAdapter for TcpProbeAdapter {
    async fn probe(&self) -> Result<Option<serde_json::Value>, AdapterError> {
        let stream = TcpStream::connect(&self.address)
            .await
            .map_err(|e| AdapterError::Unavailable(format!("{}: {e}", self.address)))?;
        let peer = stream.peer_addr()?;
        Ok(Some(json!({ "endpoint": peer.to_string() })))
    }

    async fn recover(&self) -> Result<(), AdapterError> {
        // Recovery for a connect probe is re-establishing a connection.
        TcpStream::connect(&self.address)
            .await
            .map_err(|e| AdapterError::Unavailable(format!("{}: {e}", self.address)))?;
        Ok(())
    }
}
