//! Serial port discovery and the connect contract.
//!
//! The operator console's port picker lists whatever this module discovers.
//! Connecting distinguishes *expected* failures — an unavailable port or a
//! failed handshake, both routine when the operator picks the wrong entry —
//! from transport and programming errors. Expected failures map to
//! `Ok(None)` so the console can show a plain warning; everything else
//! propagates instead of being swallowed.

use anyhow::Result;
use std::future::Future;
use thiserror::Error;
use tracing::warn;

/// Serial ports currently present on the system, by device name.
#[cfg(feature = "instrument_serial")]
pub fn available_ports() -> Result<Vec<String>> {
    use anyhow::Context;
    let ports = serialport::available_ports().context("failed to enumerate serial ports")?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

/// Failure classification for a connection attempt.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The port does not exist or could not be opened. Expected.
    #[error("port unavailable: {0}")]
    PortUnavailable(String),
    /// The device answered but the handshake failed or timed out. Expected.
    #[error("handshake failed: {0}")]
    Handshake(String),
    /// Anything else: transport faults, programming errors. Propagates.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Attempt to connect to the instrument on `port` via `open`.
///
/// Returns `Ok(Some(driver))` on success and `Ok(None)` for the expected
/// failure classes, after logging them. Unexpected failures are returned as
/// errors rather than masked.
pub async fn connect<D, F, Fut>(port: &str, open: F) -> Result<Option<D>>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = std::result::Result<D, ConnectError>>,
{
    match open(port.to_string()).await {
        Ok(driver) => Ok(Some(driver)),
        Err(e @ ConnectError::PortUnavailable(_)) | Err(e @ ConnectError::Handshake(_)) => {
            warn!("unable to initialize potentiostat on {port}: {e}");
            Ok(None)
        }
        Err(ConnectError::Transport(e)) => Err(e),
    }
}
