//! Status socket
//!
//! External renderers and the CLI can query the daemon's logical switch
//! state over a Unix domain socket. The protocol is JSON lines: every
//! request line gets one response line, and a client may issue any number
//! of requests on one connection before hanging up. Responses are served
//! from the engine loop's latest state snapshot, so answering never
//! touches tracker state.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::watch;

/// Request line sent by a client.
///
/// `{"type": "status"}` is the only request today; the tag leaves room for
/// more.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Query the current logical switch states
    Status,
}

/// Response line written back for a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcResponse {
    /// Current logical state of every switch
    Status {
        /// One entry per switch in the catalog
        switches: Vec<SwitchState>,
    },
    /// The request line could not be understood
    Error {
        /// Error description
        message: String,
    },
}

/// Logical state of a single switch
///
/// The regular-key slot reports `held`; modifier and mouse switches
/// report `pressed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwitchState {
    /// Switch name (e.g., "Shift", "Key")
    pub switch: String,
    /// Logical pressed state, for modifier and mouse switches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressed: Option<bool>,
    /// Held label, for the regular-key slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub held: Option<String>,
}

/// Unix socket server answering switch-state queries from the engine
/// loop's latest snapshot.
///
/// The socket file is removed again when the server is dropped.
pub struct StatusSocket {
    listener: UnixListener,
    path: PathBuf,
    status: watch::Receiver<Vec<SwitchState>>,
}

impl StatusSocket {
    /// Bind the status socket, replacing any stale socket file left behind
    /// by a previous run.
    pub fn bind(status: watch::Receiver<Vec<SwitchState>>) -> Result<Self> {
        let path = socket_path();

        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Replaced stale socket at {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to clear stale socket at {}", path.display())
                });
            }
        }

        let listener = UnixListener::bind(&path)
            .with_context(|| format!("Failed to bind status socket at {}", path.display()))?;

        tracing::info!("Status socket at {}", path.display());

        Ok(Self {
            listener,
            path,
            status,
        })
    }

    /// Accept clients until the daemon exits, one task per connection.
    pub async fn serve(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    let status = self.status.clone();
                    tokio::spawn(async move {
                        if let Err(e) = answer_client(stream, status).await {
                            tracing::warn!("Status connection failed: {:#}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!("Status accept failed: {}", e);
                }
            }
        }
    }
}

impl Drop for StatusSocket {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Socket path: `$XDG_RUNTIME_DIR/keycast.sock`, or a uid-suffixed path in
/// /tmp when XDG_RUNTIME_DIR is unset.
pub fn socket_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("keycast.sock")
    } else {
        let uid = nix::unistd::Uid::current();
        PathBuf::from(format!("/tmp/keycast-{}.sock", uid))
    }
}

/// Answer every request line on one connection until the client hangs up.
async fn answer_client(
    stream: UnixStream,
    status: watch::Receiver<Vec<SwitchState>>,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read status request")?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<IpcRequest>(line) {
            Ok(IpcRequest::Status) => IpcResponse::Status {
                switches: status.borrow().clone(),
            },
            Err(e) => IpcResponse::Error {
                message: format!("Invalid request: {}", e),
            },
        };

        let mut payload =
            serde_json::to_string(&response).context("Failed to serialize status response")?;
        payload.push('\n');

        writer
            .write_all(payload.as_bytes())
            .await
            .context("Failed to write status response")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request: IpcRequest = serde_json::from_str(r#"{"type":"status"}"#).unwrap();
        assert_eq!(request, IpcRequest::Status);
    }

    #[test]
    fn test_status_response_round_trip() {
        let response = IpcResponse::Status {
            switches: vec![
                SwitchState {
                    switch: "Shift".to_string(),
                    pressed: Some(true),
                    held: None,
                },
                SwitchState {
                    switch: "Key".to_string(),
                    pressed: None,
                    held: Some("a".to_string()),
                },
            ],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""type":"status""#));
        assert!(!json.contains("null"), "absent fields must be skipped");

        let parsed: IpcResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_unknown_request_type_rejected() {
        let result = serde_json::from_str::<IpcRequest>("{\"type\":\"dance\"}");
        assert!(result.is_err());
    }
}
