//! UDP transport to the Max bridge

use async_trait::async_trait;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use crate::osc::OscMessage;
use crate::{Bridge, BridgeConfig, BridgeError, LiveValue};

const GET_REPLY: &str = "/_get_reply";
const OBSERVER_REPLY: &str = "/_observer_reply";

/// Largest datagram the receive loop accepts
const MAX_DATAGRAM: usize = 65_536;

type PendingTable = DashMap<String, oneshot::Sender<LiveValue>>;

/// Bridge implementation speaking OSC over UDP
///
/// Every read gets a fresh callback id. The id is registered in a pending
/// table before the request is sent; a background task owns the receive half
/// of the socket and completes the matching entry when the reply arrives.
///
/// # Example
///
/// ```no_run
/// use bridge_client::{Bridge, BridgeConfig, UdpBridge};
///
/// # async fn run() -> Result<(), bridge_client::BridgeError> {
/// let bridge = UdpBridge::bind(&BridgeConfig::default()).await?;
/// let tempo = bridge
///     .get("live_set master_track mixer_device song_tempo", "value")
///     .await?;
/// println!("tempo: {}", tempo);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UdpBridge {
    socket: Arc<UdpSocket>,
    send_addr: SocketAddr,
    pending: Arc<PendingTable>,
    closed: Arc<AtomicBool>,
    receiver: JoinHandle<()>,
}

impl UdpBridge {
    /// Bind the reply socket and start the receive loop
    pub async fn bind(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let socket = UdpSocket::bind(config.bind_addr).await.map_err(|e| {
            BridgeError::Network(format!(
                "Failed to bind UDP socket on {}: {}",
                config.bind_addr, e
            ))
        })?;
        let local_addr = socket.local_addr()?;
        let socket = Arc::new(socket);
        let pending = Arc::new(PendingTable::new());
        let closed = Arc::new(AtomicBool::new(false));

        let receiver = tokio::spawn(receive_loop(
            Arc::clone(&socket),
            Arc::clone(&pending),
            Arc::clone(&closed),
        ));

        info!(
            bind_addr = %local_addr,
            send_addr = %config.send_addr,
            "Bridge client bound"
        );

        Ok(Self {
            socket,
            send_addr: config.send_addr,
            pending,
            closed,
            receiver,
        })
    }

    /// Address replies are received on
    pub fn local_addr(&self) -> Result<SocketAddr, BridgeError> {
        Ok(self.socket.local_addr()?)
    }

    /// Number of reads still waiting for a reply
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Whether replies can still arrive
    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && !self.receiver.is_finished()
    }

    async fn send(&self, message: OscMessage) -> Result<(), BridgeError> {
        if !self.is_open() {
            return Err(BridgeError::Closed);
        }
        let datagram = message.encode();
        trace!(address = %message.address, bytes = datagram.len(), "Sending datagram");

        self.socket
            .send_to(&datagram, self.send_addr)
            .await
            .map_err(|e| {
                BridgeError::Network(format!("Failed to send {}: {}", message.address, e))
            })?;
        Ok(())
    }

    async fn request(
        &self,
        action: &str,
        path: &str,
        property: &str,
    ) -> Result<LiveValue, BridgeError> {
        let callback = Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(callback.clone(), tx);
        let _guard = PendingGuard {
            pending: &self.pending,
            callback: &callback,
        };
        // The receive loop sets `closed` before clearing the table, so an
        // entry inserted after the clear is caught here
        if !self.is_open() {
            return Err(BridgeError::Closed);
        }

        self.send(OscMessage::new(
            format!("/{}", action),
            vec![path.into(), property.into(), callback.as_str().into()],
        ))
        .await?;
        debug!(action, path, property, %callback, "Awaiting bridge reply");

        rx.await.map_err(|_| BridgeError::Closed)
    }
}

impl Drop for UdpBridge {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}

#[async_trait]
impl Bridge for UdpBridge {
    async fn get(&self, path: &str, property: &str) -> Result<LiveValue, BridgeError> {
        self.request("get", path, property).await
    }

    async fn count(&self, path: &str, property: &str) -> Result<LiveValue, BridgeError> {
        self.request("count", path, property).await
    }

    async fn set(&self, path: &str, property: &str, value: LiveValue) -> Result<(), BridgeError> {
        debug!(path, property, %value, "Setting property");
        self.send(OscMessage::new(
            "/set",
            vec![path.into(), property.into(), value],
        ))
        .await
    }

    async fn call(&self, path: &str, method: &str) -> Result<(), BridgeError> {
        debug!(path, method, "Calling method");
        self.send(OscMessage::new("/call", vec![path.into(), method.into()]))
            .await
    }
}

/// Removes a pending entry when the waiting read goes away, including when
/// the read future is dropped by a timeout
struct PendingGuard<'a> {
    pending: &'a PendingTable,
    callback: &'a str,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.remove(self.callback);
    }
}

async fn receive_loop(
    socket: Arc<UdpSocket>,
    pending: Arc<PendingTable>,
    closed: Arc<AtomicBool>,
) {
    let mut buffer = vec![0u8; MAX_DATAGRAM];

    loop {
        let (size, from) = match socket.recv_from(&mut buffer).await {
            Ok(received) => received,
            // Windows reports ICMP port-unreachable for earlier sends here
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionReset => {
                debug!(error = %e, "Bridge not reachable yet");
                continue;
            }
            Err(e) => {
                error!(error = %e, "Bridge receive loop stopped");
                closed.store(true, Ordering::SeqCst);
                pending.clear();
                return;
            }
        };
        trace!(%from, bytes = size, "Received datagram");

        match OscMessage::decode(&buffer[..size]) {
            Ok(message) => {
                dispatch_reply(&pending, message);
            }
            Err(e) => warn!(%from, error = %e, "Dropping undecodable datagram"),
        }
    }
}

/// Complete the pending read a reply belongs to. Returns whether a waiting
/// read received the value.
fn dispatch_reply(pending: &PendingTable, message: OscMessage) -> bool {
    if message.address != GET_REPLY && message.address != OBSERVER_REPLY {
        debug!(address = %message.address, "Ignoring unexpected message");
        return false;
    }

    let mut args = message.args.into_iter();
    let callback = match args.next() {
        Some(LiveValue::Str(callback)) => callback,
        _ => {
            warn!(address = %message.address, "Reply without callback id");
            return false;
        }
    };

    let value = match collapse_values(args.collect()) {
        Some(value) => value,
        None => {
            warn!(%callback, "Reply without value");
            return false;
        }
    };

    match pending.remove(&callback) {
        Some((_, sender)) => sender.send(value).is_ok(),
        None => {
            debug!(%callback, "No pending request for reply");
            false
        }
    }
}

/// Max splits symbols containing spaces into several atoms; join them back
fn collapse_values(mut values: Vec<LiveValue>) -> Option<LiveValue> {
    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(LiveValue::Str(
            values
                .iter()
                .map(|v| v.to_text().unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join(" "),
        )),
    }
}
