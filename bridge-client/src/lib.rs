//! Private client for the Max bridge that exposes the Live object model
//!
//! The bridge is a Max patch listening for OSC messages over UDP. It resolves
//! space-delimited object paths such as `live_set tracks 2 devices 0` and
//! answers reads with a reply datagram tagged by a caller-chosen callback id.
//! Writes and method calls are never acknowledged.
//!
//! This crate provides the [`Bridge`] trait that higher layers program
//! against, and [`UdpBridge`], the implementation that talks to a running
//! bridge.

mod error;
pub mod osc;
mod udp;
mod value;

#[cfg(feature = "test-support")]
pub mod testing;

pub use error::BridgeError;
pub use udp::UdpBridge;
pub use value::LiveValue;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Port the Max bridge listens on for requests
pub const DEFAULT_SEND_PORT: u16 = 9000;

/// Port the Max bridge sends replies to
pub const DEFAULT_RECEIVE_PORT: u16 = 9001;

/// Path/property addressed access to the Live object model
///
/// `get` and `count` resolve once with the value reported by the bridge.
/// `set` and `call` are fire-and-forget: `Ok(())` only means the request left
/// this process.
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Read a property of the object at `path`
    async fn get(&self, path: &str, property: &str) -> Result<LiveValue, BridgeError>;

    /// Count the children of the object at `path` under `property`
    async fn count(&self, path: &str, property: &str) -> Result<LiveValue, BridgeError>;

    /// Write a property of the object at `path`
    async fn set(&self, path: &str, property: &str, value: LiveValue) -> Result<(), BridgeError>;

    /// Invoke a method (e.g. `fire`) on the object at `path`
    async fn call(&self, path: &str, method: &str) -> Result<(), BridgeError>;
}

/// Socket addresses used by [`UdpBridge`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Where requests are sent (the Max patch's `udpreceive`)
    pub send_addr: SocketAddr,
    /// Local address replies arrive on (the Max patch's `udpsend` target)
    pub bind_addr: SocketAddr,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            send_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_SEND_PORT)),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_RECEIVE_PORT)),
        }
    }
}

impl BridgeConfig {
    pub fn new(send_addr: SocketAddr, bind_addr: SocketAddr) -> Self {
        Self {
            send_addr,
            bind_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        let config = BridgeConfig::default();
        assert_eq!(config.send_addr.port(), 9000);
        assert_eq!(config.bind_addr.port(), 9001);
        assert!(config.send_addr.ip().is_loopback());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{ "send_addr": "192.168.1.20:9000" }"#).unwrap();
        assert_eq!(config.send_addr, "192.168.1.20:9000".parse().unwrap());
        assert_eq!(config.bind_addr, BridgeConfig::default().bind_addr);
    }
}
