//! Typed async access to an Ableton Live set through the Max bridge
//!
//! This crate turns the bridge's path/property addressing into structured
//! queries: list scenes, tracks, devices and their parameters; read and write
//! the tempo; launch scenes. It uses the private `bridge-client` crate for
//! the wire protocol.
//!
//! ```rust,no_run
//! use live_api::{ClientConfig, LiveClient, TrackRef};
//!
//! # async fn run() -> live_api::Result<()> {
//! let client = LiveClient::connect(ClientConfig::default()).await?;
//!
//! println!("tempo: {}", client.get_tempo().await?);
//! for device in client.get_devices_for_track(TrackRef::Index(0)).await? {
//!     println!("{} ({} parameters)", device.name, device.parameters.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Collections are read with a count followed by one read per child and
//! field, issued concurrently. [`ClientConfig`] bounds how many reads are in
//! flight and how long each may take.

pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod operation;
pub mod path;
pub mod record;

pub use aggregator::Aggregator;
pub use bridge_client::{Bridge, BridgeConfig, BridgeError, LiveValue};
pub use client::LiveClient;
pub use config::{ClientConfig, ParameterLookup};
pub use error::{ApiError, Result};
pub use model::{Device, DeviceType, Parameter, Scene, Track};
pub use operation::Operation;
pub use path::{LivePath, TrackRef};
pub use record::{FromRecord, Record};
