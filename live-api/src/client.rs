use bridge_client::{Bridge, LiveValue, UdpBridge};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::aggregator::Aggregator;
use crate::config::{ClientConfig, ParameterLookup};
use crate::model::{Device, Parameter, Scene, Track};
use crate::path::{LivePath, TrackRef, SONG_TEMPO};
use crate::record::{unexpected, Record};
use crate::Result;

/// Queries and commands against a running Live set
///
/// The client owns its bridge connection; there is no process-wide state.
/// Construct one with [`LiveClient::connect`] for a real bridge, or
/// [`LiveClient::with_bridge`] to supply any [`Bridge`] implementation.
///
/// # Example
///
/// ```no_run
/// use live_api::{ClientConfig, LiveClient};
///
/// # async fn run() -> live_api::Result<()> {
/// let client = LiveClient::connect(ClientConfig::default()).await?;
///
/// client.set_tempo(124.0).await?;
/// for scene in client.get_scenes().await? {
///     println!("{}: {}", scene.id, scene.name);
/// }
/// client.play_scene(2).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LiveClient<B = UdpBridge> {
    aggregator: Aggregator<B>,
    config: ClientConfig,
}

impl<B> Clone for LiveClient<B> {
    fn clone(&self) -> Self {
        Self {
            aggregator: self.aggregator.clone(),
            config: self.config.clone(),
        }
    }
}

impl LiveClient<UdpBridge> {
    /// Bind a UDP bridge with the addresses in `config`
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let bridge = UdpBridge::bind(&config.bridge).await?;
        info!(send_addr = %config.bridge.send_addr, "Connected to Max bridge");
        Self::with_bridge(bridge, config)
    }
}

impl<B: Bridge> LiveClient<B> {
    /// Use an existing bridge
    pub fn with_bridge(bridge: B, config: ClientConfig) -> Result<Self> {
        Self::with_shared_bridge(Arc::new(bridge), config)
    }

    /// Use a bridge that is shared with other owners
    pub fn with_shared_bridge(bridge: Arc<B>, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: Aggregator::new(bridge, &config),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Lower-level access for reads this client has no query for
    pub fn aggregator(&self) -> &Aggregator<B> {
        &self.aggregator
    }

    pub fn bridge(&self) -> &Arc<B> {
        self.aggregator.bridge()
    }

    /// Launch the scene at `scene`
    pub async fn play_scene(&self, scene: usize) -> Result<()> {
        debug!(scene, "Launching scene");
        self.aggregator
            .trigger(&LivePath::live_set().item("scenes", scene))
            .await
    }

    /// All scenes with name and color
    #[instrument(skip(self))]
    pub async fn get_scenes(&self) -> Result<Vec<Scene>> {
        self.aggregator
            .fetch_typed(&LivePath::live_set(), "scenes")
            .await
    }

    /// All regular tracks with their names
    #[instrument(skip(self))]
    pub async fn get_tracks(&self) -> Result<Vec<Track>> {
        self.aggregator
            .fetch_typed(&LivePath::live_set(), "tracks")
            .await
    }

    /// Current song tempo in BPM
    pub async fn get_tempo(&self) -> Result<f64> {
        let value = self
            .aggregator
            .get(&LivePath::new(SONG_TEMPO), "value")
            .await?;
        value
            .as_f64()
            .ok_or_else(|| unexpected("value", "number", &value))
    }

    /// Set the song tempo; the bridge does not acknowledge writes
    pub async fn set_tempo(&self, tempo: f64) -> Result<()> {
        debug!(tempo, "Setting tempo");
        self.aggregator
            .write(&LivePath::new(SONG_TEMPO), "value", LiveValue::from(tempo))
            .await
    }

    /// Devices on `track`, each with its parameters
    ///
    /// Which track the parameters are read from depends on
    /// [`ClientConfig::parameter_lookup`].
    #[instrument(skip(self, track), fields(track = %track))]
    pub async fn get_devices_for_track(&self, track: TrackRef) -> Result<Vec<Device>> {
        let mut devices: Vec<Device> = self
            .aggregator
            .fetch_typed(&track.path(), "devices")
            .await?;

        let parameter_track = match self.config.parameter_lookup {
            ParameterLookup::RequestedTrack => track,
            ParameterLookup::MasterTrack => TrackRef::Master,
        };

        let parameters = try_join_all(
            devices
                .iter()
                .map(|device| self.get_parameters_for_device(parameter_track, device.id)),
        )
        .await?;

        for (device, parameters) in devices.iter_mut().zip(parameters) {
            device.parameters = parameters;
        }
        Ok(devices)
    }

    /// Devices on the master track, each with its parameters
    pub async fn get_devices_for_master_track(&self) -> Result<Vec<Device>> {
        self.get_devices_for_track(TrackRef::Master).await
    }

    /// Parameters of the `device`th device on `track`
    #[instrument(skip(self, track), fields(track = %track))]
    pub async fn get_parameters_for_device(
        &self,
        track: TrackRef,
        device: usize,
    ) -> Result<Vec<Parameter>> {
        self.aggregator
            .fetch_typed(&track.device_path(device), "parameters")
            .await
    }

    /// Untyped records for any collection
    pub async fn fetch_list(
        &self,
        path: &LivePath,
        property: &str,
        fields: &[&str],
    ) -> Result<Vec<Record>> {
        self.aggregator.fetch_list(path, property, fields).await
    }
}
