//! Print the open Live set as JSON
//!
//! Requires Live running with the Max bridge device loaded.
//!
//! ```text
//! LIVE_LOG_MODE=development cargo run -p live-api --example dump_set [config.json]
//! ```

use live_api::logging::init_logging_from_env;
use live_api::{ClientConfig, LiveClient, TrackRef};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::from_json_file(path)?,
        None => ClientConfig::default(),
    };
    let client = LiveClient::connect(config).await?;

    let tempo = client.get_tempo().await?;
    let scenes = client.get_scenes().await?;
    let tracks = client.get_tracks().await?;

    let mut devices = Vec::with_capacity(tracks.len());
    for track in &tracks {
        devices.push(json!({
            "track": track.id,
            "devices": client.get_devices_for_track(TrackRef::Index(track.id)).await?,
        }));
    }
    let master_devices = client.get_devices_for_master_track().await?;

    let set = json!({
        "tempo": tempo,
        "scenes": scenes,
        "tracks": tracks,
        "devices": devices,
        "master_devices": master_devices,
    });
    println!("{}", serde_json::to_string_pretty(&set)?);

    Ok(())
}
