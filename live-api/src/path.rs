//! Object paths in the Live object model
//!
//! Paths are space-delimited segments starting at a root such as `live_set`,
//! e.g. `live_set tracks 2 devices 0`. They are built by appending segments
//! and indices; nothing checks that the result names a real object, the
//! bridge reports that.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of the song's tempo parameter
pub const SONG_TEMPO: &str = "live_set master_track mixer_device song_tempo";

/// A space-delimited object path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LivePath(String);

impl LivePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The song root, `live_set`
    pub fn live_set() -> Self {
        Self::new("live_set")
    }

    /// Append a literal segment such as `devices`
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{} {}", self.0, segment))
    }

    /// Append a numeric index
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{} {}", self.0, index))
    }

    /// `<self> <collection> <index>`, the address of one child of a collection
    pub fn item(&self, collection: &str, index: usize) -> Self {
        Self(format!("{} {} {}", self.0, collection, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LivePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Which track an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackRef {
    /// `live_set master_track`
    Master,
    /// `live_set tracks <n>`
    Index(usize),
}

impl TrackRef {
    pub fn path(&self) -> LivePath {
        match self {
            TrackRef::Master => LivePath::live_set().child("master_track"),
            TrackRef::Index(index) => LivePath::live_set().item("tracks", *index),
        }
    }

    /// Path of the `device`th device on this track
    pub fn device_path(&self, device: usize) -> LivePath {
        self.path().item("devices", device)
    }
}

impl From<usize> for TrackRef {
    fn from(index: usize) -> Self {
        TrackRef::Index(index)
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackRef::Master => f.write_str("master_track"),
            TrackRef::Index(index) => write!(f, "track {}", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_child_and_index() {
        let path = LivePath::live_set().child("tracks").index(2).child("devices");
        assert_eq!(path.as_str(), "live_set tracks 2 devices");
        assert_eq!(LivePath::live_set().item("scenes", 3).to_string(), "live_set scenes 3");
    }

    #[test]
    fn test_malformed_paths_are_not_rejected() {
        let path = LivePath::new("").child("").index(0);
        assert_eq!(path.as_str(), "  0");
    }

    #[rstest]
    #[case(TrackRef::Master, "live_set master_track")]
    #[case(TrackRef::Index(0), "live_set tracks 0")]
    #[case(TrackRef::Index(12), "live_set tracks 12")]
    fn test_track_paths(#[case] track: TrackRef, #[case] expected: &str) {
        assert_eq!(track.path().as_str(), expected);
    }

    #[rstest]
    #[case(TrackRef::Master, 1, "live_set master_track devices 1")]
    #[case(TrackRef::Index(2), 0, "live_set tracks 2 devices 0")]
    fn test_device_paths(#[case] track: TrackRef, #[case] device: usize, #[case] expected: &str) {
        assert_eq!(track.device_path(device).as_str(), expected);
    }

    #[test]
    fn test_song_tempo_path() {
        let built = TrackRef::Master.path().child("mixer_device").child("song_tempo");
        assert_eq!(built.as_str(), SONG_TEMPO);
    }
}
