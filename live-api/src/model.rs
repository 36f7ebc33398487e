//! Typed records for the collections the client exposes

use serde::Serialize;

use crate::record::{FromRecord, Record};
use crate::Result;

/// A scene in the session view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub id: usize,
    pub name: String,
    /// RGB color as reported by Live (0xRRGGBB)
    pub color: i64,
}

impl FromRecord for Scene {
    const FIELDS: &'static [&'static str] = &["name", "color"];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id,
            name: record.string("name")?,
            color: record.int("color")?,
        })
    }
}

/// A regular (non-master) track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: usize,
    pub name: String,
}

impl FromRecord for Track {
    const FIELDS: &'static [&'static str] = &["name"];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id,
            name: record.string("name")?,
        })
    }
}

/// Live's device type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Undefined,
    Instrument,
    AudioEffect,
    MidiEffect,
    Other(i64),
}

impl From<i64> for DeviceType {
    fn from(code: i64) -> Self {
        match code {
            0 => DeviceType::Undefined,
            1 => DeviceType::Instrument,
            2 => DeviceType::AudioEffect,
            4 => DeviceType::MidiEffect,
            other => DeviceType::Other(other),
        }
    }
}

/// A device on a track, with its parameters once they have been fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub class_name: String,
    pub can_have_drum_pads: bool,
    pub can_have_chains: bool,
    #[serde(rename = "Parameters")]
    pub parameters: Vec<Parameter>,
}

impl FromRecord for Device {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "type",
        "class_name",
        "can_have_drum_pads",
        "can_have_chains",
    ];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id,
            name: record.string("name")?,
            device_type: DeviceType::from(record.int("type")?),
            class_name: record.string("class_name")?,
            can_have_drum_pads: record.flag("can_have_drum_pads")?,
            can_have_chains: record.flag("can_have_chains")?,
            parameters: Vec::new(),
        })
    }
}

/// A device parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub id: usize,
    pub default_value: f64,
    pub is_enabled: bool,
    pub is_quantized: bool,
    pub max: f64,
    pub min: f64,
    pub name: String,
    pub original_name: String,
    pub value: f64,
}

impl FromRecord for Parameter {
    const FIELDS: &'static [&'static str] = &[
        "default_value",
        "is_enabled",
        "is_quantized",
        "max",
        "min",
        "name",
        "original_name",
        "value",
    ];

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id,
            default_value: record.float("default_value")?,
            is_enabled: record.flag("is_enabled")?,
            is_quantized: record.flag("is_quantized")?,
            max: record.float("max")?,
            min: record.float("min")?,
            name: record.string("name")?,
            original_name: record.string("original_name")?,
            value: record.float("value")?,
        })
    }
}
