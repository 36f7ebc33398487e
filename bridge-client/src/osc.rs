//! Minimal OSC 1.0 message codec
//!
//! The Max bridge speaks plain OSC messages over UDP (no bundles). Only the
//! argument types the bridge produces are supported: `i`, `f`, `s`, `T` and `F`.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::BridgeError;
use crate::value::LiveValue;

/// A decoded (or to-be-encoded) OSC message
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub args: Vec<LiveValue>,
}

impl OscMessage {
    pub fn new(address: impl Into<String>, args: Vec<LiveValue>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Serialize to a datagram
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64);
        put_padded_str(&mut buf, &self.address);

        let mut tags = String::with_capacity(self.args.len() + 1);
        tags.push(',');
        for arg in &self.args {
            tags.push(match arg {
                LiveValue::Int(_) => 'i',
                LiveValue::Float(_) => 'f',
                LiveValue::Str(_) => 's',
                LiveValue::Bool(true) => 'T',
                LiveValue::Bool(false) => 'F',
            });
        }
        put_padded_str(&mut buf, &tags);

        for arg in &self.args {
            match arg {
                LiveValue::Int(v) => buf.put_i32(*v),
                LiveValue::Float(v) => buf.put_f32(*v),
                LiveValue::Str(s) => put_padded_str(&mut buf, s),
                LiveValue::Bool(_) => {}
            }
        }

        buf.freeze()
    }

    /// Parse a datagram
    pub fn decode(mut datagram: &[u8]) -> Result<Self, BridgeError> {
        let address = take_padded_str(&mut datagram)?;
        if !address.starts_with('/') {
            return Err(BridgeError::Codec(format!(
                "Address pattern must start with '/': {:?}",
                address
            )));
        }

        // Some senders omit the type tag string when there are no arguments
        if datagram.is_empty() {
            return Ok(Self::new(address, Vec::new()));
        }

        let tags = take_padded_str(&mut datagram)?;
        let tags = tags
            .strip_prefix(',')
            .ok_or_else(|| BridgeError::Codec(format!("Malformed type tag string: {:?}", tags)))?;

        let mut args = Vec::with_capacity(tags.len());
        for tag in tags.chars() {
            let arg = match tag {
                'i' => LiveValue::Int(take_i32(&mut datagram)?),
                'f' => LiveValue::Float(f32::from_bits(take_i32(&mut datagram)? as u32)),
                's' => LiveValue::Str(take_padded_str(&mut datagram)?),
                'T' => LiveValue::Bool(true),
                'F' => LiveValue::Bool(false),
                other => {
                    return Err(BridgeError::Codec(format!(
                        "Unsupported OSC type tag '{}'",
                        other
                    )))
                }
            };
            args.push(arg);
        }

        Ok(Self::new(address, args))
    }
}

/// Write a NUL-terminated string padded to a multiple of four bytes
fn put_padded_str(buf: &mut BytesMut, s: &str) {
    buf.put_slice(s.as_bytes());
    let padding = 4 - (s.len() % 4);
    buf.put_bytes(0, padding);
}

fn take_padded_str(buf: &mut &[u8]) -> Result<String, BridgeError> {
    let end = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| BridgeError::Codec("Unterminated OSC string".to_string()))?;
    let padded_len = (end / 4 + 1) * 4;
    if buf.len() < padded_len {
        return Err(BridgeError::Codec("Truncated OSC string padding".to_string()));
    }

    let s = std::str::from_utf8(&buf[..end])
        .map_err(|e| BridgeError::Codec(format!("Invalid UTF-8 in OSC string: {}", e)))?
        .to_string();
    buf.advance(padded_len);
    Ok(s)
}

fn take_i32(buf: &mut &[u8]) -> Result<i32, BridgeError> {
    if buf.remaining() < 4 {
        return Err(BridgeError::Codec("Truncated OSC argument".to_string()));
    }
    Ok(buf.get_i32())
}
