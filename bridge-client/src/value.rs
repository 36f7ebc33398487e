//! Scalar values carried by bridge requests and replies

use serde::Serialize;
use std::fmt;

/// A single value reported by (or written to) the Live object model
///
/// The variants follow the OSC argument types the Max bridge uses. Live has no
/// boolean type on the wire for most properties, so flags such as
/// `is_enabled` arrive as `Int(0)` / `Int(1)`; use [`LiveValue::as_bool`] to
/// read them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiveValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

impl LiveValue {
    /// Numeric view of the value; strings and booleans are not numbers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LiveValue::Int(v) => Some(f64::from(*v)),
            LiveValue::Float(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    /// Integer view; floats are accepted only when they have no fractional part
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LiveValue::Int(v) => Some(i64::from(*v)),
            LiveValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    /// Boolean view; numbers are true when non-zero
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiveValue::Bool(v) => Some(*v),
            LiveValue::Int(v) => Some(*v != 0),
            LiveValue::Float(v) => Some(*v != 0.0),
            LiveValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiveValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text view of a symbol
    ///
    /// Max sends a symbol that looks like a number as a number atom, so a
    /// track named `808` arrives as `Int(808)`. Floats keep their decimal
    /// point (`1.0` stays `1.0`). Booleans are never symbols.
    pub fn to_text(&self) -> Option<String> {
        match self {
            LiveValue::Str(s) => Some(s.clone()),
            LiveValue::Int(v) => Some(v.to_string()),
            LiveValue::Float(v) => Some(format!("{:?}", v)),
            LiveValue::Bool(_) => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            LiveValue::Bool(_) => "bool",
            LiveValue::Int(_) => "int",
            LiveValue::Float(_) => "float",
            LiveValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for LiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveValue::Bool(v) => write!(f, "{}", v),
            LiveValue::Int(v) => write!(f, "{}", v),
            LiveValue::Float(v) => write!(f, "{}", v),
            LiveValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for LiveValue {
    fn from(value: bool) -> Self {
        LiveValue::Bool(value)
    }
}

impl From<i32> for LiveValue {
    fn from(value: i32) -> Self {
        LiveValue::Int(value)
    }
}

impl From<f32> for LiveValue {
    fn from(value: f32) -> Self {
        LiveValue::Float(value)
    }
}

/// OSC floats are single precision
impl From<f64> for LiveValue {
    fn from(value: f64) -> Self {
        LiveValue::Float(value as f32)
    }
}

impl From<&str> for LiveValue {
    fn from(value: &str) -> Self {
        LiveValue::Str(value.to_string())
    }
}

impl From<String> for LiveValue {
    fn from(value: String) -> Self {
        LiveValue::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LiveValue::Int(1), Some(true))]
    #[case(LiveValue::Int(0), Some(false))]
    #[case(LiveValue::Float(0.5), Some(true))]
    #[case(LiveValue::Bool(false), Some(false))]
    #[case(LiveValue::Str("1".to_string()), None)]
    fn test_as_bool(#[case] value: LiveValue, #[case] expected: Option<bool>) {
        assert_eq!(value.as_bool(), expected);
    }

    #[rstest]
    #[case(LiveValue::Int(7), Some(7))]
    #[case(LiveValue::Float(3.0), Some(3))]
    #[case(LiveValue::Float(3.5), None)]
    #[case(LiveValue::Int(-2), Some(-2))]
    #[case(LiveValue::Str("7".to_string()), None)]
    fn test_as_i64(#[case] value: LiveValue, #[case] expected: Option<i64>) {
        assert_eq!(value.as_i64(), expected);
    }

    #[test]
    fn test_as_f64_and_str() {
        assert_eq!(LiveValue::Float(120.0).as_f64(), Some(120.0));
        assert_eq!(LiveValue::Int(140).as_f64(), Some(140.0));
        assert_eq!(LiveValue::Str("Drums".into()).as_str(), Some("Drums"));
        assert_eq!(LiveValue::Int(1).as_str(), None);
    }

    #[rstest]
    #[case(LiveValue::Str("Drums".to_string()), Some("Drums"))]
    #[case(LiveValue::Int(808), Some("808"))]
    #[case(LiveValue::Float(1.0), Some("1.0"))]
    #[case(LiveValue::Float(2.5), Some("2.5"))]
    #[case(LiveValue::Bool(true), None)]
    fn test_to_text(#[case] value: LiveValue, #[case] expected: Option<&str>) {
        assert_eq!(value.to_text().as_deref(), expected);
    }

    #[test]
    fn test_serializes_as_bare_scalar() {
        let json = serde_json::to_string(&vec![
            LiveValue::Int(3),
            LiveValue::Str("Bass".into()),
            LiveValue::Bool(true),
        ])
        .unwrap();
        assert_eq!(json, r#"[3,"Bass",true]"#);
    }
}
