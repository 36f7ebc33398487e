use std::fmt;
use std::str::FromStr;

/// The four request kinds the bridge understands
///
/// `Get` and `Count` are reads and produce a value; `Set` and `Call` are
/// fire-and-forget commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Count,
    Set,
    Call,
}

impl Operation {
    /// Wire name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Count => "count",
            Operation::Set => "set",
            Operation::Call => "call",
        }
    }

    /// Whether the operation produces a value
    pub fn is_read(&self) -> bool {
        matches!(self, Operation::Get | Operation::Count)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Operation::Get),
            "count" => Ok(Operation::Count),
            "set" => Ok(Operation::Set),
            "call" => Ok(Operation::Call),
            other => Err(format!("Unknown operation '{}'", other)),
        }
    }
}
