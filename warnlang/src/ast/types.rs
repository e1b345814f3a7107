//! Type AST nodes

use serde::{Deserialize, Serialize};

/// Fixed-width numeric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

/// Native arithmetic domain an operation runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Integral,
    Floating,
}

impl Width {
    pub const ALL: [Width; 10] = [
        Width::I8,
        Width::I16,
        Width::I32,
        Width::I64,
        Width::U8,
        Width::U16,
        Width::U32,
        Width::U64,
        Width::F32,
        Width::F64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Width::I8 => "i8",
            Width::I16 => "i16",
            Width::I32 => "i32",
            Width::I64 => "i64",
            Width::U8 => "u8",
            Width::U16 => "u16",
            Width::U32 => "u32",
            Width::U64 => "u64",
            Width::F32 => "f32",
            Width::F64 => "f64",
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Width::F32 | Width::F64 => Domain::Floating,
            _ => Domain::Integral,
        }
    }
}

impl std::fmt::Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric literal exactly as written in the source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawNumber {
    Int(u64),
    /// Digit run past `u64::MAX`, kept as its nearest `f64`
    Wide(f64),
    Float(f64),
}

impl RawNumber {
    /// Width a literal takes when no declaration annotates it
    pub fn default_width(self) -> Width {
        match self {
            RawNumber::Int(_) | RawNumber::Wide(_) => Width::I64,
            RawNumber::Float(_) => Width::F64,
        }
    }
}

impl std::fmt::Display for RawNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawNumber::Int(n) => write!(f, "{n}"),
            RawNumber::Wide(x) => write!(f, "{x:.0}"),
            RawNumber::Float(x) => write!(f, "{x}"),
        }
    }
}
