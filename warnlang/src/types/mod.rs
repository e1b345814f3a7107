//! Numeric widths: promotion ranks, range validation and scalar values

use crate::ast::{Domain, RawNumber, Width};

/// A number stored in its native Rust representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn width(self) -> Width {
        match self {
            Scalar::I8(_) => Width::I8,
            Scalar::I16(_) => Width::I16,
            Scalar::I32(_) => Width::I32,
            Scalar::I64(_) => Width::I64,
            Scalar::U8(_) => Width::U8,
            Scalar::U16(_) => Width::U16,
            Scalar::U32(_) => Width::U32,
            Scalar::U64(_) => Width::U64,
            Scalar::F32(_) => Width::F32,
            Scalar::F64(_) => Width::F64,
        }
    }

    pub fn domain(self) -> Domain {
        self.width().domain()
    }

    /// Integral view; floats truncate toward zero (saturating)
    pub fn as_i128(self) -> i128 {
        match self {
            Scalar::I8(v) => v as i128,
            Scalar::I16(v) => v as i128,
            Scalar::I32(v) => v as i128,
            Scalar::I64(v) => v as i128,
            Scalar::U8(v) => v as i128,
            Scalar::U16(v) => v as i128,
            Scalar::U32(v) => v as i128,
            Scalar::U64(v) => v as i128,
            Scalar::F32(v) => v as i128,
            Scalar::F64(v) => v as i128,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::I8(v) => v as f64,
            Scalar::I16(v) => v as f64,
            Scalar::I32(v) => v as f64,
            Scalar::I64(v) => v as f64,
            Scalar::U8(v) => v as f64,
            Scalar::U16(v) => v as f64,
            Scalar::U32(v) => v as f64,
            Scalar::U64(v) => v as f64,
            Scalar::F32(v) => v as f64,
            Scalar::F64(v) => v,
        }
    }

    /// 64-bit signed view, wrapping out-of-range integers
    pub fn as_i64(self) -> i64 {
        self.as_i128() as i64
    }

    /// Wrap an integer into `width`, two's-complement style
    pub fn from_i128(width: Width, v: i128) -> Scalar {
        match width {
            Width::I8 => Scalar::I8(v as i8),
            Width::I16 => Scalar::I16(v as i16),
            Width::I32 => Scalar::I32(v as i32),
            Width::I64 => Scalar::I64(v as i64),
            Width::U8 => Scalar::U8(v as u8),
            Width::U16 => Scalar::U16(v as u16),
            Width::U32 => Scalar::U32(v as u32),
            Width::U64 => Scalar::U64(v as u64),
            Width::F32 => Scalar::F32(v as f32),
            Width::F64 => Scalar::F64(v as f64),
        }
    }

    /// Cast a float into `width`; integer widths truncate then wrap
    pub fn from_f64(width: Width, v: f64) -> Scalar {
        match width {
            Width::F32 => Scalar::F32(v as f32),
            Width::F64 => Scalar::F64(v),
            _ => Scalar::from_i128(width, v as i128),
        }
    }

    /// Cast a source literal into `width`
    pub fn from_raw(width: Width, raw: RawNumber) -> Scalar {
        match raw {
            RawNumber::Int(n) => Scalar::from_i128(width, n as i128),
            RawNumber::Wide(x) | RawNumber::Float(x) => Scalar::from_f64(width, x),
        }
    }

    /// Re-wrap this value into another width
    pub fn cast(self, width: Width) -> Scalar {
        match self.domain() {
            Domain::Integral => Scalar::from_i128(width, self.as_i128()),
            Domain::Floating => Scalar::from_f64(width, self.as_f64()),
        }
    }

    pub fn is_zero(self) -> bool {
        match self.domain() {
            Domain::Integral => self.as_i128() == 0,
            Domain::Floating => self.as_f64() == 0.0,
        }
    }

    pub fn is_truthy(self) -> bool {
        !self.is_zero()
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::I8(v) => write!(f, "{v}"),
            Scalar::I16(v) => write!(f, "{v}"),
            Scalar::I32(v) => write!(f, "{v}"),
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::U8(v) => write!(f, "{v}"),
            Scalar::U16(v) => write!(f, "{v}"),
            Scalar::U32(v) => write!(f, "{v}"),
            Scalar::U64(v) => write!(f, "{v}"),
            Scalar::F32(v) => write!(f, "{v:?}"),
            Scalar::F64(v) => write!(f, "{v:?}"),
        }
    }
}

/// Promotion rank of a width; the wider operand of a binary op wins.
///
/// The 8-bit widths sit below every other width, unsigned first.
pub fn rank(width: Width) -> u8 {
    match width {
        Width::U8 => 0,
        Width::I8 => 1,
        Width::U16 => 2,
        Width::U32 => 3,
        Width::U64 => 4,
        Width::I16 => 5,
        Width::I32 => 6,
        Width::I64 => 7,
        Width::F32 => 8,
        Width::F64 => 9,
    }
}

/// Common width of a binary operation's operands
pub fn promote(a: Width, b: Width) -> Width {
    let promoted = if rank(a) >= rank(b) { a } else { b };
    tracing::trace!(%a, %b, %promoted, "promote");
    promoted
}

/// Inclusive integral bounds of an integer width
pub fn int_bounds(width: Width) -> Option<(i128, i128)> {
    let bounds = match width {
        Width::I8 => (i8::MIN as i128, i8::MAX as i128),
        Width::I16 => (i16::MIN as i128, i16::MAX as i128),
        Width::I32 => (i32::MIN as i128, i32::MAX as i128),
        Width::I64 => (i64::MIN as i128, i64::MAX as i128),
        Width::U8 => (0, u8::MAX as i128),
        Width::U16 => (0, u16::MAX as i128),
        Width::U32 => (0, u32::MAX as i128),
        Width::U64 => (0, u64::MAX as i128),
        Width::F32 | Width::F64 => return None,
    };
    Some(bounds)
}

/// Largest finite magnitude of a float width
fn float_max(width: Width) -> f64 {
    if width == Width::F32 {
        f32::MAX as f64
    } else {
        f64::MAX
    }
}

/// Whether a source literal is representable in `width`.
///
/// Float literals assigned to an integer width are judged by their
/// truncated value. Digit runs past `u64::MAX` fit only the float widths.
pub fn is_value_in_range(width: Width, raw: RawNumber) -> bool {
    match (int_bounds(width), raw) {
        (Some((lo, hi)), RawNumber::Int(n)) => (lo..=hi).contains(&(n as i128)),
        (Some((lo, hi)), RawNumber::Float(x)) => {
            x.is_finite() && x.trunc() >= lo as f64 && x.trunc() <= hi as f64
        }
        (Some(_), RawNumber::Wide(_)) => false,
        (None, RawNumber::Int(n)) => (n as f64) <= float_max(width),
        (None, RawNumber::Wide(x) | RawNumber::Float(x)) => x.is_finite() && x.abs() <= float_max(width),
    }
}
