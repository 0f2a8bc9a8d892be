//! Element type tags and per-element formatting
//!
//! [`ElementType`] is the closed set of scalar storage types the reader,
//! printer and comparison code understand. It is resolved once per variable and
//! carries everything the rest of the crate needs to know about the type, so no
//! other module matches on NetCDF type constants.

use std::fmt;

/// Scalar storage type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Signed 8-bit integer
    Byte,
    /// 8-bit text character
    Char,
    /// Signed 16-bit integer
    Short,
    /// Signed 32-bit integer
    Int,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Unsigned 8-bit integer
    UByte,
    /// Unsigned 16-bit integer
    UShort,
    /// Unsigned 32-bit integer
    UInt,
}

impl ElementType {
    /// Every supported type, in NetCDF type-constant order
    pub const ALL: [ElementType; 9] = [
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Float,
        Self::Double,
        Self::UByte,
        Self::UShort,
        Self::UInt,
    ];

    /// Size of one element in bytes
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Byte | Self::Char | Self::UByte => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Double => 8,
        }
    }

    /// Upper-case CDL name, as printed by `headers`
    #[must_use]
    pub const fn cdl_name(self) -> &'static str {
        match self {
            Self::Byte => "BYTE",
            Self::Char => "CHAR",
            Self::Short => "SHORT",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::UByte => "UBYTE",
            Self::UShort => "USHORT",
            Self::UInt => "UINT",
        }
    }

    /// Plain-language name used in comparison reports
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Double => "double",
            Self::UByte => "unsigned byte",
            Self::UShort => "unsigned short",
            Self::UInt => "unsigned integer",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cdl_name())
    }
}

/// A value that can live in a typed buffer
pub trait Element: Copy + Default + Into<f64> {
    /// Render one value as an output token
    fn token(self) -> String;
}

macro_rules! integer_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn token(self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_element!(i8, u8, i16, u16, i32, u32);

impl Element for f32 {
    fn token(self) -> String {
        format_g(f64::from(self))
    }
}

impl Element for f64 {
    fn token(self) -> String {
        format_g(self)
    }
}

/// Significant digits used by [`format_g`]
const G_PRECISION: i32 = 6;

/// Format a float the way C's `%g` does: six significant digits, trailing
/// zeros removed, exponent notation when the exponent is below -4 or at least 6.
#[must_use]
pub fn format_g(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to the target precision can bump the exponent (9.999995 -> 1e1),
    // so read it back from the rounded scientific form.
    let sci = format!("{:.*e}", (G_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent < -4 || exponent >= G_PRECISION {
        let mantissa = strip_trailing_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    } else {
        let decimals = (G_PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
