use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::ParseRepError;

/// The primitive numeric types a value can be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
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

/// A value representation: either a single scalar or a complex number whose
/// real and imaginary parts share one scalar kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RepKind {
    Real(ScalarKind),
    Complex(ScalarKind),
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 10] = [
        ScalarKind::I8,
        ScalarKind::I16,
        ScalarKind::I32,
        ScalarKind::I64,
        ScalarKind::U8,
        ScalarKind::U16,
        ScalarKind::U32,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
    ];

    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }

    pub fn is_integral(self) -> bool {
        !self.is_float()
    }

    /// Floats count as signed.
    pub fn is_signed(self) -> bool {
        !self.is_unsigned()
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 | ScalarKind::U64
        )
    }

    /// Size of the type in bytes.
    pub fn size(self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 8,
        }
    }

    /// The widest type of the same category (signed, unsigned or float).
    pub fn widest(self) -> ScalarKind {
        if self.is_float() {
            ScalarKind::F64
        } else if self.is_unsigned() {
            ScalarKind::U64
        } else {
            ScalarKind::I64
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }
}

impl RepKind {
    /// The scalar kind of the value, or of each component for complex values.
    pub fn real_part(self) -> ScalarKind {
        match self {
            RepKind::Real(kind) | RepKind::Complex(kind) => kind,
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, RepKind::Complex(_))
    }

    /// Same shape, different scalar kind.
    pub fn with_real_part(self, kind: ScalarKind) -> RepKind {
        match self {
            RepKind::Real(_) => RepKind::Real(kind),
            RepKind::Complex(_) => RepKind::Complex(kind),
        }
    }
}

impl From<ScalarKind> for RepKind {
    fn from(kind: ScalarKind) -> Self {
        RepKind::Real(kind)
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl Display for RepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepKind::Real(kind) => write!(f, "{kind}"),
            RepKind::Complex(kind) => write!(f, "complex<{kind}>"),
        }
    }
}

impl FromStr for ScalarKind {
    type Err = ParseRepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ScalarKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseRepError::UnknownKind(s.to_owned()))
    }
}

impl FromStr for RepKind {
    type Err = ParseRepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("complex<").and_then(|s| s.strip_suffix('>')) {
            Some(inner) => Ok(RepKind::Complex(inner.parse()?)),
            None => Ok(RepKind::Real(s.parse()?)),
        }
    }
}

impl Serialize for RepKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RepKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{RepKind, ScalarKind};

    #[test]
    fn parse_round_trip() {
        for kind in ScalarKind::ALL {
            assert_eq!(kind.name().parse::<ScalarKind>().unwrap(), kind);

            let complex = RepKind::Complex(kind);
            assert_eq!(complex.to_string().parse::<RepKind>().unwrap(), complex);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("i128".parse::<ScalarKind>().is_err());
        assert!("complex<u7>".parse::<RepKind>().is_err());
        assert!("complex<f32".parse::<RepKind>().is_err());
    }

    #[test]
    fn categories() {
        assert!(ScalarKind::F32.is_signed());
        assert!(!ScalarKind::U8.is_signed());
        assert_eq!(ScalarKind::U16.widest(), ScalarKind::U64);
        assert_eq!(ScalarKind::I8.widest(), ScalarKind::I64);
        assert_eq!(ScalarKind::F32.widest(), ScalarKind::F64);
    }
}
