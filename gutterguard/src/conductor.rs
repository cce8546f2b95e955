//! Conductor sizes and entry rows
//!
//! Covers the fixed set of conductor sizes the reference tables are keyed by
//! (16 AWG through 1000 kcmil), parsing of user-entered size text, and the
//! lenient quantity parsing applied to form and spreadsheet input.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::SizingError;

/// Conductor size identifier, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConductorSize {
    Awg16,
    Awg14,
    Awg12,
    Awg10,
    Awg8,
    Awg6,
    Awg4,
    Awg3,
    Awg2,
    Awg1,
    Awg1_0,
    Awg2_0,
    Awg3_0,
    Awg4_0,
    Kcmil250,
    Kcmil300,
    Kcmil350,
    Kcmil400,
    Kcmil500,
    Kcmil600,
    Kcmil700,
    Kcmil750,
    Kcmil800,
    Kcmil900,
    Kcmil1000,
}

impl ConductorSize {
    /// Every size, smallest first.
    pub const ALL: [ConductorSize; 25] = [
        ConductorSize::Awg16,
        ConductorSize::Awg14,
        ConductorSize::Awg12,
        ConductorSize::Awg10,
        ConductorSize::Awg8,
        ConductorSize::Awg6,
        ConductorSize::Awg4,
        ConductorSize::Awg3,
        ConductorSize::Awg2,
        ConductorSize::Awg1,
        ConductorSize::Awg1_0,
        ConductorSize::Awg2_0,
        ConductorSize::Awg3_0,
        ConductorSize::Awg4_0,
        ConductorSize::Kcmil250,
        ConductorSize::Kcmil300,
        ConductorSize::Kcmil350,
        ConductorSize::Kcmil400,
        ConductorSize::Kcmil500,
        ConductorSize::Kcmil600,
        ConductorSize::Kcmil700,
        ConductorSize::Kcmil750,
        ConductorSize::Kcmil800,
        ConductorSize::Kcmil900,
        ConductorSize::Kcmil1000,
    ];

    /// Table key, e.g. `"12"`, `"1/0"`, `"250"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConductorSize::Awg16 => "16",
            ConductorSize::Awg14 => "14",
            ConductorSize::Awg12 => "12",
            ConductorSize::Awg10 => "10",
            ConductorSize::Awg8 => "8",
            ConductorSize::Awg6 => "6",
            ConductorSize::Awg4 => "4",
            ConductorSize::Awg3 => "3",
            ConductorSize::Awg2 => "2",
            ConductorSize::Awg1 => "1",
            ConductorSize::Awg1_0 => "1/0",
            ConductorSize::Awg2_0 => "2/0",
            ConductorSize::Awg3_0 => "3/0",
            ConductorSize::Awg4_0 => "4/0",
            ConductorSize::Kcmil250 => "250",
            ConductorSize::Kcmil300 => "300",
            ConductorSize::Kcmil350 => "350",
            ConductorSize::Kcmil400 => "400",
            ConductorSize::Kcmil500 => "500",
            ConductorSize::Kcmil600 => "600",
            ConductorSize::Kcmil700 => "700",
            ConductorSize::Kcmil750 => "750",
            ConductorSize::Kcmil800 => "800",
            ConductorSize::Kcmil900 => "900",
            ConductorSize::Kcmil1000 => "1000",
        }
    }

    /// True for sizes expressed in kcmil rather than AWG.
    pub fn is_kcmil(&self) -> bool {
        *self >= ConductorSize::Kcmil250
    }

    /// Unit suffix used when displaying the size.
    pub fn unit(&self) -> &'static str {
        if self.is_kcmil() {
            "kcmil"
        } else {
            "AWG"
        }
    }

    /// Display label with unit, e.g. `"1/0 AWG"` or `"250 kcmil"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.as_str(), self.unit())
    }
}

impl fmt::Display for ConductorSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConductorSize {
    type Err = SizingError;

    /// Accepts the bare table key with an optional unit suffix, plus the
    /// aught spellings `0` through `0000`. `AWG` is only accepted on AWG
    /// sizes and `kcmil`/`MCM` only on kcmil sizes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unknown = || SizingError::UnknownConductorSize(trimmed.to_string());
        let lower = trimmed.to_ascii_lowercase();

        let (key, unit) = [("kcmil", Unit::Kcmil), ("mcm", Unit::Kcmil), ("awg", Unit::Awg)]
            .iter()
            .find_map(|(suffix, unit)| lower.strip_suffix(suffix).map(|k| (k.trim(), Some(*unit))))
            .unwrap_or((lower.as_str(), None));

        let key = match (key, unit) {
            ("0", None | Some(Unit::Awg)) => "1/0",
            ("00", None | Some(Unit::Awg)) => "2/0",
            ("000", None | Some(Unit::Awg)) => "3/0",
            ("0000", None | Some(Unit::Awg)) => "4/0",
            (other, _) => other,
        };

        let size = ConductorSize::ALL
            .iter()
            .copied()
            .find(|size| size.as_str() == key)
            .ok_or_else(unknown)?;

        match unit {
            Some(Unit::Awg) if size.is_kcmil() => Err(unknown()),
            Some(Unit::Kcmil) if !size.is_kcmil() => Err(unknown()),
            _ => Ok(size),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Unit {
    Awg,
    Kcmil,
}

impl TryFrom<String> for ConductorSize {
    type Error = SizingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConductorSize> for String {
    fn from(size: ConductorSize) -> Self {
        size.as_str().to_string()
    }
}

/// One line item: a conductor size and how many of it run through the enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConductorEntry {
    pub size: ConductorSize,
    pub quantity: u32,
}

impl ConductorEntry {
    pub fn new(size: ConductorSize, quantity: u32) -> Self {
        Self { size, quantity }
    }
}

/// A row as the user typed it, before the size is resolved and the
/// quantity is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    pub size: String,
    #[serde(default, deserialize_with = "quantity_text")]
    pub quantity: String,
}

impl EntryInput {
    pub fn new(size: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            quantity: quantity.into(),
        }
    }

    /// Resolve into a typed entry. An unrecognised size is an error; a
    /// malformed quantity becomes zero.
    pub fn resolve(&self) -> Result<ConductorEntry, SizingError> {
        let size = self.size.parse::<ConductorSize>()?;
        Ok(ConductorEntry::new(size, parse_quantity(&self.quantity)))
    }
}

/// Quantities in JSON may be numbers or strings; anything else reads as empty.
fn quantity_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Parse a quantity the way a form's integer field does: optional sign,
/// then leading decimal digits, rest ignored.
///
/// No digits, or a negative value, yields 0. Values past `u32::MAX` saturate.
pub fn parse_quantity(text: &str) -> u32 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        if !text.trim().is_empty() {
            tracing::debug!("Quantity {:?} is not a number, using 0", text);
        }
        return 0;
    }

    let value = digits
        .bytes()
        .fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        });

    if negative {
        if value != 0 {
            tracing::debug!("Quantity {:?} is negative, using 0", text);
        }
        return 0;
    }

    u32::try_from(value).unwrap_or_else(|_| {
        tracing::debug!("Quantity {:?} exceeds range, saturating", text);
        u32::MAX
    })
}
