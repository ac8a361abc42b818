use std::{
    fmt::{self, Display},
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use magnitude::Magnitude;
use rep::RepKind;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A batch of conversions to check, read from TOML:
///
/// ```toml
/// [[case]]
/// from = "u16"
/// to = "i8"
/// factor = "3 / 1000"
/// value = "40000"
/// expect = "overflow"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub case: Vec<Case>,
}

#[derive(Debug, Deserialize)]
pub struct Case {
    /// Shown in reports instead of the conversion itself.
    pub name: Option<String>,
    pub from: RepKind,
    pub to: RepKind,
    #[serde(default = "Magnitude::one")]
    pub factor: Magnitude,
    pub value: String,
    #[serde(default)]
    pub expect: Expect,
    /// The exact output, in the destination type.
    pub result: Option<String>,
}

/// What running a case should do.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    /// Converts without overflow or truncation.
    #[default]
    Exact,
    Overflow,
    Truncate,
    /// No conversion exists for the types and factor.
    Invalid,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read plan `{}`", path.display()))?;
        let plan: Plan = toml::from_str(&raw)
            .with_context(|| format!("failed to parse plan `{}`", path.display()))?;
        info!("Loaded {} cases from `{}`", plan.case.len(), path.display());
        Ok(plan)
    }
}

impl Case {
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} {} -> {} by {}", self.value, self.from, self.to, self.factor),
        }
    }
}

impl Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expect::Exact => "exact",
            Expect::Overflow => "overflow",
            Expect::Truncate => "truncate",
            Expect::Invalid => "invalid",
        })
    }
}
