use std::fmt;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Decimal money value kept in its string form.
///
/// The string is what gets stored and sent over the wire; `value()` parses
/// it for arithmetic. Construction rejects anything that is not a finite
/// decimal number, so `value()` never fails afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(String);

#[derive(Debug, Display, PartialEq)]
pub enum MoneyError {
    #[display(fmt = "'{}' is not a valid decimal amount", _0)]
    NotDecimal(String),
    #[display(fmt = "'{}' must be a percentage between 0 and 100", _0)]
    OutOfRange(String),
}

impl std::error::Error for MoneyError {}

impl Amount {
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Self(trimmed.to_string())),
            _ => Err(MoneyError::NotDecimal(raw.to_string())),
        }
    }

    /// Renders a computed value with the shortest round-trip form (`330`, `15.5`).
    pub fn from_f64(value: f64) -> Self {
        Self(value.to_string())
    }

    pub fn value(&self) -> f64 {
        // validated at construction
        self.0.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Amount {
    type Error = MoneyError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contribution rate in percent, `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Percentage(Amount);

impl Percentage {
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let amount = Amount::parse(raw)?;
        if !(0.0..=100.0).contains(&amount.value()) {
            return Err(MoneyError::OutOfRange(raw.to_string()));
        }
        Ok(Self(amount))
    }

    /// `rate / 100`, the multiplier applied to basic pay.
    pub fn fraction(&self) -> f64 {
        self.0.value() / 100.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Percentage {
    type Error = MoneyError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<Percentage> for String {
    fn from(p: Percentage) -> Self {
        p.0.into()
    }
}
