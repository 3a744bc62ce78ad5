use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for zakat applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Joined applicant, application, and household snapshot consumed by the scoring engine.
///
/// Every numeric field is optional. Values that are missing or cannot be read as a
/// finite number deserialize to `None`, and the engine treats `None` as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringInput {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub applicant_salary: Option<Decimal>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub marital_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_household_income: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub outstanding_debts: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub number_of_dependents: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub dependent_count: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub asnaf_category: Option<String>,
}

impl ScoringInput {
    pub fn household_income(&self) -> Decimal {
        self.total_household_income.unwrap_or(Decimal::ZERO)
    }

    pub fn debts(&self) -> Decimal {
        self.outstanding_debts.unwrap_or(Decimal::ZERO)
    }

    /// Dependents used for scoring.
    ///
    /// The count derived from dependent records wins whenever it is non-zero. A zero
    /// record count falls back to the self-reported figure, since the record count is
    /// always present even when no dependents were entered.
    pub fn effective_dependents(&self) -> u32 {
        match (self.dependent_count, self.number_of_dependents) {
            (Some(count), _) if count > 0 => count,
            (_, Some(reported)) => reported,
            _ => 0,
        }
    }
}

/// Reads a decimal the way a form value would be read: numbers and numeric strings
/// are accepted, anything else is absent.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Reads a dependent count. Fractions are truncated and negatives are absent.
pub fn parse_count(raw: &str) -> Option<u32> {
    parse_decimal(raw).and_then(decimal_to_count)
}

fn decimal_to_count(value: Decimal) -> Option<u32> {
    if value.is_sign_negative() {
        return None;
    }
    value.trunc().to_u32()
}

fn float_to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::try_from(value))
        .ok()
}

struct LenientDecimal;

impl<'de> Visitor<'de> for LenientDecimal {
    type Value = Option<Decimal>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(float_to_decimal(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(parse_decimal(value))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientDecimal)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map
            .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
            .is_some()
        {}
        Ok(None)
    }
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientDecimal)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserializer.deserialize_any(LenientDecimal)?;
    Ok(value.and_then(decimal_to_count))
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
