//! # Signal Model Primitives
//!
//! A *signal* is a named field element with a visibility flag. This module
//! holds the circuit-independent pieces of the signal model:
//!
//! - [`Visibility`]: which side of the proof boundary a signal lives on.
//! - [`WitnessInput`]: the raw name → value assignment handed to the
//!   witness builder (decimal strings on the wire).
//! - [`PublicInputVector`]: the ordered public subset a proof is bound to.
//!
//! The concrete vocabulary (which names exist, and the public order) belongs
//! to each circuit.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RxzkError, SignalError};
use crate::field::FieldElement;

/// Which side of the proof boundary a signal lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Revealed to the verifier as part of the public input vector.
    Public,
    /// Known only to the prover.
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Private => f.write_str("private"),
        }
    }
}

/// A full signal assignment: every signal name mapped to a field element.
///
/// Deserializes from a JSON object whose values are decimal strings or
/// non-negative integers, e.g. `{"doctorId": "123", "dataAge": 30}`, and
/// serializes back to the same flat object with every value as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WitnessInput {
    values: BTreeMap<String, FieldElement>,
}

/// Wire form of one assignment value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(u64),
    Other(serde_json::Value),
}

impl WitnessInput {
    /// An empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: FieldElement) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: FieldElement) -> Self {
        self.set(name, value);
        self
    }

    /// The value assigned to `name`.
    pub fn get(&self, name: &str) -> Option<FieldElement> {
        self.values.get(name).copied()
    }

    /// The value assigned to `name`, or [`SignalError::Missing`].
    pub fn require(&self, name: &str) -> Result<FieldElement, SignalError> {
        self.get(name)
            .ok_or_else(|| SignalError::Missing(name.to_string()))
    }

    /// Signal names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of assigned signals.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a name → decimal-string map.
    pub fn from_decimal_map<I, K, V>(entries: I) -> Result<Self, SignalError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut input = Self::new();
        for (name, literal) in entries {
            let name = name.into();
            let value = FieldElement::parse_decimal(literal.as_ref()).map_err(|source| {
                SignalError::InvalidValue {
                    name: name.clone(),
                    source,
                }
            })?;
            input.set(name, value);
        }
        Ok(input)
    }

    /// Parse the JSON witness input format.
    pub fn from_json_str(json: &str) -> Result<Self, RxzkError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<'de> Deserialize<'de> for WitnessInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, RawValue>::deserialize(deserializer)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let literal = match value {
                RawValue::Text(s) => s,
                RawValue::Number(n) => n.to_string(),
                RawValue::Other(found) => {
                    return Err(serde::de::Error::custom(SignalError::UnsupportedLiteral {
                        name,
                        found: found.to_string(),
                    }))
                }
            };
            entries.push((name, literal));
        }
        Self::from_decimal_map(entries).map_err(serde::de::Error::custom)
    }
}

/// The ordered public signal values a proof is bound to.
///
/// This is a value object: there are no mutable accessors. Tampering
/// scenarios derive a modified copy with [`with_coordinate`](Self::with_coordinate)
/// so the original artifact stays intact for other consumers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicInputVector(Vec<FieldElement>);

impl PublicInputVector {
    /// Wrap values that are already in circuit order.
    pub fn new(values: Vec<FieldElement>) -> Self {
        Self(values)
    }

    /// Number of public signals.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a circuit without public signals.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coordinate `index`, if present.
    pub fn get(&self, index: usize) -> Option<FieldElement> {
        self.0.get(index).copied()
    }

    /// All coordinates in order.
    pub fn as_slice(&self) -> &[FieldElement] {
        &self.0
    }

    /// A copy of this vector with coordinate `index` replaced by `value`.
    ///
    /// # Errors
    ///
    /// [`SignalError::CoordinateOutOfRange`] when `index >= len()`.
    pub fn with_coordinate(&self, index: usize, value: FieldElement) -> Result<Self, SignalError> {
        if index >= self.0.len() {
            return Err(SignalError::CoordinateOutOfRange {
                index,
                len: self.0.len(),
            });
        }
        let mut values = self.0.clone();
        values[index] = value;
        Ok(Self(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn witness_input_accepts_strings_and_integers() {
        let input = WitnessInput::from_json_str(r#"{"doctorId": "123", "dataAge": 30}"#).unwrap();
        assert_eq!(input.get("doctorId"), Some(FieldElement::from_u64(123)));
        assert_eq!(input.get("dataAge"), Some(FieldElement::from_u64(30)));
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn witness_input_rejects_bad_literal() {
        let err = WitnessInput::from_json_str(r#"{"doctorId": "12a"}"#).unwrap_err();
        assert!(err.to_string().contains("doctorId"));
        assert!(WitnessInput::from_json_str(r#"{"doctorId": -1}"#).is_err());
    }

    #[test]
    fn witness_input_writes_the_format_it_reads() {
        let big = FieldElement::from_u64(u64::MAX) * FieldElement::from_u64(1_000);
        let input = WitnessInput::new()
            .with("doctorId", FieldElement::from_u64(123))
            .with("dataAge", FieldElement::from_u64(30))
            .with("doctorSecret", big);

        let json = serde_json::to_string(&input).unwrap();
        let flat: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(flat["doctorId"], "123");
        assert_eq!(flat["dataAge"], "30");
        assert_eq!(flat["doctorSecret"], big.to_decimal());

        assert_eq!(WitnessInput::from_json_str(&json).unwrap(), input);
    }

    #[test]
    fn integer_past_u64_asks_for_a_decimal_string() {
        let err = WitnessInput::from_json_str(r#"{"dataAge": 18446744073709551616}"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dataAge"), "{message}");
        assert!(message.contains("decimal string"), "{message}");

        let quoted = WitnessInput::from_json_str(r#"{"dataAge": "18446744073709551616"}"#).unwrap();
        assert_eq!(
            quoted.get("dataAge"),
            Some(FieldElement::from_u64(u64::MAX) + FieldElement::one())
        );
    }

    #[test]
    fn non_scalar_values_name_the_signal() {
        for json in [r#"{"flag": true}"#, r#"{"flag": 1.5}"#, r#"{"flag": [1]}"#] {
            let message = WitnessInput::from_json_str(json).unwrap_err().to_string();
            assert!(message.contains("\"flag\""), "{message}");
        }
    }

    #[test]
    fn require_reports_missing_signal() {
        let input = WitnessInput::new().with("sourceId", FieldElement::one());
        assert_eq!(input.require("sourceId").unwrap(), FieldElement::one());
        assert_eq!(
            input.require("dataAge").unwrap_err(),
            SignalError::Missing("dataAge".to_string())
        );
    }

    #[test]
    fn with_coordinate_copies() {
        let original = PublicInputVector::new(vec![FieldElement::one(), FieldElement::zero()]);
        let flipped = original.with_coordinate(1, FieldElement::one()).unwrap();
        assert_eq!(original.get(1), Some(FieldElement::zero()));
        assert_eq!(flipped.get(1), Some(FieldElement::one()));
        assert_ne!(original, flipped);
    }

    #[test]
    fn with_coordinate_out_of_range() {
        let v = PublicInputVector::new(vec![FieldElement::one()]);
        assert_eq!(
            v.with_coordinate(3, FieldElement::zero()).unwrap_err(),
            SignalError::CoordinateOutOfRange { index: 3, len: 1 }
        );
    }

    #[test]
    fn public_vector_serializes_as_decimal_array() {
        let v = PublicInputVector::new(vec![FieldElement::from_u64(90), FieldElement::one()]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"["90","1"]"#);
        let back: PublicInputVector = serde_json::from_str(r#"["90","1"]"#).unwrap();
        assert_eq!(back, v);
    }
}
