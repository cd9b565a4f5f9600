//! Runtime values fed into (and returned from) a decision table.
//!
//! Input mappings are loosely typed at the source (JSON), so they are
//! narrowed into a closed set of kinds before any predicate sees them.
//! Predicates match on the kind they expect and treat everything else as
//! "does not match".

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use super::errors::InputError;

/// A single runtime value.
///
/// `Absent` stands in for a missing input key as well as an explicit JSON
/// `null`; it is also the output payload when no rule fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Absent,
    String(String),
    Boolean(bool),
    Integer(i64),
    /// Only produced from runtime input; table cells are integer-only.
    Decimal(f64),
}

/// Named input values for one evaluation.
pub type Inputs = HashMap<String, Value>;

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Orders a numeric value against an integer bound.
    ///
    /// Returns `None` for non-numeric kinds and for `NaN`, so every relational
    /// predicate built on top of it fails for those.
    ///
    /// Decimals are compared exactly: integral values inside the `i64` range are
    /// compared as integers, since `bound as f64` rounds above 2^53.
    pub fn cmp_integer(&self, bound: i64) -> Option<Ordering> {
        match self {
            Value::Integer(n) => Some(n.cmp(&bound)),
            Value::Decimal(d) => cmp_decimal(*d, bound),
            _ => None,
        }
    }

    /// Strict equality used by literal predicates.
    ///
    /// Kinds must agree, except that the two numeric kinds compare by value.
    pub fn matches_literal(&self, literal: &Value) -> bool {
        match (self, literal) {
            (Value::Absent, _) | (_, Value::Absent) => false,
            (Value::Integer(_) | Value::Decimal(_), Value::Integer(n)) => {
                self.cmp_integer(*n) == Some(Ordering::Equal)
            }
            (lhs, rhs) => lhs == rhs,
        }
    }

    /// Builds an input mapping from a JSON object.
    pub fn inputs_from_json(
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Inputs, InputError> {
        object
            .iter()
            .map(|(name, raw)| {
                Value::try_from(raw)
                    .map(|value| (name.clone(), value))
                    .map_err(|_| InputError::Unsupported { name: name.clone() })
            })
            .collect()
    }
}

// 2^63; every i64 lies in [-I64_EDGE, I64_EDGE)
const I64_EDGE: f64 = 9_223_372_036_854_775_808.0;

fn cmp_decimal(d: f64, bound: i64) -> Option<Ordering> {
    if d.is_nan() {
        None
    } else if d >= I64_EDGE {
        Some(Ordering::Greater)
    } else if d < -I64_EDGE {
        Some(Ordering::Less)
    } else if d.fract() == 0.0 {
        Some((d as i64).cmp(&bound))
    } else {
        // non-integral decimals are below 2^52 in magnitude, where the
        // rounding of `bound` cannot flip the order
        d.partial_cmp(&(bound as f64))
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = InputError;

    fn try_from(raw: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        Ok(match raw {
            Json::Null => Value::Absent,
            Json::Bool(b) => Value::Boolean(*b),
            Json::String(s) => Value::String(s.clone()),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Decimal(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::Array(_) | Json::Object(_) => return Err(InputError::NotScalar),
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Decimal(d)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Absent => serializer.serialize_none(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Decimal(d) => serializer.serialize_f64(*d),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("null"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::null(json!(null), Value::Absent)]
    #[case::boolean(json!(false), Value::Boolean(false))]
    #[case::string(json!("female"), Value::String("female".into()))]
    #[case::integer(json!(57), Value::Integer(57))]
    #[case::decimal(json!(39.5), Value::Decimal(39.5))]
    fn converts_json_scalars(#[case] raw: serde_json::Value, #[case] expected: Value) {
        assert_eq!(Value::try_from(&raw).unwrap(), expected);
    }

    #[test]
    fn rejects_structured_json_inputs() {
        let object = json!({ "Gender": "female", "Tags": ["a", "b"] });
        let err = Value::inputs_from_json(object.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, InputError::Unsupported { ref name } if name == "Tags"));
    }

    #[test]
    fn numeric_kinds_compare_by_value() {
        assert!(Value::Decimal(57.0).matches_literal(&Value::Integer(57)));
        assert!(Value::Integer(57).matches_literal(&Value::Integer(57)));
        assert_eq!(Value::Decimal(39.9).cmp_integer(40), Some(Ordering::Less));
        assert_eq!(Value::Decimal(f64::NAN).cmp_integer(40), None);
    }

    #[rstest]
    #[case::above_f64_precision(9_007_199_254_740_992.0, 9_007_199_254_740_993, Ordering::Less)]
    #[case::exact_large(9_007_199_254_740_992.0, 9_007_199_254_740_992, Ordering::Equal)]
    #[case::near_i64_max(9_223_372_036_854_774_784.0, i64::MAX, Ordering::Less)]
    #[case::past_i64_max(9_223_372_036_854_775_808.0, i64::MAX, Ordering::Greater)]
    #[case::i64_min(-9_223_372_036_854_775_808.0, i64::MIN, Ordering::Equal)]
    #[case::below_i64_min(-1.0e19, i64::MIN, Ordering::Less)]
    #[case::infinity(f64::INFINITY, i64::MAX, Ordering::Greater)]
    #[case::fraction(-0.5, 0, Ordering::Less)]
    fn large_decimals_compare_exactly(
        #[case] decimal: f64,
        #[case] bound: i64,
        #[case] expected: Ordering,
    ) {
        assert_eq!(Value::Decimal(decimal).cmp_integer(bound), Some(expected));
    }

    #[test]
    fn accessors_only_answer_for_their_kind() {
        assert!(Value::Absent.is_absent());
        assert!(!Value::Boolean(false).is_absent());
        assert_eq!(Value::from("female").as_str(), Some("female"));
        assert_eq!(Value::Integer(1).as_str(), None);
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("true").as_bool(), None);
    }

    #[test]
    fn kinds_are_not_coerced() {
        assert!(!Value::from("40").matches_literal(&Value::Integer(40)));
        assert!(!Value::Integer(1).matches_literal(&Value::Boolean(true)));
        assert!(!Value::Absent.matches_literal(&Value::Absent));
        assert_eq!(Value::from("40").cmp_integer(40), None);
    }

    #[test]
    fn serializes_absent_as_null() {
        let s = serde_json::to_string(&vec![Value::Absent, Value::Boolean(true)]).unwrap();
        assert_eq!(s, "[null,true]");
    }
}
