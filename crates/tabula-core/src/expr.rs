//! Cell expression compiler.
//!
//! Input entries compile to a [`Predicate`]; output entries compile to a plain
//! [`Value`]. The grammar is a short, ordered list of recognizers and the
//! first one that accepts the trimmed text wins:
//!
//! | form                     | example       | input predicate          |
//! |--------------------------|---------------|--------------------------|
//! | empty / `-`              | `-`           | matches anything         |
//! | quoted string            | `"female"`    | equals the string        |
//! | boolean                  | `false`       | equals the boolean       |
//! | inclusive integer range  | `[40..74]`    | `40 <= v <= 74`          |
//! | comparison               | `<40`, `>=75` | applies the operator     |
//! | integer                  | `57`          | equals the integer       |
//!
//! Quoted strings are tried before numbers so `"40"` stays a string.
//! Numeric literals are integer-only; decimal literals are rejected.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::{ExpressionError, Value};

/// Relational operator of a comparison entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// Longest symbols first so `<=` is never read as `<` followed by `=`.
    const ALL: [Comparison; 4] = [Comparison::Le, Comparison::Ge, Comparison::Lt, Comparison::Gt];

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Le => ordering != Ordering::Greater,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Ge => ordering != Ordering::Less,
        }
    }
}

/// A compiled input entry.
///
/// Predicates are plain data: compiled once, shared freely between threads,
/// and never mutated by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// "Don't care": matches every value, including an absent one.
    Any,
    /// Equality with a string, boolean or integer literal.
    Equals(Value),
    /// Inclusive on both ends.
    Range { min: i64, max: i64 },
    Compare { op: Comparison, bound: i64 },
}

impl Predicate {
    /// Tests a runtime value. Absent values and kinds the predicate does not
    /// expect simply fail to match.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::Equals(literal) => value.matches_literal(literal),
            Predicate::Range { min, max } => {
                matches!(value.cmp_integer(*min), Some(Ordering::Equal | Ordering::Greater))
                    && matches!(value.cmp_integer(*max), Some(Ordering::Equal | Ordering::Less))
            }
            Predicate::Compare { op, bound } => value
                .cmp_integer(*bound)
                .is_some_and(|ordering| op.holds(ordering)),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Predicate::Any)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Any => f.write_str("-"),
            Predicate::Equals(literal) => write!(f, "{literal}"),
            Predicate::Range { min, max } => write!(f, "[{min}..{max}]"),
            Predicate::Compare { op, bound } => write!(f, "{}{bound}", op.symbol()),
        }
    }
}

/// `None` means "not this form, try the next one".
type Recognizer = fn(&str) -> Option<Result<Predicate, ExpressionError>>;

/// Priority order matters; see the module docs.
const INPUT_RECOGNIZERS: [Recognizer; 6] = [
    recognize_wildcard,
    recognize_string,
    recognize_boolean,
    recognize_range,
    recognize_comparison,
    recognize_integer,
];

/// Forms that only make sense as an input entry.
const INPUT_ONLY_RECOGNIZERS: [Recognizer; 3] =
    [recognize_wildcard, recognize_range, recognize_comparison];

/// Compiles one input entry into a predicate.
pub fn compile_input_expression(raw: &str) -> Result<Predicate, ExpressionError> {
    let text = raw.trim();
    INPUT_RECOGNIZERS
        .iter()
        .find_map(|recognize| recognize(text))
        .unwrap_or_else(|| Err(ExpressionError::Unrecognized(text.to_string())))
}

/// Compiles one output entry into the value a matching rule returns.
///
/// An empty entry yields [`Value::Absent`]. Wildcards, ranges and
/// comparisons have no meaning as a payload and are rejected.
pub fn compile_output_expression(raw: &str) -> Result<Value, ExpressionError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(Value::Absent);
    }

    if let Some(value) = string_literal(text)
        .or_else(|| boolean_literal(text))
        .or_else(|| integer_literal(text))
    {
        return Ok(value);
    }

    let input_only = INPUT_ONLY_RECOGNIZERS
        .iter()
        .any(|recognize| recognize(text).is_some());
    if input_only {
        Err(ExpressionError::InputOnly(text.to_string()))
    } else {
        Err(ExpressionError::Unrecognized(text.to_string()))
    }
}

fn recognize_wildcard(text: &str) -> Option<Result<Predicate, ExpressionError>> {
    (text.is_empty() || text == "-").then_some(Ok(Predicate::Any))
}

fn recognize_string(text: &str) -> Option<Result<Predicate, ExpressionError>> {
    string_literal(text).map(|v| Ok(Predicate::Equals(v)))
}

fn recognize_boolean(text: &str) -> Option<Result<Predicate, ExpressionError>> {
    boolean_literal(text).map(|v| Ok(Predicate::Equals(v)))
}

fn recognize_integer(text: &str) -> Option<Result<Predicate, ExpressionError>> {
    integer_literal(text).map(|v| Ok(Predicate::Equals(v)))
}

fn recognize_range(text: &str) -> Option<Result<Predicate, ExpressionError>> {
    let body = text.strip_prefix('[')?.strip_suffix(']')?;
    let (lo, hi) = body.split_once("..")?;
    let min = parse_integer(lo)?;
    let max = parse_integer(hi)?;
    if min > max {
        return Some(Err(ExpressionError::InvertedRange {
            text: text.to_string(),
            min,
            max,
        }));
    }
    Some(Ok(Predicate::Range { min, max }))
}

fn recognize_comparison(text: &str) -> Option<Result<Predicate, ExpressionError>> {
    Comparison::ALL.iter().find_map(|&op| {
        let bound = parse_integer(text.strip_prefix(op.symbol())?)?;
        Some(Ok(Predicate::Compare { op, bound }))
    })
}

fn string_literal(text: &str) -> Option<Value> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    Some(Value::String(inner.to_string()))
}

fn boolean_literal(text: &str) -> Option<Value> {
    match text {
        "true" => Some(Value::Boolean(true)),
        "false" => Some(Value::Boolean(false)),
        _ => None,
    }
}

fn integer_literal(text: &str) -> Option<Value> {
    parse_integer(text).map(Value::Integer)
}

/// Optional leading `-`, then ASCII digits only; must fit in an `i64`.
fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input(text: &str) -> Predicate {
        compile_input_expression(text).expect("compiles")
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    #[case::dash("-")]
    #[case::padded_dash("  - ")]
    fn wildcard_forms(#[case] text: &str) {
        let p = input(text);
        assert!(p.is_wildcard());
        assert!(p.test(&Value::Absent));
        assert!(p.test(&Value::from("anything")));
        assert!(p.test(&Value::Integer(-3)));
    }

    #[test]
    fn quoted_number_stays_a_string() {
        let p = input("\"40\"");
        assert_eq!(p, Predicate::Equals(Value::from("40")));
        assert!(p.test(&Value::from("40")));
        assert!(!p.test(&Value::Integer(40)));
    }

    #[test]
    fn quoted_string_is_exact() {
        let p = input(" \"female\" ");
        assert!(p.test(&Value::from("female")));
        assert!(!p.test(&Value::from("Female")));
        assert!(!p.test(&Value::Absent));
    }

    #[test]
    fn boolean_matches_kind_and_value() {
        let p = input("false");
        assert!(p.test(&Value::Boolean(false)));
        assert!(!p.test(&Value::Boolean(true)));
        assert!(!p.test(&Value::Integer(0)));
        assert!(!p.test(&Value::from("false")));
        assert!(!p.test(&Value::Absent));
    }

    #[rstest]
    #[case::below(39, false)]
    #[case::lower_bound(40, true)]
    #[case::inside(57, true)]
    #[case::upper_bound(74, true)]
    #[case::above(75, false)]
    fn range_is_inclusive(#[case] age: i64, #[case] expected: bool) {
        assert_eq!(input("[40..74]").test(&Value::Integer(age)), expected);
    }

    #[test]
    fn range_tolerates_inner_whitespace_and_negatives() {
        assert_eq!(input("[ 40 .. 74 ]"), Predicate::Range { min: 40, max: 74 });
        let p = input("[-10..-1]");
        assert!(p.test(&Value::Integer(-10)));
        assert!(!p.test(&Value::Integer(0)));
    }

    #[test]
    fn range_compares_decimals_numerically() {
        let p = input("[40..74]");
        assert!(p.test(&Value::Decimal(74.0)));
        assert!(!p.test(&Value::Decimal(74.5)));
        assert!(!p.test(&Value::Decimal(39.99)));
        assert!(!p.test(&Value::from("57")));
        assert!(!p.test(&Value::Absent));
    }

    #[rstest]
    #[case::lt("<40", 39, true)]
    #[case::lt_excludes_bound("<40", 40, false)]
    #[case::le_includes_bound("<=40", 40, true)]
    #[case::le_above("<=40", 41, false)]
    #[case::gt(">74", 75, true)]
    #[case::gt_excludes_bound(">74", 74, false)]
    #[case::ge_includes_bound(">=74", 74, true)]
    #[case::ge_below(">=74", 73, false)]
    #[case::spaced(">= 5", 5, true)]
    fn comparison_operators(#[case] text: &str, #[case] value: i64, #[case] expected: bool) {
        assert_eq!(input(text).test(&Value::Integer(value)), expected);
    }

    #[test]
    fn comparison_with_absent_or_wrong_kind_fails() {
        let p = input("<40");
        assert!(!p.test(&Value::Absent));
        assert!(!p.test(&Value::Boolean(true)));
        assert!(!p.test(&Value::Decimal(f64::NAN)));
    }

    #[test]
    fn bare_integer_is_equality() {
        let p = input("57");
        assert_eq!(p, Predicate::Equals(Value::Integer(57)));
        assert!(p.test(&Value::Integer(57)));
        assert!(p.test(&Value::Decimal(57.0)));
        assert!(!p.test(&Value::Integer(58)));
        assert_eq!(input("-3"), Predicate::Equals(Value::Integer(-3)));
    }

    #[rstest]
    #[case::decimal("40.5")]
    #[case::decimal_range("[40.5..74]")]
    #[case::half_open_range("[40..]")]
    #[case::dangling_operator("<")]
    #[case::unquoted_word("female")]
    #[case::capitalized_bool("True")]
    #[case::double_dash("--")]
    #[case::overflow("99999999999999999999")]
    #[case::feel_not("not(\"male\")")]
    fn unsupported_syntax_is_rejected(#[case] text: &str) {
        let err = compile_input_expression(text).unwrap_err();
        assert_eq!(err, ExpressionError::Unrecognized(text.to_string()));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = compile_input_expression("[74..40]").unwrap_err();
        assert!(matches!(err, ExpressionError::InvertedRange { min: 74, max: 40, .. }));
    }

    #[test]
    fn output_literals() {
        assert_eq!(compile_output_expression("true").unwrap(), Value::Boolean(true));
        assert_eq!(compile_output_expression("\"refer\"").unwrap(), Value::from("refer"));
        assert_eq!(compile_output_expression(" 12 ").unwrap(), Value::Integer(12));
        assert_eq!(compile_output_expression("").unwrap(), Value::Absent);
    }

    #[rstest]
    #[case::dash("-")]
    #[case::range("[1..2]")]
    #[case::comparison("<5")]
    fn output_rejects_matching_forms(#[case] text: &str) {
        let err = compile_output_expression(text).unwrap_err();
        assert_eq!(err, ExpressionError::InputOnly(text.to_string()));
    }

    #[test]
    fn output_rejects_unknown_text() {
        let err = compile_output_expression("yes").unwrap_err();
        assert_eq!(err, ExpressionError::Unrecognized("yes".to_string()));
    }

    #[test]
    fn predicates_render_canonically() {
        assert_eq!(input("[ 40 .. 74 ]").to_string(), "[40..74]");
        assert_eq!(input(">= 5").to_string(), ">=5");
        assert_eq!(input("\"x\"").to_string(), "\"x\"");
        assert_eq!(input("").to_string(), "-");
    }
}
