//! Binary operators, the two operator keys that share them, and expression evaluation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// One of the four arithmetic operations the keypad can hold pending.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// The symbol shown on screen between the two operands.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '−',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// The key that produces this operator.
    pub fn key(self) -> OperatorKey {
        match self {
            Operator::Add | Operator::Multiply => OperatorKey::PlusTimes,
            Operator::Subtract | Operator::Divide => OperatorKey::MinusDivide,
        }
    }

    /// Returns the operator that is pending after `key` is pressed while `current` is pending and
    /// no second operand has been typed yet.
    ///
    /// | pending  | `PlusTimes` | `MinusDivide` |
    /// |----------|-------------|---------------|
    /// | none     | `Add`       | `Subtract`    |
    /// | `Add`      | `Multiply`  | `Subtract`    |
    /// | `Multiply` | `Add`       | `Subtract`    |
    /// | `Subtract` | `Add`       | `Divide`      |
    /// | `Divide`   | `Add`       | `Subtract`    |
    pub fn cycle(current: Option<Operator>, key: OperatorKey) -> Operator {
        match (current, key) {
            (Some(Operator::Add), OperatorKey::PlusTimes) => Operator::Multiply,
            (Some(Operator::Multiply), OperatorKey::PlusTimes) => Operator::Add,
            (Some(Operator::Subtract), OperatorKey::MinusDivide) => Operator::Divide,
            (Some(Operator::Divide), OperatorKey::MinusDivide) => Operator::Subtract,
            (None, key)
            | (Some(Operator::Subtract | Operator::Divide), key @ OperatorKey::PlusTimes)
            | (Some(Operator::Add | Operator::Multiply), key @ OperatorKey::MinusDivide) => {
                key.primary()
            }
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A keypad key that carries two operators, a primary and a secondary, toggled by pressing it
/// again before the second operand is typed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKey {
    /// The `+`/`×` key.
    PlusTimes,
    /// The `−`/`÷` key.
    MinusDivide,
}

impl OperatorKey {
    pub fn primary(self) -> Operator {
        match self {
            OperatorKey::PlusTimes => Operator::Add,
            OperatorKey::MinusDivide => Operator::Subtract,
        }
    }

    pub fn secondary(self) -> Operator {
        match self {
            OperatorKey::PlusTimes => Operator::Multiply,
            OperatorKey::MinusDivide => Operator::Divide,
        }
    }
}

/// Evaluates `left operator right` and returns the result as a buffer string.
///
/// The result is rounded to cents, half away from zero, with trailing fractional zeros removed.
/// Division by zero, overflow and unparseable operands all produce `"0"`.
///
/// ```
/// # use daybook::keypad::{evaluate, Operator};
/// assert_eq!(evaluate("2", Operator::Add, "3"), "5");
/// assert_eq!(evaluate("2.5", Operator::Multiply, "2"), "5");
/// assert_eq!(evaluate("1", Operator::Divide, "3"), "0.33");
/// assert_eq!(evaluate("10", Operator::Divide, "0"), "0");
/// ```
pub fn evaluate(left: &str, operator: Operator, right: &str) -> String {
    let (Some(l), Some(r)) = (parse_operand(left), parse_operand(right)) else {
        debug!("Unparseable operands '{left}' {operator} '{right}'");
        return String::from("0");
    };

    let value = match operator {
        Operator::Add => l.checked_add(r),
        Operator::Subtract => l.checked_sub(r),
        Operator::Multiply => l.checked_mul(r),
        Operator::Divide if r.is_zero() => None,
        Operator::Divide => l.checked_div(r),
    };

    match value {
        Some(v) => to_buffer(v),
        None => {
            debug!("Degenerate result for {l} {operator} {r}");
            String::from("0")
        }
    }
}

/// Parses a buffer into a number. A trailing decimal point is accepted.
pub(crate) fn parse_operand(buffer: &str) -> Option<Decimal> {
    let trimmed = buffer.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Rounds a value to cents and renders it as a buffer: no trailing fractional zeros, no bare
/// trailing point, no negative zero.
pub(crate) fn to_buffer(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        return String::from("0");
    }
    rounded.to_string()
}
