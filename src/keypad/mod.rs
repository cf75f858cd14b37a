//! The amount keypad: a calculator-like input that holds a left operand, at most one pending
//! operator and a right operand.
//!
//! [`EntryState`] is a plain value. Every keystroke goes through [`EntryState::press`], which
//! returns what happened along with the next state, so the keypad can be driven and tested
//! without any screen attached.

mod buffer;
mod operator;

pub use buffer::{
    append_decimal_point, append_digit, delete_last_char, format_for_display,
    MAX_FRACTION_DIGITS, MAX_INTEGER_DIGITS,
};
pub use operator::{evaluate, Operator, OperatorKey};

use crate::model::Amount;
use crate::Result;
use anyhow::bail;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::{debug, trace};

/// A single key on the amount keypad.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// One of `0` through `9`.
    Digit(char),
    Point,
    Operator(OperatorKey),
    /// A short press of the delete key.
    Delete,
    /// A sustained press of the delete key.
    Clear,
    /// The complete key, labeled `=` while an expression is ready to evaluate.
    Complete,
}

impl Key {
    /// Parses a keystroke script into keys.
    ///
    /// - `0`-`9`: digits
    /// - `.`: decimal point
    /// - `+`: the plus/times key
    /// - `-`: the minus/divide key
    /// - `<`: delete
    /// - `C`: clear
    /// - `=`: complete
    ///
    /// Whitespace is ignored.
    pub fn parse_script(script: &str) -> Result<Vec<Key>> {
        let mut keys = Vec::new();
        for (ix, c) in script.chars().enumerate() {
            let key = match c {
                '0'..='9' => Key::Digit(c),
                '.' => Key::Point,
                '+' => Key::Operator(OperatorKey::PlusTimes),
                '-' => Key::Operator(OperatorKey::MinusDivide),
                '<' => Key::Delete,
                'C' | 'c' => Key::Clear,
                '=' => Key::Complete,
                c if c.is_whitespace() => continue,
                bad => bail!("Unknown key '{bad}' at position {ix} of the keystroke script"),
            };
            keys.push(key);
        }
        Ok(keys)
    }
}

/// What the complete key does when pressed in the current state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompleteLabel {
    /// Evaluates the pending expression.
    Equals,
    /// Finalizes the amount.
    Done,
}

impl Display for CompleteLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompleteLabel::Equals => write!(f, "="),
            CompleteLabel::Done => write!(f, "done"),
        }
    }
}

/// Why pressing complete did not produce an amount.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitRejection {
    /// The left operand does not parse to a number.
    NotANumber,
    /// The amount is zero or negative.
    NotPositive,
}

impl Display for CommitRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitRejection::NotANumber => write!(f, "the amount is not a number"),
            CommitRejection::NotPositive => write!(f, "the amount must be greater than zero"),
        }
    }
}

/// The result of pressing a key.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Press {
    /// The keypad moved to a new state, which may equal the old one if the key was ignored.
    Edited(EntryState),
    /// The amount was finalized. The keypad starts over from the initial state.
    Committed(Amount),
    /// Complete was pressed on an amount that cannot be committed. The state is unchanged.
    Rejected(CommitRejection),
}

/// The keypad buffers: left operand, pending operator and right operand.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EntryState {
    left: String,
    operator: Option<Operator>,
    right: String,
}

impl Default for EntryState {
    fn default() -> Self {
        Self {
            left: String::from("0"),
            operator: None,
            right: String::new(),
        }
    }
}

impl EntryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    /// True when a pending operator has a right operand to apply it to.
    pub fn is_ready_to_evaluate(&self) -> bool {
        self.operator.is_some() && buffer::has_digits(&self.right)
    }

    pub fn complete_label(&self) -> CompleteLabel {
        if self.is_ready_to_evaluate() {
            CompleteLabel::Equals
        } else {
            CompleteLabel::Done
        }
    }

    /// The expression as it would appear on screen, e.g. `1,200 + 35.5`.
    pub fn display(&self) -> String {
        let left = format_for_display(&self.left);
        match self.operator {
            None => left,
            Some(op) if self.right.is_empty() => format!("{left} {op}"),
            Some(op) => format!("{left} {op} {}", format_for_display(&self.right)),
        }
    }

    /// Applies `key` and returns the outcome.
    pub fn press(&self, key: Key) -> Press {
        trace!("Key {key:?} on {self:?}");
        match key {
            Key::Digit(d) => Press::Edited(self.edit_active(|b| append_digit(b, d))),
            Key::Point => Press::Edited(self.edit_active(append_decimal_point)),
            Key::Operator(op_key) => Press::Edited(self.press_operator(op_key)),
            Key::Delete => Press::Edited(self.delete()),
            Key::Clear => Press::Edited(Self::default()),
            Key::Complete => self.complete(),
        }
    }

    fn edit_active(&self, edit: impl FnOnce(&str) -> String) -> Self {
        let mut next = self.clone();
        if next.operator.is_some() {
            next.right = edit(&self.right);
        } else {
            next.left = edit(&self.left);
        }
        next
    }

    fn press_operator(&self, key: OperatorKey) -> Self {
        match self.operator {
            None => {
                let starts_on_nothing = operator::parse_operand(&self.left)
                    .map(|v| v.is_zero())
                    .unwrap_or(true);
                if starts_on_nothing {
                    debug!("Ignoring operator on a zero amount");
                    return self.clone();
                }
                Self {
                    left: self.left.clone(),
                    operator: Some(key.primary()),
                    right: String::new(),
                }
            }
            Some(current) if !buffer::has_digits(&self.right) => Self {
                left: self.left.clone(),
                operator: Some(Operator::cycle(Some(current), key)),
                right: String::new(),
            },
            Some(current) => Self {
                left: evaluate(&self.left, current, &self.right),
                operator: Some(key.primary()),
                right: String::new(),
            },
        }
    }

    fn delete(&self) -> Self {
        let mut next = self.clone();
        if !self.right.is_empty() {
            next.right = delete_last_char(&self.right, true);
        } else if self.operator.is_some() {
            next.operator = None;
        } else {
            next.left = delete_last_char(&self.left, false);
        }
        next
    }

    fn complete(&self) -> Press {
        if let (Some(op), true) = (self.operator, self.is_ready_to_evaluate()) {
            return Press::Edited(Self {
                left: evaluate(&self.left, op, &self.right),
                operator: None,
                right: String::new(),
            });
        }

        let Some(value) = operator::parse_operand(&self.left) else {
            debug!("Rejecting commit of '{}'", self.left);
            return Press::Rejected(CommitRejection::NotANumber);
        };
        if value <= Decimal::ZERO {
            debug!("Rejecting commit of non-positive amount {value}");
            return Press::Rejected(CommitRejection::NotPositive);
        }
        match Amount::from_decimal(value) {
            Some(amount) if amount.is_positive() => Press::Committed(amount),
            Some(_) => Press::Rejected(CommitRejection::NotPositive),
            None => Press::Rejected(CommitRejection::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUS_TIMES: Key = Key::Operator(OperatorKey::PlusTimes);
    const MINUS_DIVIDE: Key = Key::Operator(OperatorKey::MinusDivide);

    fn run(keys: &[Key]) -> EntryState {
        keys.iter().fold(EntryState::new(), |state, key| match state.press(*key) {
            Press::Edited(next) => next,
            other => panic!("unexpected {other:?}"),
        })
    }

    fn script(s: &str) -> EntryState {
        run(&Key::parse_script(s).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let state = EntryState::new();
        assert_eq!(state.left(), "0");
        assert_eq!(state.operator(), None);
        assert_eq!(state.right(), "");
        assert_eq!(state.complete_label(), CompleteLabel::Done);
    }

    #[test]
    fn test_operator_ignored_on_zero() {
        assert_eq!(run(&[PLUS_TIMES]), EntryState::new());
        assert_eq!(script("0.-"), script("0."));
    }

    #[test]
    fn test_operator_cycle_without_right_operand() {
        assert_eq!(script("5+").operator(), Some(Operator::Add));
        assert_eq!(script("5++").operator(), Some(Operator::Multiply));
        assert_eq!(script("5+++").operator(), Some(Operator::Add));
        assert_eq!(script("5--").operator(), Some(Operator::Divide));
        assert_eq!(script("5-+").operator(), Some(Operator::Add));
        assert_eq!(script("5--+").operator(), Some(Operator::Add));
        assert_eq!(script("5++-").operator(), Some(Operator::Subtract));
    }

    #[test]
    fn test_chained_evaluation() {
        let state = script("100+50+");
        assert_eq!(state.left(), "150");
        assert_eq!(state.operator(), Some(Operator::Add));
        assert_eq!(state.right(), "");

        // Switch the pending operator to multiply before typing the next operand.
        let state = script("100+50++");
        assert_eq!(state.left(), "150");
        assert_eq!(state.operator(), Some(Operator::Multiply));

        let state = script("100+50++2=");
        assert_eq!(state.left(), "300");
        assert_eq!(state.operator(), None);
    }

    #[test]
    fn test_chained_evaluation_is_sequential() {
        let state = script("2+3++4=");
        assert_eq!(state.left(), "20");
    }

    #[test]
    fn test_digits_go_to_right_operand() {
        let state = script("12+3.5");
        assert_eq!(state.left(), "12");
        assert_eq!(state.right(), "3.5");
        assert_eq!(state.complete_label(), CompleteLabel::Equals);
        assert_eq!(state.display(), "12 + 3.5");
    }

    #[test]
    fn test_complete_evaluates_then_commits() {
        let state = script("12+3.5");
        let state = match state.press(Key::Complete) {
            Press::Edited(next) => next,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(state.left(), "15.5");
        assert_eq!(state.operator(), None);
        assert_eq!(state.complete_label(), CompleteLabel::Done);
        assert_eq!(
            state.press(Key::Complete),
            Press::Committed(Amount::from_minor(1550))
        );
    }

    #[test]
    fn test_complete_with_operator_but_no_right_operand_commits_left() {
        let state = script("8-");
        assert_eq!(
            state.press(Key::Complete),
            Press::Committed(Amount::from_minor(800))
        );
    }

    #[test]
    fn test_commit_rejects_zero() {
        let state = EntryState::new();
        assert_eq!(
            state.press(Key::Complete),
            Press::Rejected(CommitRejection::NotPositive)
        );
        assert_eq!(
            script("0.").press(Key::Complete),
            Press::Rejected(CommitRejection::NotPositive)
        );
    }

    #[test]
    fn test_commit_rejects_negative() {
        let state = script("5-8=");
        assert_eq!(state.left(), "-3");
        assert_eq!(
            state.press(Key::Complete),
            Press::Rejected(CommitRejection::NotPositive)
        );
    }

    #[test]
    fn test_commit_rejects_amount_that_rounds_to_zero() {
        let state = script("0.01--3=");
        assert_eq!(state.left(), "0");
        let state = script("1--3--100=");
        assert_eq!(state.left(), "0");
        assert_eq!(
            state.press(Key::Complete),
            Press::Rejected(CommitRejection::NotPositive)
        );
    }

    #[test]
    fn test_large_product_keeps_every_digit() {
        let state = script("12345679++999999999=");
        assert_eq!(state.left(), "12345678987654321");
        assert_eq!(state.display(), "12,345,678,987,654,321");
        let Press::Committed(amount) = state.press(Key::Complete) else {
            panic!("expected a committed amount");
        };
        assert_eq!(amount.minor(), 1_234_567_898_765_432_100);
        assert_eq!(amount.to_string(), "12,345,678,987,654,321.00");
    }

    #[test]
    fn test_division_by_zero_normalizes() {
        let state = script("10--0=");
        assert_eq!(state.left(), "0");
    }

    #[test]
    fn test_delete_order() {
        let state = script("12+34");
        let state = run_from(state, &[Key::Delete]);
        assert_eq!(state.right(), "3");
        let state = run_from(state, &[Key::Delete]);
        assert_eq!(state.right(), "");
        assert_eq!(state.operator(), Some(Operator::Add));
        let state = run_from(state, &[Key::Delete]);
        assert_eq!(state.operator(), None);
        let state = run_from(state, &[Key::Delete]);
        assert_eq!(state.left(), "1");
        let state = run_from(state, &[Key::Delete, Key::Delete]);
        assert_eq!(state.left(), "0");
    }

    #[test]
    fn test_clear_resets_everything() {
        assert_eq!(script("12+34C"), EntryState::new());
        assert_eq!(script("987.6C"), EntryState::new());
    }

    #[test]
    fn test_parse_script() {
        let keys = Key::parse_script("1 2.+-<C=").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Digit('1'),
                Key::Digit('2'),
                Key::Point,
                PLUS_TIMES,
                MINUS_DIVIDE,
                Key::Delete,
                Key::Clear,
                Key::Complete,
            ]
        );
        assert!(Key::parse_script("12*3").is_err());
    }

    fn run_from(state: EntryState, keys: &[Key]) -> EntryState {
        keys.iter().fold(state, |state, key| match state.press(*key) {
            Press::Edited(next) => next,
            other => panic!("unexpected {other:?}"),
        })
    }
}
