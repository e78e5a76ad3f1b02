use serde_json::Value;

use dialog_engine_types::value::{
    encode_str_into, ScalarValue, VALUE_BOOL, VALUE_FLOAT, VALUE_INT, VALUE_STRING,
};
use dialog_engine_types::SessionState;

use crate::cursor::Cursor;
use crate::error::EvalError;

/// Branch-presence bit flags in a statement block's first byte.
pub const BRANCH_IF: u8 = 0b001;
pub const BRANCH_ELIF: u8 = 0b010;
pub const BRANCH_ELSE: u8 = 0b100;

/// Comparison operator bit flags.
pub const OP_EQ: u8 = 1 << 0;
pub const OP_LT: u8 = 1 << 1;
pub const OP_GT: u8 = 1 << 2;
pub const OP_LE: u8 = 1 << 3;
pub const OP_GE: u8 = 1 << 4;
pub const OP_NE: u8 = 1 << 5;

/// One comparison of a named session variable against an authored constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub operator: u8,
    pub variable: String,
    pub value: ScalarValue,
}

impl Condition {
    pub fn new(operator: u8, variable: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self {
            operator,
            variable: variable.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Block {
    /// IF first, then ELIFs in authored order. Each branch guards its own
    /// bundle reference.
    branches: Vec<(Condition, String)>,
    else_key: Option<String>,
}

fn read_condition(cursor: &mut Cursor<'_>) -> Result<Condition, EvalError> {
    let operator = cursor.read_u8()?;
    if !matches!(operator, OP_EQ | OP_LT | OP_GT | OP_LE | OP_GE | OP_NE) {
        return Err(EvalError::UnknownOperator(operator));
    }
    let variable = cursor.read_string()?;
    let tag = cursor.read_u8()?;
    let value = match tag {
        VALUE_INT => ScalarValue::Int(cursor.read_i64()?),
        VALUE_FLOAT => ScalarValue::Float(cursor.read_f64()?),
        VALUE_STRING => ScalarValue::Str(cursor.read_string()?),
        VALUE_BOOL => ScalarValue::Bool(cursor.read_u8()? != 0),
        other => return Err(EvalError::UnknownValueTag(other)),
    };
    Ok(Condition {
        operator,
        variable,
        value,
    })
}

/// Parses a full statement block. The whole block is validated even when
/// an early branch would already match, so malformed operands fail
/// deterministically rather than depending on state.
fn parse_block(bytes: &[u8]) -> Result<Block, EvalError> {
    let mut cursor = Cursor::new(bytes);
    let flags = cursor.read_u8()?;

    let mut branches = Vec::new();
    if flags & BRANCH_IF != 0 {
        let condition = read_condition(&mut cursor)?;
        let key = cursor.read_string()?;
        branches.push((condition, key));
    }
    if flags & BRANCH_ELIF != 0 {
        let count = cursor.read_u8()?;
        for _ in 0..count {
            let condition = read_condition(&mut cursor)?;
            let key = cursor.read_string()?;
            branches.push((condition, key));
        }
    }
    let else_key = if flags & BRANCH_ELSE != 0 {
        Some(cursor.read_string()?)
    } else {
        None
    };

    Ok(Block { branches, else_key })
}

fn values_equal(actual: &Value, expected: &ScalarValue) -> bool {
    // Ints and floats compare numerically across representations.
    if let (Some(a), Some(b)) = (actual.as_f64(), scalar_as_f64(expected)) {
        return a == b;
    }
    *actual == expected.to_json()
}

fn scalar_as_f64(value: &ScalarValue) -> Option<f64> {
    match value {
        ScalarValue::Int(n) => Some(*n as f64),
        ScalarValue::Float(f) => Some(*f),
        _ => None,
    }
}

fn condition_holds(state: &SessionState, condition: &Condition) -> Result<bool, EvalError> {
    // A variable the session has never written compares as a non-match.
    let Some(actual) = state.variables.get(&condition.variable) else {
        return Ok(false);
    };
    match condition.operator {
        OP_EQ => Ok(values_equal(actual, &condition.value)),
        OP_NE => Ok(!values_equal(actual, &condition.value)),
        ordering => {
            let (Some(a), Some(b)) = (actual.as_f64(), scalar_as_f64(&condition.value)) else {
                return Err(EvalError::Incomparable {
                    variable: condition.variable.clone(),
                });
            };
            Ok(match ordering {
                OP_LT => a < b,
                OP_GT => a > b,
                OP_LE => a <= b,
                OP_GE => a >= b,
                _ => unreachable!("operator validated during parse"),
            })
        }
    }
}

/// Evaluates one statement block against a state snapshot.
///
/// Returns the bundle reference guarded by the first branch whose
/// condition holds (IF, then each ELIF in order, then ELSE), or `None`
/// when nothing matches. Pure function of its two inputs.
pub fn evaluate(state: &SessionState, bytes: &[u8]) -> Result<Option<String>, EvalError> {
    let block = parse_block(bytes)?;
    for (condition, key) in &block.branches {
        if condition_holds(state, condition)? {
            return Ok(Some(key.clone()));
        }
    }
    Ok(block.else_key)
}

/// Encode side of the statement-block format, for fixtures and tests.
#[derive(Debug, Default)]
pub struct StatementBuilder {
    if_branch: Option<(Condition, String)>,
    elif_branches: Vec<(Condition, String)>,
    else_key: Option<String>,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when(mut self, condition: Condition, bundle_key: impl Into<String>) -> Self {
        let branch = (condition, bundle_key.into());
        if self.if_branch.is_none() {
            self.if_branch = Some(branch);
        } else {
            self.elif_branches.push(branch);
        }
        self
    }

    pub fn otherwise(mut self, bundle_key: impl Into<String>) -> Self {
        self.else_key = Some(bundle_key.into());
        self
    }

    pub fn encode(self) -> Vec<u8> {
        let mut flags = 0u8;
        if self.if_branch.is_some() {
            flags |= BRANCH_IF;
        }
        if !self.elif_branches.is_empty() {
            flags |= BRANCH_ELIF;
        }
        if self.else_key.is_some() {
            flags |= BRANCH_ELSE;
        }

        let mut out = vec![flags];
        if let Some((condition, key)) = &self.if_branch {
            encode_condition(condition, &mut out);
            encode_str_into(key, &mut out);
        }
        if !self.elif_branches.is_empty() {
            out.push(u8::try_from(self.elif_branches.len()).expect("more than 255 elif branches"));
            for (condition, key) in &self.elif_branches {
                encode_condition(condition, &mut out);
                encode_str_into(key, &mut out);
            }
        }
        if let Some(key) = &self.else_key {
            encode_str_into(key, &mut out);
        }
        out
    }
}

fn encode_condition(condition: &Condition, out: &mut Vec<u8>) {
    out.push(condition.operator);
    encode_str_into(&condition.variable, out);
    condition.value.encode_into(out);
}
