use thiserror::Error;

/// Raised while building a condition; no node is ever returned alongside it.
#[derive(Error, PartialEq, Debug)]
pub enum CondError {
    #[error("record key {0:?} is not an ASCII string")]
    NonAsciiRecKey(String),
    #[error("{variant}: null is not a legal operand")]
    NullOperand { variant: &'static str },
    #[error("{variant}: expected {expected} operand(s), got {actual}")]
    Arity {
        variant: &'static str,
        expected: &'static str,
        actual: usize,
    },
    #[error("{variant} does not accept multiple operands")]
    MultipleOperands { variant: &'static str },
    #[error("{variant}: invalid operand => {reason}")]
    InvalidOperand {
        variant: &'static str,
        reason: String,
    },
    #[error("the '!=' operator is not supported, negate an equality test instead")]
    NotEqualUnsupported,
}

#[derive(Error, PartialEq, Debug)]
pub enum VisitError {
    #[error("{visitor} has no handler for {variant}")]
    NoHandler {
        visitor: &'static str,
        variant: &'static str,
    },
    #[error("cannot push a negation through {variant}")]
    UnsupportedNegatedVariant { variant: &'static str },
    #[error(transparent)]
    Cond(#[from] CondError),
}

#[derive(Error, PartialEq, Debug)]
pub enum EvaluationError {
    #[error("record key {key:?} holds a null value")]
    NullValue { key: String },
    #[error("{key:?}: operator {operator} cannot be applied to {value}")]
    TypeMismatch {
        key: String,
        operator: &'static str,
        value: String,
    },
    #[error("{key:?}: unsupported record value {value}")]
    UnsupportedValue { key: String, value: String },
}
