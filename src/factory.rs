use crate::{
    cond::{Cond, CondType},
    error::CondError,
    values::Value,
};

#[derive(Clone, PartialEq, Debug)]
pub enum Operand {
    Null,
    Value(Value),
    Cond(Cond),
    List(Vec<Operand>),
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Cond> for Operand {
    fn from(cond: Cond) -> Self {
        Self::Cond(cond)
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Self::Value(Value::Boolean(value))
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Builds a condition of the requested variant from raw operands.
///
/// The result is normalized and therefore not necessarily of the requested variant. Operand
/// layout per variant:
///
/// * `Not`: one condition.
/// * `And`, `Or`: any number of conditions, or a single list of conditions.
/// * comparisons and `ContainsSubstring`: a record key followed by zero or more operands; none
///   gives `FALSE`, several give the `OR` of one condition per operand.
/// * `In`: a record key and one list of values.
/// * `Between`: a record key and one list of exactly two values.
/// * `IsTrue`, `IsNull`: a record key.
/// * `Fixed`: one boolean.
pub fn make(cond_type: CondType, operands: Vec<Operand>) -> Result<Cond, CondError> {
    let variant = cond_type.name();
    if operands.iter().any(|operand| *operand == Operand::Null) {
        return Err(CondError::NullOperand { variant });
    }

    match cond_type {
        CondType::Not => {
            let [operand] = exactly::<1>(variant, "1", operands)?;
            Ok(Cond::not(expect_cond(variant, operand)?))
        }
        CondType::And | CondType::Or => {
            let operands = match <[Operand; 1]>::try_from(operands) {
                Ok([Operand::List(items)]) => items,
                Ok([single]) => vec![single],
                Err(operands) => operands,
            };
            let subconditions = operands
                .into_iter()
                .map(|operand| expect_cond(variant, operand))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(if cond_type == CondType::And {
                Cond::and(subconditions)
            } else {
                Cond::or(subconditions)
            })
        }
        CondType::Fixed => match exactly::<1>(variant, "1", operands)? {
            [Operand::Value(Value::Boolean(truthness))] => Ok(Cond::fixed(truthness)),
            [other] => Err(CondError::InvalidOperand {
                variant,
                reason: format!("expected a boolean, got {other:?}"),
            }),
        },
        CondType::IsTrue | CondType::IsNull => {
            let [key] = exactly::<1>(variant, "1", operands)?;
            let rec_key = expect_rec_key(variant, key)?;
            if cond_type == CondType::IsTrue {
                Cond::is_true(&rec_key)
            } else {
                Cond::is_null(&rec_key)
            }
        }
        _ => make_rec_item_param(cond_type, operands),
    }
}

fn make_rec_item_param(cond_type: CondType, operands: Vec<Operand>) -> Result<Cond, CondError> {
    let variant = cond_type.name();
    let mut operands = operands.into_iter();
    let rec_key = match operands.next() {
        Some(key) => expect_rec_key(variant, key)?,
        None => {
            return Err(CondError::Arity {
                variant,
                expected: "a record key and operands",
                actual: 0,
            })
        }
    };
    let op_params: Vec<Operand> = operands.collect();

    match op_params.len() {
        0 => Ok(Cond::fixed(false)),
        1 => {
            let mut op_params = op_params;
            match op_params.pop() {
                Some(op_param) => make_single(cond_type, &rec_key, op_param),
                None => Ok(Cond::fixed(false)),
            }
        }
        _ if cond_type.accepts_multiple_op_params() => {
            let alternatives = op_params
                .into_iter()
                .map(|op_param| make_single(cond_type, &rec_key, op_param))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Cond::or(alternatives))
        }
        _ => Err(CondError::MultipleOperands { variant }),
    }
}

fn make_single(cond_type: CondType, rec_key: &str, op_param: Operand) -> Result<Cond, CondError> {
    let variant = cond_type.name();
    match cond_type {
        CondType::In => {
            let values = expect_values(variant, op_param)?;
            Cond::is_in(rec_key, values)
        }
        CondType::Between => {
            let values = expect_values(variant, op_param)?;
            match <[Value; 2]>::try_from(values) {
                Ok([min, max]) => Cond::between(rec_key, min, max),
                Err(values) => Err(CondError::Arity {
                    variant,
                    expected: "2 (min, max)",
                    actual: values.len(),
                }),
            }
        }
        CondType::ContainsSubstring => match op_param {
            Operand::Value(Value::String(substring)) => {
                Cond::contains_substring(rec_key, substring)
            }
            other => Err(CondError::InvalidOperand {
                variant,
                reason: format!("expected a string, got {other:?}"),
            }),
        },
        _ => match op_param {
            Operand::Value(value) => Cond::compare(cond_type, rec_key, value),
            other => Err(CondError::InvalidOperand {
                variant,
                reason: format!("expected a scalar value, got {other:?}"),
            }),
        },
    }
}

fn exactly<const N: usize>(
    variant: &'static str,
    expected: &'static str,
    operands: Vec<Operand>,
) -> Result<[Operand; N], CondError> {
    <[Operand; N]>::try_from(operands).map_err(|operands| CondError::Arity {
        variant,
        expected,
        actual: operands.len(),
    })
}

fn expect_cond(variant: &'static str, operand: Operand) -> Result<Cond, CondError> {
    match operand {
        Operand::Cond(cond) => Ok(cond),
        Operand::Null => Err(CondError::NullOperand { variant }),
        other => Err(CondError::InvalidOperand {
            variant,
            reason: format!("expected a condition, got {other:?}"),
        }),
    }
}

fn expect_rec_key(variant: &'static str, operand: Operand) -> Result<String, CondError> {
    match operand {
        Operand::Value(Value::String(rec_key)) => Ok(rec_key),
        other => Err(CondError::InvalidOperand {
            variant,
            reason: format!("expected a record key, got {other:?}"),
        }),
    }
}

fn expect_values(variant: &'static str, operand: Operand) -> Result<Vec<Value>, CondError> {
    match operand {
        Operand::List(items) => items
            .into_iter()
            .map(|item| match item {
                Operand::Value(value) => Ok(value),
                Operand::Null => Err(CondError::NullOperand { variant }),
                other => Err(CondError::InvalidOperand {
                    variant,
                    reason: format!("expected a value, got {other:?}"),
                }),
            })
            .collect(),
        other => Err(CondError::InvalidOperand {
            variant,
            reason: format!("expected a collection of values, got {other:?}"),
        }),
    }
}
