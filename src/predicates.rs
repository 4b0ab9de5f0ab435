use crate::{
    cond::{Cond, CustomCond},
    error::{EvaluationError, VisitError},
    events::{FieldValue, RecordView},
    ordered_set::OrderedSet,
    values::Value,
    visitor::{VisitResult, Visitor},
};
use std::{cmp::Ordering, fmt, sync::Arc};

type PredicateFn = dyn Fn(&dyn RecordView) -> Result<bool, EvaluationError> + Send + Sync;

/// A condition compiled into a function of a record.
///
/// A key missing from the record makes every record-item test false, except `IS NULL` which
/// is true. A key present with a null value is an error. Keys holding several values satisfy
/// a test as soon as one of the values does.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn compile(cond: &Cond) -> Result<Self, VisitError> {
        log::trace!("compiling {cond:?}");
        PredicateCompiler.apply(cond)
    }

    pub fn evaluate(&self, record: &dyn RecordView) -> Result<bool, EvaluationError> {
        (self.0)(record)
    }

    fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn RecordView) -> Result<bool, EvaluationError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    fn constant(truthness: bool) -> Self {
        Self::new(move |_| Ok(truthness))
    }

    fn item<F>(rec_key: &str, if_missing: bool, test: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<bool, EvaluationError> + Send + Sync + 'static,
    {
        let rec_key = rec_key.to_owned();
        Self::new(move |record| match record.get(&rec_key)? {
            None => Ok(if_missing),
            Some(FieldValue::Null) => Err(EvaluationError::NullValue {
                key: rec_key.clone(),
            }),
            Some(FieldValue::Single(value)) => test(&rec_key, &value),
            Some(FieldValue::Multi(values)) => {
                for value in &values {
                    if test(&rec_key, value)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        })
    }

    fn ordering(
        rec_key: &str,
        operator: &'static str,
        op_param: &Value,
        accept: fn(Ordering) -> bool,
    ) -> Self {
        let op_param = op_param.clone();
        Self::item(rec_key, false, move |rec_key, value| {
            value
                .partial_cmp(&op_param)
                .map(accept)
                .ok_or_else(|| mismatch(rec_key, operator, value))
        })
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

fn mismatch(rec_key: &str, operator: &'static str, value: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        key: rec_key.to_string(),
        operator,
        value: format!("{value} ({})", value.kind()),
    }
}

#[derive(Default)]
pub struct PredicateCompiler;

impl PredicateCompiler {
    fn compile_all(&mut self, subconditions: &OrderedSet<Cond>) -> VisitResult<Vec<Predicate>> {
        subconditions.iter().map(|subcond| self.apply(subcond)).collect()
    }
}

impl Visitor for PredicateCompiler {
    type Output = Predicate;

    fn visit_not(&mut self, _cond: &Cond, subcond: &Cond) -> VisitResult<Predicate> {
        let inner = self.apply(subcond)?;
        Ok(Predicate::new(move |record| Ok(!inner.evaluate(record)?)))
    }

    fn visit_and(
        &mut self,
        _cond: &Cond,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Predicate> {
        let predicates = self.compile_all(subconditions)?;
        Ok(Predicate::new(move |record| {
            for predicate in &predicates {
                if !predicate.evaluate(record)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }))
    }

    fn visit_or(
        &mut self,
        _cond: &Cond,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Predicate> {
        let predicates = self.compile_all(subconditions)?;
        Ok(Predicate::new(move |record| {
            for predicate in &predicates {
                if predicate.evaluate(record)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }))
    }

    fn visit_equal(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Predicate> {
        let op_param = op_param.clone();
        Ok(Predicate::item(rec_key, false, move |_, value| Ok(*value == op_param)))
    }

    fn visit_greater(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Predicate> {
        Ok(Predicate::ordering(rec_key, ">", op_param, Ordering::is_gt))
    }

    fn visit_greater_or_equal(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Predicate> {
        Ok(Predicate::ordering(rec_key, ">=", op_param, Ordering::is_ge))
    }

    fn visit_less(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Predicate> {
        Ok(Predicate::ordering(rec_key, "<", op_param, Ordering::is_lt))
    }

    fn visit_less_or_equal(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Predicate> {
        Ok(Predicate::ordering(rec_key, "<=", op_param, Ordering::is_le))
    }

    fn visit_in(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &OrderedSet<Value>,
    ) -> VisitResult<Predicate> {
        let op_param = op_param.clone();
        Ok(Predicate::item(rec_key, false, move |_, value| Ok(op_param.contains(value))))
    }

    fn visit_between(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        min: &Value,
        max: &Value,
    ) -> VisitResult<Predicate> {
        let (min, max) = (min.clone(), max.clone());
        Ok(Predicate::item(rec_key, false, move |rec_key, value| {
            match (min.partial_cmp(value), value.partial_cmp(&max)) {
                (Some(lower), Some(upper)) => Ok(lower.is_le() && upper.is_le()),
                _ => Err(mismatch(rec_key, "BETWEEN", value)),
            }
        }))
    }

    fn visit_contains_substring(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &str,
    ) -> VisitResult<Predicate> {
        let substring = op_param.to_owned();
        Ok(Predicate::item(rec_key, false, move |rec_key, value| {
            value
                .as_str()
                .map(|value| value.contains(substring.as_str()))
                .ok_or_else(|| mismatch(rec_key, "CONTAINS", value))
        }))
    }

    fn visit_is_true(&mut self, _cond: &Cond, rec_key: &str) -> VisitResult<Predicate> {
        Ok(Predicate::item(rec_key, false, |rec_key, value| {
            value
                .as_bool()
                .ok_or_else(|| mismatch(rec_key, "IS TRUE", value))
        }))
    }

    fn visit_is_null(&mut self, _cond: &Cond, rec_key: &str) -> VisitResult<Predicate> {
        Ok(Predicate::item(rec_key, true, |_, _| Ok(false)))
    }

    fn visit_fixed(&mut self, _cond: &Cond, truthness: bool) -> VisitResult<Predicate> {
        Ok(Predicate::constant(truthness))
    }

    fn visit_custom(&mut self, cond: &Cond, custom: &dyn CustomCond) -> VisitResult<Predicate> {
        log::debug!("no predicate for custom condition {custom}");
        self.visit_cond(cond)
    }
}
