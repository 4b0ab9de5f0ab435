use crate::{
    cond::{Cond, CustomCond, Junction},
    ordered_set::OrderedSet,
    values::Value,
    visitor::{VisitResult, Visitor},
};
use itertools::Itertools;
use std::fmt;

/// Renders conditions as query-like strings, e.g. `asn >= 42 AND url CONTAINS '://'`.
#[derive(Default)]
pub struct CondRenderer;

impl CondRenderer {
    fn render_operand(&mut self, cond: &Cond) -> VisitResult<String> {
        let rendered = self.apply(cond)?;
        Ok(if Junction::of(cond).is_some() {
            format!("({rendered})")
        } else {
            rendered
        })
    }

    fn render_junction(
        &mut self,
        operator: &str,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<String> {
        let operands: Vec<String> = subconditions
            .iter()
            .map(|subcond| self.render_operand(subcond))
            .collect::<VisitResult<_>>()?;
        Ok(operands.iter().join(operator))
    }
}

impl Visitor for CondRenderer {
    type Output = String;

    fn visit_not(&mut self, _cond: &Cond, subcond: &Cond) -> VisitResult<String> {
        Ok(format!("NOT ({})", self.apply(subcond)?))
    }

    fn visit_and(&mut self, _cond: &Cond, subconditions: &OrderedSet<Cond>) -> VisitResult<String> {
        self.render_junction(" AND ", subconditions)
    }

    fn visit_or(&mut self, _cond: &Cond, subconditions: &OrderedSet<Cond>) -> VisitResult<String> {
        self.render_junction(" OR ", subconditions)
    }

    fn visit_equal(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<String> {
        Ok(format!("{rec_key} == {op_param}"))
    }

    fn visit_greater(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<String> {
        Ok(format!("{rec_key} > {op_param}"))
    }

    fn visit_greater_or_equal(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<String> {
        Ok(format!("{rec_key} >= {op_param}"))
    }

    fn visit_less(&mut self, _cond: &Cond, rec_key: &str, op_param: &Value) -> VisitResult<String> {
        Ok(format!("{rec_key} < {op_param}"))
    }

    fn visit_less_or_equal(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<String> {
        Ok(format!("{rec_key} <= {op_param}"))
    }

    fn visit_in(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &OrderedSet<Value>,
    ) -> VisitResult<String> {
        Ok(format!("{rec_key} IN ({})", op_param.iter().join(", ")))
    }

    fn visit_between(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        min: &Value,
        max: &Value,
    ) -> VisitResult<String> {
        Ok(format!("{rec_key} BETWEEN {min} AND {max}"))
    }

    fn visit_contains_substring(
        &mut self,
        _cond: &Cond,
        rec_key: &str,
        op_param: &str,
    ) -> VisitResult<String> {
        Ok(format!("{rec_key} CONTAINS {}", Value::from(op_param)))
    }

    fn visit_is_true(&mut self, _cond: &Cond, rec_key: &str) -> VisitResult<String> {
        Ok(format!("{rec_key} IS TRUE"))
    }

    fn visit_is_null(&mut self, _cond: &Cond, rec_key: &str) -> VisitResult<String> {
        Ok(format!("{rec_key} IS NULL"))
    }

    fn visit_fixed(&mut self, _cond: &Cond, truthness: bool) -> VisitResult<String> {
        Ok(if truthness { "TRUE" } else { "FALSE" }.to_string())
    }

    fn visit_custom(&mut self, _cond: &Cond, custom: &dyn CustomCond) -> VisitResult<String> {
        Ok(custom.to_string())
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = CondRenderer.apply(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
