//! Traversal over condition trees.
//!
//! [`Visitor::apply`] dispatches on the concrete variant and calls the matching `visit_*`
//! handler. Every handler falls back, by default, to the handler of the next more general
//! category, from most specific to least specific:
//!
//! ```text
//! visit_and / visit_or     -> visit_compound_multi -> visit_compound -> visit_cond
//! visit_not                                        -> visit_compound -> visit_cond
//! visit_equal, visit_in, … -> visit_rec_item_param -> visit_rec_item -> visit_cond
//! visit_is_true / is_null                          -> visit_rec_item -> visit_cond
//! visit_fixed, visit_custom                                          -> visit_cond
//! ```
//!
//! `visit_cond` fails with [`VisitError::NoHandler`], so a visitor must handle every variant
//! it can meet, the custom ones included.
use crate::{
    cond::{Cond, CondKind, CustomCond},
    error::VisitError,
    ordered_set::OrderedSet,
    values::Value,
};

pub type VisitResult<T> = Result<T, VisitError>;

pub trait Visitor {
    type Output;

    fn apply(&mut self, cond: &Cond) -> VisitResult<Self::Output> {
        match cond.kind() {
            CondKind::Not(not) => self.visit_not(cond, not.subcond()),
            CondKind::And(c) => self.visit_and(cond, c.subconditions()),
            CondKind::Or(c) => self.visit_or(cond, c.subconditions()),
            CondKind::Equal(c) => self.visit_equal(cond, c.rec_key(), c.op_param()),
            CondKind::Greater(c) => self.visit_greater(cond, c.rec_key(), c.op_param()),
            CondKind::GreaterOrEqual(c) => {
                self.visit_greater_or_equal(cond, c.rec_key(), c.op_param())
            }
            CondKind::Less(c) => self.visit_less(cond, c.rec_key(), c.op_param()),
            CondKind::LessOrEqual(c) => {
                self.visit_less_or_equal(cond, c.rec_key(), c.op_param())
            }
            CondKind::In(c) => self.visit_in(cond, c.rec_key(), c.op_param()),
            CondKind::Between(c) => {
                let (min, max) = c.op_param();
                self.visit_between(cond, c.rec_key(), min, max)
            }
            CondKind::ContainsSubstring(c) => {
                self.visit_contains_substring(cond, c.rec_key(), c.op_param())
            }
            CondKind::IsTrue(c) => self.visit_is_true(cond, c.rec_key()),
            CondKind::IsNull(c) => self.visit_is_null(cond, c.rec_key()),
            CondKind::Fixed(c) => self.visit_fixed(cond, c.truthness()),
            CondKind::Custom(c) => self.visit_custom(cond, c.get()),
        }
    }

    fn visit_not(&mut self, cond: &Cond, _subcond: &Cond) -> VisitResult<Self::Output> {
        self.visit_compound(cond)
    }

    fn visit_and(
        &mut self,
        cond: &Cond,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Self::Output> {
        self.visit_compound_multi(cond, subconditions)
    }

    fn visit_or(
        &mut self,
        cond: &Cond,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Self::Output> {
        self.visit_compound_multi(cond, subconditions)
    }

    fn visit_compound_multi(
        &mut self,
        cond: &Cond,
        _subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Self::Output> {
        self.visit_compound(cond)
    }

    fn visit_compound(&mut self, cond: &Cond) -> VisitResult<Self::Output> {
        self.visit_cond(cond)
    }

    fn visit_equal(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.visit_rec_item_param(cond)
    }

    fn visit_greater(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.visit_rec_item_param(cond)
    }

    fn visit_greater_or_equal(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.visit_rec_item_param(cond)
    }

    fn visit_less(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.visit_rec_item_param(cond)
    }

    fn visit_less_or_equal(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.visit_rec_item_param(cond)
    }

    fn visit_in(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &OrderedSet<Value>,
    ) -> VisitResult<Self::Output> {
        self.visit_rec_item_param(cond)
    }

    fn visit_between(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _min: &Value,
        _max: &Value,
    ) -> VisitResult<Self::Output> {
        self.visit_rec_item_param(cond)
    }

    fn visit_contains_substring(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &str,
    ) -> VisitResult<Self::Output> {
        self.visit_rec_item_param(cond)
    }

    fn visit_rec_item_param(&mut self, cond: &Cond) -> VisitResult<Self::Output> {
        self.visit_rec_item(cond)
    }

    fn visit_is_true(&mut self, cond: &Cond, _rec_key: &str) -> VisitResult<Self::Output> {
        self.visit_rec_item(cond)
    }

    fn visit_is_null(&mut self, cond: &Cond, _rec_key: &str) -> VisitResult<Self::Output> {
        self.visit_rec_item(cond)
    }

    fn visit_rec_item(&mut self, cond: &Cond) -> VisitResult<Self::Output> {
        self.visit_cond(cond)
    }

    fn visit_fixed(&mut self, cond: &Cond, _truthness: bool) -> VisitResult<Self::Output> {
        self.visit_cond(cond)
    }

    fn visit_custom(
        &mut self,
        cond: &Cond,
        _custom: &dyn CustomCond,
    ) -> VisitResult<Self::Output> {
        self.visit_cond(cond)
    }

    fn visit_cond(&mut self, cond: &Cond) -> VisitResult<Self::Output> {
        Err(VisitError::NoHandler {
            visitor: std::any::type_name::<Self>(),
            variant: cond.variant_name(),
        })
    }
}

/// A visitor producing conditions.
///
/// The handlers and their fallback chain mirror those of [`Visitor`], except at the top of the
/// chain: compounds get their operands transformed and are rebuilt through the normalizing
/// constructors, anything else is kept as it is. A handler returns `Ok(None)` to drop a
/// condition; a compound whose operands are all dropped is dropped as well.
pub trait Transformer {
    fn transform(&mut self, cond: &Cond) -> VisitResult<Option<Cond>> {
        TransformVisitor(self).apply(cond)
    }

    /// Transforms the operands of a compound and rebuilds it.
    fn transform_subconditions(&mut self, cond: &Cond) -> VisitResult<Option<Cond>> {
        match cond.kind() {
            CondKind::Not(not) => Ok(self.transform(not.subcond())?.map(Cond::not)),
            CondKind::And(c) | CondKind::Or(c) => {
                let mut transformed = Vec::with_capacity(c.subconditions().len());
                for subcond in c.subconditions() {
                    if let Some(subcond) = self.transform(subcond)? {
                        transformed.push(subcond);
                    }
                }
                if transformed.is_empty() {
                    Ok(None)
                } else if matches!(cond.kind(), CondKind::And(_)) {
                    Ok(Some(Cond::and(transformed)))
                } else {
                    Ok(Some(Cond::or(transformed)))
                }
            }
            _ => Ok(Some(cond.clone())),
        }
    }

    fn visit_not(&mut self, cond: &Cond, _subcond: &Cond) -> VisitResult<Option<Cond>> {
        self.visit_compound(cond)
    }

    fn visit_and(
        &mut self,
        cond: &Cond,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Option<Cond>> {
        self.visit_compound_multi(cond, subconditions)
    }

    fn visit_or(
        &mut self,
        cond: &Cond,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Option<Cond>> {
        self.visit_compound_multi(cond, subconditions)
    }

    fn visit_compound_multi(
        &mut self,
        cond: &Cond,
        _subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Option<Cond>> {
        self.visit_compound(cond)
    }

    fn visit_compound(&mut self, cond: &Cond) -> VisitResult<Option<Cond>> {
        self.transform_subconditions(cond)
    }

    fn visit_equal(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Option<Cond>> {
        self.visit_rec_item_param(cond)
    }

    fn visit_greater(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Option<Cond>> {
        self.visit_rec_item_param(cond)
    }

    fn visit_greater_or_equal(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Option<Cond>> {
        self.visit_rec_item_param(cond)
    }

    fn visit_less(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Option<Cond>> {
        self.visit_rec_item_param(cond)
    }

    fn visit_less_or_equal(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &Value,
    ) -> VisitResult<Option<Cond>> {
        self.visit_rec_item_param(cond)
    }

    fn visit_in(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &OrderedSet<Value>,
    ) -> VisitResult<Option<Cond>> {
        self.visit_rec_item_param(cond)
    }

    fn visit_between(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _min: &Value,
        _max: &Value,
    ) -> VisitResult<Option<Cond>> {
        self.visit_rec_item_param(cond)
    }

    fn visit_contains_substring(
        &mut self,
        cond: &Cond,
        _rec_key: &str,
        _op_param: &str,
    ) -> VisitResult<Option<Cond>> {
        self.visit_rec_item_param(cond)
    }

    fn visit_rec_item_param(&mut self, cond: &Cond) -> VisitResult<Option<Cond>> {
        self.visit_rec_item(cond)
    }

    fn visit_is_true(&mut self, cond: &Cond, _rec_key: &str) -> VisitResult<Option<Cond>> {
        self.visit_rec_item(cond)
    }

    fn visit_is_null(&mut self, cond: &Cond, _rec_key: &str) -> VisitResult<Option<Cond>> {
        self.visit_rec_item(cond)
    }

    fn visit_rec_item(&mut self, cond: &Cond) -> VisitResult<Option<Cond>> {
        self.visit_cond(cond)
    }

    fn visit_fixed(&mut self, cond: &Cond, _truthness: bool) -> VisitResult<Option<Cond>> {
        self.visit_cond(cond)
    }

    fn visit_custom(
        &mut self,
        cond: &Cond,
        _custom: &dyn CustomCond,
    ) -> VisitResult<Option<Cond>> {
        self.visit_cond(cond)
    }

    fn visit_cond(&mut self, cond: &Cond) -> VisitResult<Option<Cond>> {
        Ok(Some(cond.clone()))
    }
}

struct TransformVisitor<'a, T: ?Sized>(&'a mut T);

impl<T: Transformer + ?Sized> Visitor for TransformVisitor<'_, T> {
    type Output = Option<Cond>;

    fn visit_not(&mut self, cond: &Cond, subcond: &Cond) -> VisitResult<Self::Output> {
        self.0.visit_not(cond, subcond)
    }

    fn visit_and(
        &mut self,
        cond: &Cond,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Self::Output> {
        self.0.visit_and(cond, subconditions)
    }

    fn visit_or(
        &mut self,
        cond: &Cond,
        subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Self::Output> {
        self.0.visit_or(cond, subconditions)
    }

    fn visit_equal(
        &mut self,
        cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.0.visit_equal(cond, rec_key, op_param)
    }

    fn visit_greater(
        &mut self,
        cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.0.visit_greater(cond, rec_key, op_param)
    }

    fn visit_greater_or_equal(
        &mut self,
        cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.0.visit_greater_or_equal(cond, rec_key, op_param)
    }

    fn visit_less(
        &mut self,
        cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.0.visit_less(cond, rec_key, op_param)
    }

    fn visit_less_or_equal(
        &mut self,
        cond: &Cond,
        rec_key: &str,
        op_param: &Value,
    ) -> VisitResult<Self::Output> {
        self.0.visit_less_or_equal(cond, rec_key, op_param)
    }

    fn visit_in(
        &mut self,
        cond: &Cond,
        rec_key: &str,
        op_param: &OrderedSet<Value>,
    ) -> VisitResult<Self::Output> {
        self.0.visit_in(cond, rec_key, op_param)
    }

    fn visit_between(
        &mut self,
        cond: &Cond,
        rec_key: &str,
        min: &Value,
        max: &Value,
    ) -> VisitResult<Self::Output> {
        self.0.visit_between(cond, rec_key, min, max)
    }

    fn visit_contains_substring(
        &mut self,
        cond: &Cond,
        rec_key: &str,
        op_param: &str,
    ) -> VisitResult<Self::Output> {
        self.0.visit_contains_substring(cond, rec_key, op_param)
    }

    fn visit_is_true(&mut self, cond: &Cond, rec_key: &str) -> VisitResult<Self::Output> {
        self.0.visit_is_true(cond, rec_key)
    }

    fn visit_is_null(&mut self, cond: &Cond, rec_key: &str) -> VisitResult<Self::Output> {
        self.0.visit_is_null(cond, rec_key)
    }

    fn visit_fixed(&mut self, cond: &Cond, truthness: bool) -> VisitResult<Self::Output> {
        self.0.visit_fixed(cond, truthness)
    }

    fn visit_custom(
        &mut self,
        cond: &Cond,
        custom: &dyn CustomCond,
    ) -> VisitResult<Self::Output> {
        self.0.visit_custom(cond, custom)
    }
}
