use crate::{
    cond::{Cond, CondType, Junction},
    error::VisitError,
    visitor::{Transformer, VisitResult},
};

/// Pushes negations down to the leaves with De Morgan's laws.
///
/// `NOT (a AND b)` becomes `NOT a OR NOT b` and `NOT (a OR b)` becomes `NOT a AND NOT b`,
/// all the way down, so that in the output every `NOT` wraps a record-item test. A `NOT` over
/// a custom variant cannot be pushed through and fails with
/// [`VisitError::UnsupportedNegatedVariant`].
#[derive(Default)]
pub struct DeMorganTransformer;

impl Transformer for DeMorganTransformer {
    fn visit_not(&mut self, cond: &Cond, subcond: &Cond) -> VisitResult<Option<Cond>> {
        if let Some((junction, subconditions)) = Junction::of(subcond) {
            log::trace!("pushing a negation through {}", subcond.variant_name());
            let pushed = junction
                .dual()
                .make(subconditions.iter().cloned().map(Cond::not));
            return self.transform(&pushed);
        }
        if subcond.cond_type().is_some_and(CondType::is_rec_item) {
            return Ok(Some(cond.clone()));
        }
        // Normalization never leaves a `NOT` directly over a `NOT` or a `FixedCond`.
        Err(VisitError::UnsupportedNegatedVariant {
            variant: subcond.variant_name(),
        })
    }
}
