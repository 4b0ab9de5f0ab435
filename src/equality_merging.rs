use crate::{
    cond::{Cond, CondKind, Junction},
    ordered_set::OrderedSet,
    values::Value,
    visitor::{Transformer, VisitResult},
};
use std::collections::HashMap;

/// Collapses sibling equality and membership tests on the same record key into one `IN`.
///
/// Under an `OR`, `asn == 1`, `asn IN (2, 3)` and `asn == 4` become `asn IN (1, 2, 3, 4)`.
/// Under an `AND`, the same happens to their negations, giving `NOT asn IN (…)`. The merged
/// test takes the place of the first test of its group.
#[derive(Default)]
pub struct EqualityMergingTransformer;

impl Transformer for EqualityMergingTransformer {
    fn visit_compound_multi(
        &mut self,
        cond: &Cond,
        _subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Option<Cond>> {
        let Some(rebuilt) = self.transform_subconditions(cond)? else {
            return Ok(None);
        };
        Ok(Some(merge_equalities(&rebuilt)?))
    }
}

enum Slot {
    Keep(Cond),
    Merge(String),
}

fn merge_equalities(cond: &Cond) -> VisitResult<Cond> {
    let Some((junction, subconditions)) = Junction::of(cond) else {
        return Ok(cond.clone());
    };
    let negated = junction == Junction::And;

    let mut slots = Vec::with_capacity(subconditions.len());
    let mut groups: HashMap<String, (OrderedSet<Value>, usize)> = HashMap::new();
    for subcond in subconditions {
        match membership_test(subcond, negated) {
            Some((rec_key, values)) => {
                let (merged, members) = groups.entry(rec_key.to_owned()).or_insert_with(|| {
                    slots.push(Slot::Merge(rec_key.to_owned()));
                    (OrderedSet::new(), 0)
                });
                merged.extend(values.into_iter().cloned());
                *members += 1;
            }
            None => slots.push(Slot::Keep(subcond.clone())),
        }
    }
    if groups.values().all(|(_, members)| *members < 2) {
        return Ok(cond.clone());
    }

    let mut operands = Vec::with_capacity(slots.len());
    for slot in slots {
        match slot {
            Slot::Keep(subcond) => operands.push(subcond),
            Slot::Merge(rec_key) => {
                let values = groups
                    .remove(&rec_key)
                    .map(|(values, _)| values)
                    .unwrap_or_default();
                log::debug!("merging {} value(s) tested on {rec_key:?}", values.len());
                let merged = Cond::is_in(&rec_key, values)?;
                operands.push(if negated { Cond::not(merged) } else { merged });
            }
        }
    }
    Ok(junction.make(operands))
}

/// The key and values of an equality or membership test, looked up under a `NOT` if `negated`.
fn membership_test(cond: &Cond, negated: bool) -> Option<(&str, Vec<&Value>)> {
    let test = if negated { cond.subcond()? } else { cond };
    match test.kind() {
        CondKind::Equal(c) => Some((c.rec_key(), vec![c.op_param()])),
        CondKind::In(c) => Some((c.rec_key(), c.op_param().iter().collect())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn eq(key: &str, value: i64) -> Cond {
        Cond::equal(key, value).unwrap()
    }

    fn is_in(key: &str, values: &[i64]) -> Cond {
        Cond::is_in(key, values.iter().copied()).unwrap()
    }

    fn merge(cond: &Cond) -> Cond {
        EqualityMergingTransformer.transform(cond).unwrap().unwrap()
    }

    #[test]
    fn can_merge_equalities_under_or() {
        let cond = Cond::or([
            eq("asn", 1),
            is_in("asn", &[7, 5, 3]),
            eq("asn", 5),
            eq("asn", 2),
            is_in("asn", &[2, 13, 11]),
        ]);

        let merged = merge(&cond);

        assert_eq!(is_in("asn", &[1, 7, 5, 3, 2, 13, 11]), merged);
        let values: Vec<_> = match merged.kind() {
            CondKind::In(c) => c.op_param().iter().cloned().collect(),
            _ => unreachable!(),
        };
        assert_eq!(
            [1, 7, 5, 3, 2, 13, 11].map(Value::from).to_vec(),
            values
        );
    }

    #[test]
    fn can_merge_negated_equalities_under_and() {
        let cond = Cond::and([
            Cond::not(eq("asn", 1)),
            Cond::is_null("url").unwrap(),
            Cond::not(is_in("asn", &[2, 3])),
        ]);

        let merged = merge(&cond);

        assert_eq!(
            Cond::and([
                Cond::not(is_in("asn", &[1, 2, 3])),
                Cond::is_null("url").unwrap(),
            ]),
            merged
        );
    }

    #[test]
    fn can_keep_keys_apart() {
        let cond = Cond::or([eq("asn", 1), eq("cc", 1), eq("asn", 2), eq("cc", 3)]);

        assert_eq!(
            Cond::or([is_in("asn", &[1, 2]), is_in("cc", &[1, 3])]),
            merge(&cond)
        );
    }

    #[test]
    fn can_ignore_positive_tests_under_and() {
        let cond = Cond::and([eq("asn", 1), eq("asn", 2)]);

        assert_eq!(cond, merge(&cond));
    }

    #[test]
    fn can_treat_numbers_of_any_scale_as_duplicates() {
        let cond = Cond::or([
            eq("asn", 5),
            Cond::equal("asn", Decimal::new(50, 1)).unwrap(),
            eq("asn", 6),
        ]);

        assert_eq!(is_in("asn", &[5, 6]), merge(&cond));
    }

    #[test]
    fn can_merge_inside_nested_compounds() {
        let cond = Cond::and([
            Cond::is_true("flag").unwrap(),
            Cond::or([eq("asn", 1), eq("asn", 2)]),
        ]);

        assert_eq!(
            Cond::and([Cond::is_true("flag").unwrap(), is_in("asn", &[1, 2])]),
            merge(&cond)
        );
    }

    #[test]
    fn can_reach_a_fixpoint() {
        let cond = Cond::or([
            eq("asn", 1),
            Cond::and([Cond::not(eq("cc", 1)), Cond::not(eq("cc", 2))]),
            eq("asn", 3),
        ]);

        let once = merge(&cond);

        assert_eq!(once, merge(&once));
    }
}
