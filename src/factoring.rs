use crate::{
    cond::{Cond, Junction},
    ordered_set::OrderedSet,
    visitor::{Transformer, VisitResult},
};
use std::collections::HashMap;

/// Pulls shared operands out of junctions using distributivity.
///
/// `(x OR a) AND (x OR b)` becomes `x OR (a AND b)`, and dually for `OR` of `AND`s. The pass
/// repeats until no operand is shared by two branches, so running it on its own output
/// changes nothing.
#[derive(Default)]
pub struct FactoringTransformer;

impl Transformer for FactoringTransformer {
    fn visit_compound_multi(
        &mut self,
        cond: &Cond,
        _subconditions: &OrderedSet<Cond>,
    ) -> VisitResult<Option<Cond>> {
        let Some(rebuilt) = self.transform_subconditions(cond)? else {
            return Ok(None);
        };
        match factor_out(&rebuilt) {
            // Every factoring removes at least one leaf, so this recursion terminates.
            Some(factored) => self.transform(&factored),
            None => Ok(Some(rebuilt)),
        }
    }
}

fn factor_out(cond: &Cond) -> Option<Cond> {
    let (outer, subconditions) = Junction::of(cond)?;
    let inner = outer.dual();

    let groups: Vec<Vec<Cond>> = subconditions
        .iter()
        .map(|subcond| match Junction::of(subcond) {
            Some((junction, nested)) if junction == inner => nested.iter().cloned().collect(),
            _ => vec![subcond.clone()],
        })
        .collect();

    let mut candidates = OrderedSet::new();
    let mut counts: HashMap<Cond, usize> = HashMap::new();
    for candidate in groups.iter().flatten() {
        candidates.insert(candidate.clone());
        *counts.entry(candidate.clone()).or_default() += 1;
    }

    let mut best: Option<(&Cond, usize)> = None;
    for candidate in &candidates {
        let count = counts.get(candidate).copied().unwrap_or_default();
        if count >= 2 && best.map_or(true, |(_, most)| count > most) {
            best = Some((candidate, count));
        }
    }
    let (common, count) = best?;
    log::debug!("factoring {common} out of {count} operands of {outer:?}");

    let mut remainders = Vec::with_capacity(count);
    let mut operands = Vec::with_capacity(subconditions.len() - count + 1);
    let mut position = None;
    for (subcond, group) in subconditions.iter().zip(&groups) {
        if group.contains(common) {
            position.get_or_insert(operands.len());
            remainders.push(inner.make(group.iter().filter(|c| *c != common).cloned()));
        } else {
            operands.push(subcond.clone());
        }
    }

    let factored = inner.make([common.clone(), outer.make(remainders)]);
    operands.insert(position.unwrap_or(operands.len()), factored);
    Some(outer.make(operands))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(key: &str, value: &str) -> Cond {
        Cond::equal(key, value).unwrap()
    }

    fn factor(cond: &Cond) -> Cond {
        FactoringTransformer.transform(cond).unwrap().unwrap()
    }

    #[test]
    fn can_factor_out_shared_conjuncts() {
        let cond = Cond::or([
            Cond::and([eq("restriction", "public"), eq("source", "abc"), eq("asn", "1")]),
            Cond::and([eq("restriction", "public"), eq("source", "def"), eq("asn", "1")]),
        ]);

        let factored = factor(&cond);

        assert_eq!(
            Cond::and([
                eq("restriction", "public"),
                eq("asn", "1"),
                Cond::or([eq("source", "abc"), eq("source", "def")]),
            ]),
            factored
        );
    }

    #[test]
    fn can_factor_out_shared_disjuncts() {
        let cond = Cond::and([
            Cond::or([eq("a", "x"), eq("b", "y")]),
            Cond::or([eq("a", "x"), eq("c", "z")]),
        ]);

        let factored = factor(&cond);

        assert_eq!(
            Cond::or([eq("a", "x"), Cond::and([eq("b", "y"), eq("c", "z")])]),
            factored
        );
    }

    #[test]
    fn can_absorb_a_branch_equal_to_the_shared_operand() {
        let cond = Cond::or([eq("a", "x"), Cond::and([eq("a", "x"), eq("b", "y")])]);

        assert_eq!(eq("a", "x"), factor(&cond));
    }

    #[test]
    fn can_keep_unrelated_operands_in_place() {
        let cond = Cond::or([
            eq("z", "z"),
            Cond::and([eq("a", "x"), eq("b", "y")]),
            Cond::and([eq("a", "x"), eq("c", "z")]),
        ]);

        let factored = factor(&cond);

        assert_eq!(
            Cond::or([
                eq("z", "z"),
                Cond::and([eq("a", "x"), Cond::or([eq("b", "y"), eq("c", "z")])]),
            ]),
            factored
        );
    }

    #[test]
    fn can_leave_conditions_without_shared_operands_unchanged() {
        let cond = Cond::or([
            Cond::and([eq("a", "x"), eq("b", "y")]),
            Cond::and([eq("c", "x"), eq("d", "y")]),
        ]);

        assert_eq!(cond, factor(&cond));
    }

    #[test]
    fn can_factor_nested_junctions() {
        let inner = Cond::or([
            Cond::and([eq("a", "1"), eq("b", "2")]),
            Cond::and([eq("a", "1"), eq("c", "3")]),
        ]);
        let cond = Cond::and([eq("d", "4"), Cond::not(inner)]);

        let factored = factor(&cond);

        assert_eq!(
            Cond::and([
                eq("d", "4"),
                Cond::not(Cond::and([eq("a", "1"), Cond::or([eq("b", "2"), eq("c", "3")])])),
            ]),
            factored
        );
    }

    #[test]
    fn can_reach_a_fixpoint() {
        let cond = Cond::or([
            Cond::and([eq("a", "1"), eq("b", "2"), eq("c", "3")]),
            Cond::and([eq("a", "1"), eq("b", "2"), eq("d", "4")]),
            Cond::and([eq("a", "1"), eq("e", "5")]),
        ]);

        let once = factor(&cond);

        assert_eq!(once, factor(&once));
    }
}
