use crate::{
    cond::{Cond, CondType},
    error::CondError,
    factory::{make, Operand},
    values::Value,
};

/// Entry point of the condition-building DSL.
///
/// ```
/// use data_selection::CondBuilder;
///
/// let cond = CondBuilder::or([
///     CondBuilder::field("asn").eq(42).unwrap(),
///     CondBuilder::field("url").contains_substring("://").unwrap(),
/// ]);
/// assert_eq!("asn == 42 OR url CONTAINS '://'", cond.to_string());
/// ```
pub struct CondBuilder;

impl CondBuilder {
    pub fn field(rec_key: &str) -> FieldCondBuilder {
        FieldCondBuilder {
            rec_key: rec_key.to_string(),
        }
    }

    pub fn not(cond: Cond) -> Cond {
        Cond::not(cond)
    }

    pub fn and<I>(conds: I) -> Cond
    where
        I: IntoIterator<Item = Cond>,
    {
        Cond::and(conds)
    }

    pub fn or<I>(conds: I) -> Cond
    where
        I: IntoIterator<Item = Cond>,
    {
        Cond::or(conds)
    }

    pub fn true_() -> Cond {
        Cond::fixed(true)
    }

    pub fn false_() -> Cond {
        Cond::fixed(false)
    }
}

#[derive(Clone, Debug)]
pub struct FieldCondBuilder {
    rec_key: String,
}

impl FieldCondBuilder {
    fn build(&self, cond_type: CondType, operand: Operand) -> Result<Cond, CondError> {
        make(cond_type, vec![Operand::from(self.rec_key.as_str()), operand])
    }

    pub fn eq(&self, value: impl Into<Value>) -> Result<Cond, CondError> {
        self.build(CondType::Equal, Operand::Value(value.into()))
    }

    /// Inequality has no condition of its own; negate an equality test instead.
    pub fn ne(&self, _value: impl Into<Value>) -> Result<Cond, CondError> {
        Err(CondError::NotEqualUnsupported)
    }

    pub fn gt(&self, value: impl Into<Value>) -> Result<Cond, CondError> {
        self.build(CondType::Greater, Operand::Value(value.into()))
    }

    pub fn ge(&self, value: impl Into<Value>) -> Result<Cond, CondError> {
        self.build(CondType::GreaterOrEqual, Operand::Value(value.into()))
    }

    pub fn lt(&self, value: impl Into<Value>) -> Result<Cond, CondError> {
        self.build(CondType::Less, Operand::Value(value.into()))
    }

    pub fn le(&self, value: impl Into<Value>) -> Result<Cond, CondError> {
        self.build(CondType::LessOrEqual, Operand::Value(value.into()))
    }

    /// Equal to any of `values`. No values at all gives `FALSE`.
    pub fn eq_any<I, V>(&self, values: I) -> Result<Cond, CondError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut operands = vec![Operand::from(self.rec_key.as_str())];
        operands.extend(values.into_iter().map(|value| Operand::Value(value.into())));
        make(CondType::Equal, operands)
    }

    pub fn is_in<I, V>(&self, values: I) -> Result<Cond, CondError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Cond::is_in(&self.rec_key, values)
    }

    pub fn between(
        &self,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<Cond, CondError> {
        Cond::between(&self.rec_key, min, max)
    }

    pub fn contains_substring(&self, substring: impl Into<String>) -> Result<Cond, CondError> {
        self.build(
            CondType::ContainsSubstring,
            Operand::Value(Value::String(substring.into())),
        )
    }

    pub fn is_true(&self) -> Result<Cond, CondError> {
        Cond::is_true(&self.rec_key)
    }

    pub fn is_null(&self) -> Result<Cond, CondError> {
        Cond::is_null(&self.rec_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_build_comparisons() {
        let asn = CondBuilder::field("asn");

        assert_eq!(Cond::equal("asn", 1).unwrap(), asn.eq(1).unwrap());
        assert_eq!(Cond::greater("asn", 1).unwrap(), asn.gt(1).unwrap());
        assert_eq!(Cond::greater_or_equal("asn", 1).unwrap(), asn.ge(1).unwrap());
        assert_eq!(Cond::less("asn", 1).unwrap(), asn.lt(1).unwrap());
        assert_eq!(Cond::less_or_equal("asn", 1).unwrap(), asn.le(1).unwrap());
    }

    #[test]
    fn can_build_membership_and_range_tests() {
        let asn = CondBuilder::field("asn");

        assert_eq!(
            Cond::is_in("asn", [1, 2]).unwrap(),
            asn.is_in([1, 2, 1]).unwrap()
        );
        assert_eq!(Cond::equal("asn", 1).unwrap(), asn.is_in([1]).unwrap());
        assert_eq!(Cond::between("asn", 1, 5).unwrap(), asn.between(1, 5).unwrap());
    }

    #[test]
    fn can_build_tests_without_operands() {
        assert_eq!(
            Cond::is_true("ignored").unwrap(),
            CondBuilder::field("ignored").is_true().unwrap()
        );
        assert_eq!(
            Cond::is_null("fqdn").unwrap(),
            CondBuilder::field("fqdn").is_null().unwrap()
        );
        assert_eq!(
            Cond::contains_substring("url", "://").unwrap(),
            CondBuilder::field("url").contains_substring("://").unwrap()
        );
    }

    #[test]
    fn can_combine_equalities_on_several_values() {
        let cc = CondBuilder::field("cc");

        assert_eq!(
            Cond::or([
                Cond::equal("cc", "PL").unwrap(),
                Cond::equal("cc", "DE").unwrap(),
            ]),
            cc.eq_any(["PL", "DE"]).unwrap()
        );
        assert_eq!(Cond::fixed(false), cc.eq_any(Vec::<Value>::new()).unwrap());
    }

    #[test]
    fn can_build_compounds() {
        let a = CondBuilder::field("a").is_true().unwrap();
        let b = CondBuilder::field("b").is_null().unwrap();

        assert_eq!(
            Cond::and([a.clone(), Cond::not(b.clone())]),
            CondBuilder::and([a.clone(), CondBuilder::not(b.clone())])
        );
        assert_eq!(a, CondBuilder::or([a.clone(), CondBuilder::false_()]));
        assert_eq!(CondBuilder::true_(), CondBuilder::and(Vec::new()));
        assert_eq!(CondBuilder::false_(), CondBuilder::or(Vec::new()));
    }

    #[test]
    fn return_an_error_on_inequality() {
        assert_eq!(
            Err(CondError::NotEqualUnsupported),
            CondBuilder::field("asn").ne(1)
        );
    }

    #[test]
    fn return_an_error_on_non_ascii_keys() {
        assert!(matches!(
            CondBuilder::field("łódź").eq(1),
            Err(CondError::NonAsciiRecKey(_))
        ));
    }
}
