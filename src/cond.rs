use crate::{error::CondError, ordered_set::OrderedSet, values::Value};
use std::{
    any::Any,
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, OnceLock},
};

/// An immutable selection condition.
///
/// A `Cond` is a cheap handle onto a shared node: cloning it never copies the tree. The only
/// ways to obtain one are the smart constructors below, [`crate::make`] and the builder, all
/// of which normalize their arguments first, so a `Cond` may well come back as a different
/// variant than the one asked for (`AND` of a single operand is that operand, and so on).
///
/// Two conditions are equal when they are the same variant built from equal normalized
/// arguments. Equality is structural: `x >= 3` and `x == 3 OR x > 3` are different conditions.
#[derive(Clone)]
pub struct Cond(Arc<CondNode>);

struct CondNode {
    kind: CondKind,
    hash: OnceLock<u64>,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CondKind {
    Not(NotCond),
    And(CompoundMultiCond),
    Or(CompoundMultiCond),
    Equal(RecItemParamCond<Value>),
    Greater(RecItemParamCond<Value>),
    GreaterOrEqual(RecItemParamCond<Value>),
    Less(RecItemParamCond<Value>),
    LessOrEqual(RecItemParamCond<Value>),
    In(RecItemParamCond<OrderedSet<Value>>),
    Between(RecItemParamCond<(Value, Value)>),
    ContainsSubstring(RecItemParamCond<String>),
    IsTrue(RecItemCond),
    IsNull(RecItemCond),
    Fixed(FixedCond),
    Custom(CustomRef),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CondType {
    Not,
    And,
    Or,
    Equal,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    In,
    Between,
    ContainsSubstring,
    IsTrue,
    IsNull,
    Fixed,
}

impl CondType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Not => "NotCond",
            Self::And => "AndCond",
            Self::Or => "OrCond",
            Self::Equal => "EqualCond",
            Self::Greater => "GreaterCond",
            Self::GreaterOrEqual => "GreaterOrEqualCond",
            Self::Less => "LessCond",
            Self::LessOrEqual => "LessOrEqualCond",
            Self::In => "InCond",
            Self::Between => "BetweenCond",
            Self::ContainsSubstring => "ContainsSubstringCond",
            Self::IsTrue => "IsTrueCond",
            Self::IsNull => "IsNullCond",
            Self::Fixed => "FixedCond",
        }
    }

    pub fn is_rec_item(self) -> bool {
        matches!(self, Self::IsTrue | Self::IsNull) || self.is_rec_item_param()
    }

    pub fn is_rec_item_param(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::Greater
                | Self::GreaterOrEqual
                | Self::Less
                | Self::LessOrEqual
                | Self::In
                | Self::Between
                | Self::ContainsSubstring
        )
    }

    /// Whether a single construction call may carry several operands, which are then OR-ed.
    pub fn accepts_multiple_op_params(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::Greater
                | Self::GreaterOrEqual
                | Self::Less
                | Self::LessOrEqual
                | Self::ContainsSubstring
        )
    }
}

impl fmt::Display for CondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NotCond {
    subcond: Cond,
}

impl NotCond {
    pub fn subcond(&self) -> &Cond {
        &self.subcond
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CompoundMultiCond {
    subconditions: OrderedSet<Cond>,
}

impl CompoundMultiCond {
    pub fn subconditions(&self) -> &OrderedSet<Cond> {
        &self.subconditions
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecItemCond {
    rec_key: String,
}

impl RecItemCond {
    pub fn rec_key(&self) -> &str {
        &self.rec_key
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecItemParamCond<P> {
    rec_key: String,
    op_param: P,
}

impl<P> RecItemParamCond<P> {
    pub fn rec_key(&self) -> &str {
        &self.rec_key
    }

    pub fn op_param(&self) -> &P {
        &self.op_param
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedCond {
    truthness: bool,
}

impl FixedCond {
    pub fn truthness(&self) -> bool {
        self.truthness
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum OpParam<'a> {
    Value(&'a Value),
    Set(&'a OrderedSet<Value>),
    Range(&'a Value, &'a Value),
    Substring(&'a str),
}

/// A condition variant defined outside this crate.
///
/// Visitors get such conditions through [`crate::Visitor::visit_custom`]; one that does not
/// override it fails with [`crate::VisitError::NoHandler`].
pub trait CustomCond: fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn variant_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn eq_custom(&self, other: &dyn CustomCond) -> bool;

    fn hash_custom(&self, state: &mut dyn Hasher);
}

#[derive(Clone)]
pub struct CustomRef(Arc<dyn CustomCond>);

impl CustomRef {
    pub fn get(&self) -> &dyn CustomCond {
        self.0.as_ref()
    }
}

impl PartialEq for CustomRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.variant_name() == other.0.variant_name() && self.0.eq_custom(other.0.as_ref())
    }
}

impl Eq for CustomRef {}

impl Hash for CustomRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.variant_name().hash(state);
        self.0.hash_custom(state);
    }
}

/// The two flavours of multi-operand compound: `AND` and `OR`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Junction {
    And,
    Or,
}

impl Junction {
    /// Truthness of the `FixedCond` that leaves the junction unchanged.
    pub fn neutral(self) -> bool {
        matches!(self, Self::And)
    }

    /// Truthness of the `FixedCond` that forces the junction's result.
    pub fn absorbing(self) -> bool {
        !self.neutral()
    }

    pub fn dual(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }

    pub fn of(cond: &Cond) -> Option<(Self, &OrderedSet<Cond>)> {
        match cond.kind() {
            CondKind::And(compound) => Some((Self::And, &compound.subconditions)),
            CondKind::Or(compound) => Some((Self::Or, &compound.subconditions)),
            _ => None,
        }
    }

    fn subconditions_of(self, cond: &Cond) -> Option<&OrderedSet<Cond>> {
        match Self::of(cond) {
            Some((junction, subconditions)) if junction == self => Some(subconditions),
            _ => None,
        }
    }

    /// Builds the junction of `operands`, reducing it as far as the algebra allows.
    pub fn make<I>(self, operands: I) -> Cond
    where
        I: IntoIterator<Item = Cond>,
    {
        let neutral = self.neutral();
        let mut subconditions = OrderedSet::new();
        for operand in operands {
            if let CondKind::Fixed(fixed) = operand.kind() {
                if fixed.truthness == neutral {
                    continue;
                }
            }
            if let Some(nested) = self.subconditions_of(&operand) {
                subconditions.extend(nested.iter().cloned());
                continue;
            }
            subconditions.insert(operand);
        }

        if subconditions.is_empty() {
            return Cond::fixed(neutral);
        }
        if subconditions.len() == 1 {
            if let Some(only) = subconditions.first() {
                return only.clone();
            }
        }
        let absorbing = Cond::fixed(self.absorbing());
        if subconditions.contains(&absorbing) {
            return absorbing;
        }
        let has_complement = subconditions
            .iter()
            .any(|subcond| subconditions.contains(&Cond::not(subcond.clone())));
        if has_complement {
            return absorbing;
        }

        let compound = CompoundMultiCond { subconditions };
        Cond::from_kind(match self {
            Self::And => CondKind::And(compound),
            Self::Or => CondKind::Or(compound),
        })
    }
}

static ALWAYS_TRUE: OnceLock<Cond> = OnceLock::new();
static ALWAYS_FALSE: OnceLock<Cond> = OnceLock::new();

impl Cond {
    fn from_kind(kind: CondKind) -> Self {
        Self(Arc::new(CondNode {
            kind,
            hash: OnceLock::new(),
        }))
    }

    pub fn fixed(truthness: bool) -> Self {
        let sentinel = if truthness {
            &ALWAYS_TRUE
        } else {
            &ALWAYS_FALSE
        };
        sentinel
            .get_or_init(|| Self::from_kind(CondKind::Fixed(FixedCond { truthness })))
            .clone()
    }

    pub fn not(operand: Cond) -> Self {
        match operand.kind() {
            CondKind::Fixed(fixed) => Self::fixed(!fixed.truthness),
            // Operands are already normalized, so there is never more than one level to strip.
            CondKind::Not(not) => not.subcond.clone(),
            _ => Self::from_kind(CondKind::Not(NotCond { subcond: operand })),
        }
    }

    pub fn and<I>(operands: I) -> Self
    where
        I: IntoIterator<Item = Cond>,
    {
        Junction::And.make(operands)
    }

    pub fn or<I>(operands: I) -> Self
    where
        I: IntoIterator<Item = Cond>,
    {
        Junction::Or.make(operands)
    }

    pub fn equal(rec_key: &str, op_param: impl Into<Value>) -> Result<Self, CondError> {
        Self::compare(CondType::Equal, rec_key, op_param.into())
    }

    pub fn greater(rec_key: &str, op_param: impl Into<Value>) -> Result<Self, CondError> {
        Self::compare(CondType::Greater, rec_key, op_param.into())
    }

    pub fn greater_or_equal(rec_key: &str, op_param: impl Into<Value>) -> Result<Self, CondError> {
        Self::compare(CondType::GreaterOrEqual, rec_key, op_param.into())
    }

    pub fn less(rec_key: &str, op_param: impl Into<Value>) -> Result<Self, CondError> {
        Self::compare(CondType::Less, rec_key, op_param.into())
    }

    pub fn less_or_equal(rec_key: &str, op_param: impl Into<Value>) -> Result<Self, CondError> {
        Self::compare(CondType::LessOrEqual, rec_key, op_param.into())
    }

    pub(crate) fn compare(
        cond_type: CondType,
        rec_key: &str,
        op_param: Value,
    ) -> Result<Self, CondError> {
        let item = RecItemParamCond {
            rec_key: validate_rec_key(rec_key)?,
            op_param,
        };
        let kind = match cond_type {
            CondType::Equal => CondKind::Equal(item),
            CondType::Greater => CondKind::Greater(item),
            CondType::GreaterOrEqual => CondKind::GreaterOrEqual(item),
            CondType::Less => CondKind::Less(item),
            CondType::LessOrEqual => CondKind::LessOrEqual(item),
            other => {
                return Err(CondError::InvalidOperand {
                    variant: other.name(),
                    reason: "not a scalar comparison".to_string(),
                })
            }
        };
        Ok(Self::from_kind(kind))
    }

    /// An empty collection gives `FALSE` and a single member gives the equivalent `EqualCond`.
    pub fn is_in<I, V>(rec_key: &str, values: I) -> Result<Self, CondError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let rec_key = validate_rec_key(rec_key)?;
        let op_param: OrderedSet<Value> = values.into_iter().map(Into::into).collect();
        match op_param.len() {
            0 => Ok(Self::fixed(false)),
            1 => match op_param.into_iter().next() {
                Some(only) => Self::equal(&rec_key, only),
                None => Ok(Self::fixed(false)),
            },
            _ => Ok(Self::from_kind(CondKind::In(RecItemParamCond {
                rec_key,
                op_param,
            }))),
        }
    }

    /// The bounds are kept in the given order: `between(k, a, b)` differs from `between(k, b, a)`.
    pub fn between(
        rec_key: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<Self, CondError> {
        Ok(Self::from_kind(CondKind::Between(RecItemParamCond {
            rec_key: validate_rec_key(rec_key)?,
            op_param: (min.into(), max.into()),
        })))
    }

    pub fn contains_substring(
        rec_key: &str,
        substring: impl Into<String>,
    ) -> Result<Self, CondError> {
        Ok(Self::from_kind(CondKind::ContainsSubstring(
            RecItemParamCond {
                rec_key: validate_rec_key(rec_key)?,
                op_param: substring.into(),
            },
        )))
    }

    pub fn is_true(rec_key: &str) -> Result<Self, CondError> {
        Ok(Self::from_kind(CondKind::IsTrue(RecItemCond {
            rec_key: validate_rec_key(rec_key)?,
        })))
    }

    pub fn is_null(rec_key: &str) -> Result<Self, CondError> {
        Ok(Self::from_kind(CondKind::IsNull(RecItemCond {
            rec_key: validate_rec_key(rec_key)?,
        })))
    }

    pub fn custom(cond: impl CustomCond) -> Self {
        Self::from_kind(CondKind::Custom(CustomRef(Arc::new(cond))))
    }

    #[inline]
    pub fn kind(&self) -> &CondKind {
        &self.0.kind
    }

    pub fn cond_type(&self) -> Option<CondType> {
        let cond_type = match self.kind() {
            CondKind::Not(_) => CondType::Not,
            CondKind::And(_) => CondType::And,
            CondKind::Or(_) => CondType::Or,
            CondKind::Equal(_) => CondType::Equal,
            CondKind::Greater(_) => CondType::Greater,
            CondKind::GreaterOrEqual(_) => CondType::GreaterOrEqual,
            CondKind::Less(_) => CondType::Less,
            CondKind::LessOrEqual(_) => CondType::LessOrEqual,
            CondKind::In(_) => CondType::In,
            CondKind::Between(_) => CondType::Between,
            CondKind::ContainsSubstring(_) => CondType::ContainsSubstring,
            CondKind::IsTrue(_) => CondType::IsTrue,
            CondKind::IsNull(_) => CondType::IsNull,
            CondKind::Fixed(_) => CondType::Fixed,
            CondKind::Custom(_) => return None,
        };
        Some(cond_type)
    }

    pub fn variant_name(&self) -> &'static str {
        match self.kind() {
            CondKind::Custom(custom) => custom.0.variant_name(),
            _ => self.cond_type().map_or("Cond", CondType::name),
        }
    }

    pub fn rec_key(&self) -> Option<&str> {
        match self.kind() {
            CondKind::Equal(c)
            | CondKind::Greater(c)
            | CondKind::GreaterOrEqual(c)
            | CondKind::Less(c)
            | CondKind::LessOrEqual(c) => Some(&c.rec_key),
            CondKind::In(c) => Some(&c.rec_key),
            CondKind::Between(c) => Some(&c.rec_key),
            CondKind::ContainsSubstring(c) => Some(&c.rec_key),
            CondKind::IsTrue(c) | CondKind::IsNull(c) => Some(&c.rec_key),
            _ => None,
        }
    }

    pub fn op_param(&self) -> Option<OpParam<'_>> {
        match self.kind() {
            CondKind::Equal(c)
            | CondKind::Greater(c)
            | CondKind::GreaterOrEqual(c)
            | CondKind::Less(c)
            | CondKind::LessOrEqual(c) => Some(OpParam::Value(&c.op_param)),
            CondKind::In(c) => Some(OpParam::Set(&c.op_param)),
            CondKind::Between(c) => Some(OpParam::Range(&c.op_param.0, &c.op_param.1)),
            CondKind::ContainsSubstring(c) => Some(OpParam::Substring(&c.op_param)),
            _ => None,
        }
    }

    pub fn subconditions(&self) -> Option<&OrderedSet<Cond>> {
        Junction::of(self).map(|(_, subconditions)| subconditions)
    }

    pub fn subcond(&self) -> Option<&Cond> {
        match self.kind() {
            CondKind::Not(not) => Some(&not.subcond),
            _ => None,
        }
    }

    pub fn truthness(&self) -> Option<bool> {
        match self.kind() {
            CondKind::Fixed(fixed) => Some(fixed.truthness),
            _ => None,
        }
    }

    fn memo_hash(&self) -> u64 {
        *self.0.hash.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.0.kind.hash(&mut hasher);
            hasher.finish()
        })
    }
}

fn validate_rec_key(rec_key: &str) -> Result<String, CondError> {
    if rec_key.is_ascii() {
        Ok(rec_key.to_owned())
    } else {
        Err(CondError::NonAsciiRecKey(rec_key.to_owned()))
    }
}

impl PartialEq for Cond {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.memo_hash() == other.memo_hash() && self.0.kind == other.0.kind)
    }
}

impl Eq for Cond {}

impl Hash for Cond {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.memo_hash());
    }
}

impl fmt::Debug for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.variant_name();
        match self.kind() {
            CondKind::Not(not) => f.debug_tuple(name).field(&not.subcond).finish(),
            CondKind::And(compound) | CondKind::Or(compound) => {
                let mut tuple = f.debug_tuple(name);
                for subcond in &compound.subconditions {
                    tuple.field(subcond);
                }
                tuple.finish()
            }
            CondKind::Equal(c)
            | CondKind::Greater(c)
            | CondKind::GreaterOrEqual(c)
            | CondKind::Less(c)
            | CondKind::LessOrEqual(c) => f
                .debug_tuple(name)
                .field(&c.rec_key)
                .field(&c.op_param)
                .finish(),
            CondKind::In(c) => f
                .debug_tuple(name)
                .field(&c.rec_key)
                .field(&c.op_param)
                .finish(),
            CondKind::Between(c) => f
                .debug_tuple(name)
                .field(&c.rec_key)
                .field(&c.op_param)
                .finish(),
            CondKind::ContainsSubstring(c) => f
                .debug_tuple(name)
                .field(&c.rec_key)
                .field(&c.op_param)
                .finish(),
            CondKind::IsTrue(c) | CondKind::IsNull(c) => {
                f.debug_tuple(name).field(&c.rec_key).finish()
            }
            CondKind::Fixed(fixed) => f.debug_tuple(name).field(&fixed.truthness).finish(),
            CondKind::Custom(custom) => fmt::Debug::fmt(custom.get(), f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(key: &str, value: i64) -> Cond {
        Cond::equal(key, value).unwrap()
    }

    #[derive(Debug, PartialEq, Hash)]
    struct Tagged(&'static str);

    impl fmt::Display for Tagged {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "tagged({})", self.0)
        }
    }

    impl CustomCond for Tagged {
        fn variant_name(&self) -> &'static str {
            "TaggedCond"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn eq_custom(&self, other: &dyn CustomCond) -> bool {
            other.as_any().downcast_ref::<Self>() == Some(self)
        }

        fn hash_custom(&self, mut state: &mut dyn Hasher) {
            self.0.hash(&mut state);
        }
    }

    #[test]
    fn can_compare_conditions_structurally() {
        assert_eq!(eq("asn", 1), eq("asn", 1));
        assert_ne!(eq("asn", 1), eq("asn", 2));
        assert_ne!(eq("asn", 1), eq("cc", 1));
        assert_ne!(
            Cond::greater_or_equal("asn", 3).unwrap(),
            Cond::or([eq("asn", 3), Cond::greater("asn", 3).unwrap()])
        );
    }

    #[test]
    fn can_reduce_an_empty_and_to_true() {
        assert_eq!(Cond::fixed(true), Cond::and([]));
        assert_eq!(Cond::fixed(false), Cond::or([]));
    }

    #[test]
    fn can_unwrap_a_single_operand() {
        assert_eq!(eq("a", 1), Cond::and([eq("a", 1)]));
        assert_eq!(eq("a", 1), Cond::or([eq("a", 1), eq("a", 1)]));
    }

    #[test]
    fn can_drop_the_neutral_element() {
        assert_eq!(eq("a", 1), Cond::and([eq("a", 1), Cond::fixed(true)]));
        assert_eq!(eq("a", 1), Cond::or([Cond::fixed(false), eq("a", 1)]));
    }

    #[test]
    fn can_reduce_to_the_absorbing_element() {
        assert_eq!(
            Cond::fixed(false),
            Cond::and([eq("a", 1), Cond::fixed(false), eq("b", 2)])
        );
        assert_eq!(
            Cond::fixed(true),
            Cond::or([eq("a", 1), Cond::fixed(true), eq("b", 2)])
        );
    }

    #[test]
    fn can_flatten_nested_junctions_of_the_same_kind() {
        let nested = Cond::and([Cond::and([eq("a", 1), eq("b", 2)]), eq("c", 3)]);

        assert_eq!(Cond::and([eq("a", 1), eq("b", 2), eq("c", 3)]), nested);
        assert_eq!(3, nested.subconditions().unwrap().len());
    }

    #[test]
    fn can_keep_nested_junctions_of_the_other_kind() {
        let inner = Cond::or([eq("a", 1), eq("b", 2)]);
        let outer = Cond::and([inner.clone(), eq("c", 3)]);

        assert!(outer.subconditions().unwrap().contains(&inner));
    }

    #[test]
    fn can_ignore_operand_order() {
        assert_eq!(
            Cond::and([eq("a", 1), eq("b", 2)]),
            Cond::and([eq("b", 2), eq("a", 1)])
        );
    }

    #[test]
    fn can_detect_complements() {
        let x = eq("a", 1);

        assert_eq!(
            Cond::fixed(false),
            Cond::and([x.clone(), eq("b", 2), Cond::not(x.clone())])
        );
        assert_eq!(Cond::fixed(true), Cond::or([Cond::not(x.clone()), x]));
    }

    #[test]
    fn can_eliminate_double_negations() {
        let x = Cond::and([eq("a", 1), eq("b", 2)]);

        assert_eq!(x, Cond::not(Cond::not(x.clone())));
        assert_eq!(
            Cond::not(x.clone()),
            Cond::not(Cond::not(Cond::not(x)))
        );
    }

    #[test]
    fn can_negate_fixed_conditions() {
        assert_eq!(Cond::fixed(false), Cond::not(Cond::fixed(true)));
        assert_eq!(Cond::fixed(true), Cond::not(Cond::fixed(false)));
    }

    #[test]
    fn can_reduce_in_conditions() {
        assert_eq!(
            Cond::fixed(false),
            Cond::is_in("asn", Vec::<i64>::new()).unwrap()
        );
        assert_eq!(eq("asn", 7), Cond::is_in("asn", [7, 7]).unwrap());
        assert_eq!(
            Cond::is_in("asn", [1, 2, 3]).unwrap(),
            Cond::is_in("asn", [3, 1, 2, 1]).unwrap()
        );
    }

    #[test]
    fn can_keep_between_bounds_in_order() {
        assert_ne!(
            Cond::between("asn", 1, 5).unwrap(),
            Cond::between("asn", 5, 1).unwrap()
        );
    }

    #[test]
    fn return_an_error_on_non_ascii_rec_keys() {
        assert_eq!(
            Err(CondError::NonAsciiRecKey("ąsn".to_string())),
            Cond::is_null("ąsn")
        );
    }

    #[test]
    fn can_accept_an_empty_rec_key() {
        assert_eq!(Some(""), Cond::is_true("").unwrap().rec_key());
    }

    #[test]
    fn can_expose_constructor_arguments() {
        let between = Cond::between("asn", 1, 5).unwrap();
        let not = Cond::not(eq("a", 1));

        assert_eq!(Some("asn"), between.rec_key());
        assert_eq!(
            Some(OpParam::Range(&Value::from(1), &Value::from(5))),
            between.op_param()
        );
        assert_eq!(Some(&eq("a", 1)), not.subcond());
        assert_eq!(Some(true), Cond::fixed(true).truthness());
        assert_eq!(None, not.truthness());
    }

    #[test]
    fn can_compare_custom_conditions() {
        assert_eq!(Cond::custom(Tagged("x")), Cond::custom(Tagged("x")));
        assert_ne!(Cond::custom(Tagged("x")), Cond::custom(Tagged("y")));
        assert_eq!("TaggedCond", Cond::custom(Tagged("x")).variant_name());
        assert_eq!(None, Cond::custom(Tagged("x")).cond_type());
    }

    #[test]
    fn can_format_conditions_in_constructor_form() {
        let cond = Cond::and([eq("asn", 42), Cond::contains_substring("url", "://").unwrap()]);

        assert_eq!(
            r#"AndCond(EqualCond("asn", 42), ContainsSubstringCond("url", "://"))"#,
            format!("{cond:?}")
        );
    }

    #[test]
    fn can_tell_record_item_categories_apart() {
        assert!(CondType::Between.is_rec_item_param());
        assert!(CondType::Between.is_rec_item());
        assert!(!CondType::IsNull.is_rec_item_param());
        assert!(CondType::IsNull.is_rec_item());
        assert!(!CondType::Not.is_rec_item());
        assert!(!CondType::Fixed.is_rec_item());
    }
}
