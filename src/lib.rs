//! An algebra of data-selection conditions.
//!
//! Conditions are immutable trees built through [`CondBuilder`] (or the [`make`] factory) and
//! normalized as they are built. They can be rewritten by [`Transformer`] passes such as
//! [`FactoringTransformer`], [`EqualityMergingTransformer`] and [`DeMorganTransformer`], then
//! compiled by a [`Visitor`] into a [`Predicate`] over records or rendered as a query string.
mod builder;
mod cond;
mod de_morgan;
mod equality_merging;
mod error;
mod events;
mod factoring;
mod factory;
mod ordered_set;
mod predicates;
mod render;
mod values;
mod visitor;


pub use crate::{
    builder::{CondBuilder, FieldCondBuilder},
    cond::{
        CompoundMultiCond, Cond, CondKind, CondType, CustomCond, CustomRef, FixedCond, Junction,
        NotCond, OpParam, RecItemCond, RecItemParamCond,
    },
    de_morgan::DeMorganTransformer,
    equality_merging::EqualityMergingTransformer,
    error::{CondError, EvaluationError, VisitError},
    events::{EventRecord, FieldValue, RecordLayout, RecordView},
    factoring::FactoringTransformer,
    factory::{make, Operand},
    ordered_set::OrderedSet,
    predicates::{Predicate, PredicateCompiler},
    render::CondRenderer,
    values::Value,
    visitor::{Transformer, VisitResult, Visitor},
};
