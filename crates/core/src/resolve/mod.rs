//! Format-independent schema normalization: reference index, classifier and
//! the type-descriptor resolver.
//!
//! Both loaders feed their declarations through the same three stages:
//! 1. [`RefIndex`]: schema pointer -> declared name and body
//! 2. [`Classification`]: declared name -> exactly one [`Category`]
//! 3. [`Resolver`]: field annotation -> [`crate::model::TypeDescriptor`]

mod classify;
mod ref_index;
mod resolver;

pub use classify::Classification;
pub use ref_index::RefIndex;
pub use resolver::{Context, FieldAnnotation, Resolver, ScalarTable};

/// Disjoint categories every named declaration falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Object,
    Input,
    Enum,
    Union,
    Scalar,
}

/// A declaration body that can tell which category it belongs to.
pub trait DeclarationBody {
    fn category(&self) -> Category;
}
