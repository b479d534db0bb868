//! The payload contract for entities stored in a genealogy

use std::fmt;

/// A value that can be reconstructed from its identifier.
///
/// The genealogy stores identifiers only. Whenever a caller asks for a full
/// value (through `lookup` or a children iterator) the value is rebuilt with
/// [`Entity::from_id`] and kept in the genealogy's materialization cache.
pub trait Entity: Sized {
    /// Immutable, totally ordered key naming one entity.
    type Id: Ord + Clone + fmt::Debug;

    /// Failure raised while building a value. Use
    /// [`std::convert::Infallible`] when construction cannot fail.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the value named by `id`.
    fn from_id(id: &Self::Id) -> Result<Self, Self::Error>;

    /// The identifier this value was built from.
    fn id(&self) -> &Self::Id;
}
