//! Genealogy error types.

use thiserror::Error;

/// Errors raised by genealogy operations.
///
/// Every error is returned before the live structure changes, so a caller
/// can always recover and keep using the genealogy.
#[derive(Debug, Error)]
pub enum GenealogyError<Id> {
    /// The identifier does not name any entity.
    #[error("entity {0:?} not found")]
    NotFound(Id),

    /// An entity with this identifier already exists.
    #[error("entity {0:?} already exists")]
    AlreadyExists(Id),

    /// The stem is permanent.
    #[error("entity {0:?} is the stem and cannot be removed")]
    RemoveStemForbidden(Id),

    /// A multi-parent creation named no parents.
    #[error("entity {0:?} cannot be created without parents")]
    EmptyParentList(Id),

    /// Linking `child` beneath `parent` would close a cycle.
    #[error("linking {child:?} beneath {parent:?} would create a cycle")]
    WouldCreateCycle { child: Id, parent: Id },

    /// Building the payload value for an identifier failed.
    #[error("failed to materialize entity {id:?}")]
    Materialize {
        id: Id,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl<Id> GenealogyError<Id> {
    pub fn materialize(
        id: Id,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Materialize {
            id,
            source: Box::new(source),
        }
    }

    /// The identifier the error is about. For cycle errors this is the child.
    pub fn id(&self) -> &Id {
        match self {
            Self::NotFound(id)
            | Self::AlreadyExists(id)
            | Self::RemoveStemForbidden(id)
            | Self::EmptyParentList(id)
            | Self::Materialize { id, .. } => id,
            Self::WouldCreateCycle { child, .. } => child,
        }
    }
}

/// Result type for genealogy operations.
pub type GenealogyResult<T, Id> = Result<T, GenealogyError<Id>>;
