//! Stemma Core — transactional genealogy DAG, materialization cache, and child views

pub mod cache;
pub mod children;
pub mod config;
pub mod entity;
pub mod error;
pub mod genealogy;
mod store;


#[cfg(test)]
pub mod test_utils;

pub use cache::MaterializationCache;
pub use children::{ChildCursor, Children};
pub use config::{EmptyParentsPolicy, GenealogyConfig, LinkPolicy};
pub use entity::Entity;
pub use error::{GenealogyError, GenealogyResult};
pub use genealogy::Genealogy;
