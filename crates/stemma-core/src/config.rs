//! Behaviour switches for a genealogy

use serde::{Deserialize, Serialize};

/// How `connect` treats links that could close a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Refuse a link when the parent is already reachable from the child.
    #[default]
    RejectCycles,
    /// Accept any link between existing entities. The caller guarantees the
    /// parent is not a descendant of the child.
    Trust,
}

/// How a multi-parent creation with no parents is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyParentsPolicy {
    /// Fail with `EmptyParentList`.
    #[default]
    Reject,
    /// Return without creating anything.
    Ignore,
}

/// Genealogy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenealogyConfig {
    pub link_policy: LinkPolicy,
    pub empty_parents: EmptyParentsPolicy,
}

impl GenealogyConfig {
    /// The permissive configuration: no cycle check on links and silent
    /// no-op on empty parent lists.
    pub fn permissive() -> Self {
        Self {
            link_policy: LinkPolicy::Trust,
            empty_parents: EmptyParentsPolicy::Ignore,
        }
    }

    pub fn with_link_policy(mut self, link_policy: LinkPolicy) -> Self {
        self.link_policy = link_policy;
        self
    }

    pub fn with_empty_parents(mut self, empty_parents: EmptyParentsPolicy) -> Self {
        self.empty_parents = empty_parents;
        self
    }
}
