//! Test entities and fixtures for Stemma

use crate::entity::Entity;
use crate::genealogy::Genealogy;
use std::cell::Cell;
use std::cmp::Ordering;
use std::convert::Infallible;

/// String-keyed entity that always materializes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strain {
    pub id: String,
    pub label: String,
}

impl Entity for Strain {
    type Id = String;
    type Error = Infallible;

    fn from_id(id: &String) -> Result<Self, Infallible> {
        Ok(Strain {
            id: id.clone(),
            label: format!("strain {id}"),
        })
    }

    fn id(&self) -> &String {
        &self.id
    }
}

/// Entity whose construction fails for negative identifiers.
#[derive(Debug)]
pub struct Fragile {
    pub id: i32,
}

#[derive(Debug, thiserror::Error)]
#[error("negative identifier {0}")]
pub struct NegativeId(pub i32);

impl Entity for Fragile {
    type Id = i32;
    type Error = NegativeId;

    fn from_id(id: &i32) -> Result<Self, NegativeId> {
        if *id < 0 {
            return Err(NegativeId(*id));
        }
        Ok(Fragile { id: *id })
    }

    fn id(&self) -> &i32 {
        &self.id
    }
}

thread_local! {
    static COMPARE_BUDGET: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Allow `n` more comparisons of [`Touchy`] identifiers, then panic on the
/// next one.
pub fn arm_compare_budget(n: usize) {
    COMPARE_BUDGET.with(|budget| budget.set(Some(n)));
}

pub fn disarm_compare_budget() {
    COMPARE_BUDGET.with(|budget| budget.set(None));
}

/// Identifier whose `Ord` panics once the armed comparison budget runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Touchy(pub u32);

impl Ord for Touchy {
    fn cmp(&self, other: &Self) -> Ordering {
        COMPARE_BUDGET.with(|budget| match budget.get() {
            Some(0) => {
                budget.set(None);
                panic!("comparison budget exhausted");
            }
            Some(n) => budget.set(Some(n - 1)),
            None => {}
        });
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Touchy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
pub struct Probe {
    pub id: Touchy,
}

impl Entity for Probe {
    type Id = Touchy;
    type Error = Infallible;

    fn from_id(id: &Touchy) -> Result<Self, Infallible> {
        Ok(Probe { id: id.clone() })
    }

    fn id(&self) -> &Touchy {
        &self.id
    }
}

/// Shape of a genealogy as `(id, parents, children)` rows, ascending.
pub fn shape<E: Entity>(genealogy: &Genealogy<E>) -> Vec<(E::Id, Vec<E::Id>, Vec<E::Id>)> {
    genealogy
        .ids()
        .map(|id| {
            (
                id.clone(),
                genealogy.get_parents(id).unwrap(),
                genealogy.get_children(id).unwrap(),
            )
        })
        .collect()
}

pub fn s(id: &str) -> String {
    id.to_string()
}

/// Stem "S" with children "A" and "B", and "C" beneath both.
pub fn diamond() -> Genealogy<Strain> {
    let mut genealogy = Genealogy::new(s("S"));
    genealogy.create(s("A"), &s("S")).unwrap();
    genealogy.create(s("B"), &s("S")).unwrap();
    genealogy.create_with_parents(s("C"), &[s("A"), s("B")]).unwrap();
    genealogy
}

/// Numbered genealogy over `Touchy` ids:
/// 0 → {1, 2}, 1 → {3, 4}, 2 → {4, 5}, 3 → {6}, 4 → {6, 7}.
pub fn probe_lattice() -> Genealogy<Probe> {
    let mut genealogy = Genealogy::new(Touchy(0));
    let links = [
        (1, vec![0]),
        (2, vec![0]),
        (3, vec![1]),
        (4, vec![1, 2]),
        (5, vec![2]),
        (6, vec![3, 4]),
        (7, vec![4]),
    ];
    for (id, parents) in links {
        let parents: Vec<Touchy> = parents.into_iter().map(Touchy).collect();
        genealogy.create_with_parents(Touchy(id), &parents).unwrap();
    }
    genealogy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diamond_fixture() {
        let genealogy = diamond();
        assert_eq!(genealogy.len(), 4);
        assert_eq!(genealogy.get_parents(&s("C")).unwrap(), vec![s("A"), s("B")]);
    }

    #[test]
    fn test_touchy_compares_normally_when_disarmed() {
        disarm_compare_budget();
        assert!(Touchy(1) < Touchy(2));
        assert_eq!(probe_lattice().len(), 8);
    }
}
