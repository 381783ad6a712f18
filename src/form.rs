//! Detail panel contract.
//!
//! The panel shows a different form depending on what is selected. This
//! module decides which one, lists the type choices each chooser offers, and
//! applies the type edits those choosers make. Plain field edits go straight
//! through the public fields of [`Person`](crate::model::Person).

use tracing::debug;

use crate::error::{GenogramError, Result};
use crate::model::{Family, Genogram, PersonId, Relationship, RelationshipId, RelationshipType};
use crate::selection::SelectionManager;

/// Which detail form the current selection calls for.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailForm {
    /// Nothing selected.
    Empty,
    /// One person, no relationship.
    Person(PersonId),
    /// One relationship, no people.
    Relationship(RelationshipId),
    /// Two people, no relationship: couple chooser for that pair.
    CouplePair {
        a: PersonId,
        b: PersonId,
        existing: Option<RelationshipId>,
    },
    /// One person plus a parent-child relationship involving them.
    ParentChild {
        child: PersonId,
        parent: PersonId,
        relationship: RelationshipId,
    },
    /// Any other combination.
    Unsupported,
}

impl DetailForm {
    pub fn resolve(genogram: &Genogram, selection: &SelectionManager) -> Self {
        let people = selection.sorted_people();
        let relationship = selection
            .relationship()
            .and_then(|id| genogram.relationship(id));

        match (people.as_slice(), selection.relationship(), relationship) {
            ([], None, _) => DetailForm::Empty,
            ([a, b], None, _) => DetailForm::CouplePair {
                a: a.clone(),
                b: b.clone(),
                existing: genogram.couple_between(a, b).map(|rel| rel.id().clone()),
            },
            ([child], Some(_), Some(rel)) if rel.family() == Family::ParentChild => {
                match rel.other(child) {
                    Some(parent) if rel.involves(child) => DetailForm::ParentChild {
                        child: child.clone(),
                        parent: parent.clone(),
                        relationship: rel.id().clone(),
                    },
                    _ => DetailForm::Unsupported,
                }
            }
            ([person], None, _) if genogram.person(person).is_some() => {
                DetailForm::Person(person.clone())
            }
            ([], Some(_), Some(rel)) => DetailForm::Relationship(rel.id().clone()),
            _ => DetailForm::Unsupported,
        }
    }

    /// Heading shown above the form.
    pub fn heading(&self, genogram: &Genogram) -> String {
        match self {
            DetailForm::Empty => "Select a person or relationship".to_string(),
            DetailForm::Person(id) => genogram
                .person(id)
                .map(|p| p.display_name())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Person".to_string()),
            DetailForm::Relationship(_) => "Relationship Type".to_string(),
            DetailForm::CouplePair { .. } => "Couple Relationship".to_string(),
            DetailForm::ParentChild { parent, .. } => {
                let name = genogram
                    .person(parent)
                    .map(|p| p.first_name.clone())
                    .unwrap_or_default();
                format!("Parent-Child ({name} -> Child)")
            }
            DetailForm::Unsupported => "Select a single person or relationship".to_string(),
        }
    }

    /// Options of the type chooser this form shows, if any.
    pub fn choices(&self, genogram: &Genogram) -> Vec<TypeChoice> {
        let current = |id: &RelationshipId| genogram.relationship(id).map(|rel| rel.kind);
        match self {
            DetailForm::Relationship(id) => type_choices(RelationshipType::ALL, current(id)),
            DetailForm::CouplePair { existing, .. } => {
                let current = existing.as_ref().and_then(current);
                let mut choices = vec![TypeChoice {
                    kind: None,
                    label: "No Relationship",
                    selected: current.is_none(),
                }];
                choices.extend(type_choices(RelationshipType::of_family(Family::Couple), current));
                choices
            }
            DetailForm::ParentChild { relationship, .. } => type_choices(
                RelationshipType::of_family(Family::ParentChild),
                current(relationship),
            ),
            _ => Vec::new(),
        }
    }
}

/// One entry of a relationship type chooser. `kind` is `None` for the
/// "no relationship" entry of the couple chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeChoice {
    pub kind: Option<RelationshipType>,
    pub label: &'static str,
    pub selected: bool,
}

fn type_choices(
    kinds: impl IntoIterator<Item = RelationshipType>,
    current: Option<RelationshipType>,
) -> Vec<TypeChoice> {
    kinds
        .into_iter()
        .map(|kind| TypeChoice {
            kind: Some(kind),
            label: kind.label(),
            selected: current == Some(kind),
        })
        .collect()
}

fn require_family(kind: RelationshipType, expected: Family) -> Result<()> {
    if kind.family() == expected {
        Ok(())
    } else {
        Err(GenogramError::WrongFamily { expected, found: kind })
    }
}

/// Apply the couple chooser for the pair `a`, `b`
///
/// * `None` removes their couple relationship, if any.
/// * A couple type retypes the existing relationship or creates one with
///   `drop` as its depth.
///
/// Returns the id of the pair's couple relationship afterwards.
pub fn set_couple_type(
    genogram: &mut Genogram,
    a: &PersonId,
    b: &PersonId,
    kind: Option<RelationshipType>,
    drop: f32,
) -> Result<Option<RelationshipId>> {
    if let Some(kind) = kind {
        require_family(kind, Family::Couple)?;
    }

    let existing = genogram.couple_between(a, b).map(|rel| rel.id().clone());

    match (existing, kind) {
        (Some(id), None) => {
            genogram.remove_relationship(&id);
            debug!(relationship = %id, "couple relationship removed");
            Ok(None)
        }
        (Some(id), Some(kind)) => {
            if let Some(rel) = genogram.relationship_mut(&id) {
                rel.kind = kind;
            }
            Ok(Some(id))
        }
        (None, Some(kind)) => {
            let rel = Relationship::new(kind, a.clone(), b.clone(), drop);
            let id = rel.id().clone();
            genogram.add_relationship(rel)?;
            debug!(relationship = %id, %kind, "couple relationship created");
            Ok(Some(id))
        }
        (None, None) => Ok(None),
    }
}

/// Retype a parent-child relationship within its family.
///
/// Returns false if `relationship` does not exist.
pub fn set_child_type(
    genogram: &mut Genogram,
    relationship: &RelationshipId,
    kind: RelationshipType,
) -> Result<bool> {
    require_family(kind, Family::ParentChild)?;
    match genogram.relationship_mut(relationship) {
        Some(rel) => {
            require_family(rel.kind, Family::ParentChild)?;
            rel.kind = kind;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Retype any relationship to any catalog type, as the relationship form does.
///
/// Returns false if `relationship` does not exist.
pub fn set_relationship_type(
    genogram: &mut Genogram,
    relationship: &RelationshipId,
    kind: RelationshipType,
) -> bool {
    match genogram.relationship_mut(relationship) {
        Some(rel) => {
            rel.kind = kind;
            true
        }
        None => false,
    }
}
