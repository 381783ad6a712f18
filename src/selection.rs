use std::collections::HashSet;
use slint::{Model, SharedString, VecModel};

use crate::model::{PersonId, RelationshipId};

/// Selected people plus at most one selected relationship.
///
/// The two halves are kept mutually exclusive by every operation except
/// [`select_parent_child`](Self::select_parent_child), which pairs one person
/// with the relationship linking it to a parent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionManager {
    people: HashSet<PersonId>,
    relationship: Option<RelationshipId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a press on a person based on the toggle modifier
    ///
    /// With `toggle` held the person's membership flips. Without it, a
    /// person that is already part of a multi-selection keeps the whole
    /// selection (so it can be dragged as a group); otherwise the selection
    /// collapses to that person alone. Either way the relationship is
    /// deselected.
    pub fn handle_interaction(&mut self, id: &PersonId, toggle: bool) {
        self.relationship = None;
        if toggle {
            if !self.people.remove(id) {
                self.people.insert(id.clone());
            }
        } else {
            if self.people.len() > 1 && self.people.contains(id) {
                return;
            }
            self.people.clear();
            self.people.insert(id.clone());
        }
    }

    /// Flip one person's membership, leaving the rest untouched.
    pub fn toggle(&mut self, id: &PersonId) {
        self.handle_interaction(id, true);
    }

    /// Select a relationship alone.
    pub fn select_relationship(&mut self, id: RelationshipId) {
        self.people.clear();
        self.relationship = Some(id);
    }

    /// Select one person together with a relationship linking it to a parent.
    pub fn select_parent_child(&mut self, child: PersonId, relationship: RelationshipId) {
        self.people.clear();
        self.people.insert(child);
        self.relationship = Some(relationship);
    }

    /// Clear the current selection
    pub fn clear(&mut self) {
        self.people.clear();
        self.relationship = None;
    }

    /// Replace the selected people with a new set of ids
    ///
    /// Used when a marquee completes; any selected relationship is dropped.
    pub fn replace_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = PersonId>,
    {
        self.people.clear();
        self.people.extend(ids);
        self.relationship = None;
    }

    /// Check if a person is selected
    pub fn contains(&self, id: &PersonId) -> bool {
        self.people.contains(id)
    }

    pub fn is_relationship_selected(&self, id: &RelationshipId) -> bool {
        self.relationship.as_ref() == Some(id)
    }

    pub fn relationship(&self) -> Option<&RelationshipId> {
        self.relationship.as_ref()
    }

    /// Get an iterator over the selected people (unordered)
    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, PersonId> {
        self.people.iter()
    }

    /// Selected people in id order.
    pub fn sorted_people(&self) -> Vec<PersonId> {
        let mut ids: Vec<PersonId> = self.people.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Sync the selected people to a Slint VecModel, in id order
    pub fn sync_to_model(&self, model: &VecModel<SharedString>) {
        // Clear and repopulate to ensure exact match
        while model.row_count() > 0 {
            model.remove(0);
        }
        for id in self.sorted_people() {
            model.push(SharedString::from(id.as_str()));
        }
    }

    /// Sync the selected people from any Slint Model
    pub fn sync_from_model(&mut self, model: &dyn Model<Data = SharedString>) {
        self.replace_selection(
            (0..model.row_count())
                .filter_map(|i| model.row_data(i))
                .map(|id| PersonId::from(id.as_str())),
        );
    }

    /// Get the number of selected people
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// True when neither people nor a relationship are selected
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.relationship.is_none()
    }
}
