//! Selection of completion targets on the board.
//!
//! Either one whole entry or a set of individual drinks is selected, never
//! both. Every transition goes through [`SelectionState::toggle_entry`],
//! [`SelectionState::toggle_drink`] or [`SelectionState::clear_all`].

use std::collections::BTreeSet;

use shared::{domain::DrinkId, protocol::CompletionForm};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_entry: Option<usize>,
    selected_drinks: BTreeSet<DrinkId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_entry(&self) -> Option<usize> {
        self.selected_entry
    }

    pub fn selected_drinks(&self) -> &BTreeSet<DrinkId> {
        &self.selected_drinks
    }

    pub fn is_entry_selected(&self, index: usize) -> bool {
        self.selected_entry == Some(index)
    }

    pub fn is_drink_selected(&self, identifier: &DrinkId) -> bool {
        self.selected_drinks.contains(identifier)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_entry.is_none() && self.selected_drinks.is_empty()
    }

    pub fn toggle_entry(&mut self, index: usize) {
        if self.selected_entry == Some(index) {
            self.clear_all();
        } else {
            self.selected_drinks.clear();
            self.selected_entry = Some(index);
        }
    }

    pub fn toggle_drink(&mut self, identifier: DrinkId) {
        self.selected_entry = None;
        if !self.selected_drinks.remove(&identifier) {
            self.selected_drinks.insert(identifier);
        }
    }

    pub fn clear_all(&mut self) {
        self.selected_entry = None;
        self.selected_drinks.clear();
    }

    /// Request body for the current selection, or `None` when nothing is
    /// selected.
    pub fn completion_form(&self) -> Option<CompletionForm> {
        if self.is_empty() {
            return None;
        }
        Some(CompletionForm::new(
            &self.selected_drinks,
            self.selected_entry,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclusive(state: &SelectionState) -> bool {
        state.selected_entry().is_none() || state.selected_drinks().is_empty()
    }

    #[test]
    fn starts_empty() {
        let state = SelectionState::new();
        assert!(state.is_empty());
        assert_eq!(state.completion_form(), None);
    }

    #[test]
    fn toggle_entry_twice_restores_previous_state() {
        let mut state = SelectionState::new();
        state.toggle_entry(0);
        assert!(state.is_entry_selected(0));
        state.toggle_entry(0);
        assert_eq!(state, SelectionState::new());

        let mut state = SelectionState::new();
        state.toggle_entry(2);
        let before = state.clone();
        state.toggle_entry(2);
        assert!(state.is_empty());
        state.toggle_entry(2);
        assert_eq!(state, before);
    }

    #[test]
    fn moving_the_entry_selection_replaces_it() {
        let mut state = SelectionState::new();
        state.toggle_entry(2);
        state.toggle_entry(0);
        assert_eq!(state.selected_entry(), Some(0));
    }

    #[test]
    fn toggle_drink_twice_removes_it_again() {
        let mut state = SelectionState::new();
        state.toggle_drink(DrinkId::from("a"));
        let before = state.clone();

        state.toggle_drink(DrinkId::from("b"));
        assert!(state.is_drink_selected(&DrinkId::from("b")));
        state.toggle_drink(DrinkId::from("b"));

        assert_eq!(state, before);
        assert!(!state.is_drink_selected(&DrinkId::from("b")));
    }

    #[test]
    fn selecting_an_entry_clears_drinks() {
        let mut state = SelectionState::new();
        state.toggle_drink(DrinkId::from("a"));
        state.toggle_drink(DrinkId::from("b"));
        state.toggle_entry(1);

        assert_eq!(state.selected_entry(), Some(1));
        assert!(state.selected_drinks().is_empty());
    }

    #[test]
    fn selecting_a_drink_clears_the_entry() {
        let mut state = SelectionState::new();
        state.toggle_entry(0);
        state.toggle_drink(DrinkId::from("x"));

        assert_eq!(state.selected_entry(), None);
        assert!(state.is_drink_selected(&DrinkId::from("x")));
    }

    #[test]
    fn exclusion_holds_across_mixed_sequences() {
        let ops: Vec<Box<dyn Fn(&mut SelectionState)>> = vec![
            Box::new(|s| s.toggle_entry(0)),
            Box::new(|s| s.toggle_entry(1)),
            Box::new(|s| s.toggle_drink(DrinkId::from("a"))),
            Box::new(|s| s.toggle_drink(DrinkId::from("b"))),
            Box::new(|s| s.clear_all()),
        ];

        // Every sequence of length three over the operation set.
        for first in &ops {
            for second in &ops {
                for third in &ops {
                    let mut state = SelectionState::new();
                    for op in [first, second, third] {
                        op(&mut state);
                        assert!(exclusive(&state), "exclusion violated: {state:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn completion_form_reflects_drink_selection() {
        let mut state = SelectionState::new();
        state.toggle_drink(DrinkId::from("d2"));
        state.toggle_drink(DrinkId::from("d1"));

        let form = state.completion_form().expect("form");
        assert_eq!(form.selected_drink_ids, r#"["d1","d2"]"#);
        assert_eq!(form.selected_item_index, "");
    }

    #[test]
    fn completion_form_reflects_entry_selection() {
        let mut state = SelectionState::new();
        state.toggle_entry(3);

        let form = state.completion_form().expect("form");
        assert_eq!(form.selected_drink_ids, "[]");
        assert_eq!(form.selected_item_index, "3");
    }
}
