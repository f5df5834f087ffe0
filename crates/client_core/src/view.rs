//! Board view model: what a display surface shows for one (snapshot,
//! selection) pair, plus the click handlers attached to each card.

use shared::domain::{DrinkId, QueueEntry, QueueSnapshot};

use crate::selection::SelectionState;

pub const ORDERS_LABEL: &str = "Orders: ";
pub const DRINKS_LABEL: &str = "Drinks: ";

/// Selection transition bound to a rendered element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    ToggleEntry(usize),
    ToggleDrink(DrinkId),
    ClearAll,
}

impl SelectionAction {
    pub fn apply(&self, selection: &mut SelectionState) {
        match self {
            Self::ToggleEntry(index) => selection.toggle_entry(*index),
            Self::ToggleDrink(identifier) => selection.toggle_drink(identifier.clone()),
            Self::ClearAll => selection.clear_all(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickHandler {
    pub action: SelectionAction,
    pub stop_propagation: bool,
}

impl ClickHandler {
    fn stopping(action: SelectionAction) -> Self {
        Self {
            action,
            stop_propagation: true,
        }
    }
}

/// Innermost element a click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Background,
    Entry(usize),
    Drink { entry: usize, identifier: DrinkId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardHeader {
    Order { customer: String, received: String },
    Batch { heading: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkCard {
    pub identifier: DrinkId,
    pub name: String,
    /// Raw milk type, used by surfaces for styling.
    pub milk_class: Option<String>,
    pub milk_label: String,
    pub options: Vec<String>,
    /// Only populated for drinks shown inside a batch.
    pub customer: Option<String>,
    pub selected: bool,
    pub on_click: ClickHandler,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCard {
    pub index: usize,
    pub header: CardHeader,
    pub drinks: Vec<DrinkCard>,
    pub selected: bool,
    pub on_click: ClickHandler,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub orders_counter: String,
    pub drinks_counter: String,
    pub cards: Vec<EntryCard>,
    pub on_background_click: ClickHandler,
}

impl Default for BoardView {
    fn default() -> Self {
        Self::build(&QueueSnapshot::default(), &SelectionState::default())
    }
}

impl BoardView {
    pub fn build(snapshot: &QueueSnapshot, selection: &SelectionState) -> Self {
        let cards = snapshot
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| entry_card(index, entry, selection))
            .collect();

        Self {
            orders_counter: format!("{ORDERS_LABEL}{}", snapshot.total_orders),
            drinks_counter: format!("{DRINKS_LABEL}{}", snapshot.total_drinks),
            cards,
            on_background_click: ClickHandler {
                action: SelectionAction::ClearAll,
                stop_propagation: false,
            },
        }
    }

    pub fn card(&self, index: usize) -> Option<&EntryCard> {
        self.cards.get(index)
    }

    pub fn drink_card(&self, identifier: &DrinkId) -> Option<&DrinkCard> {
        self.cards
            .iter()
            .flat_map(|card| card.drinks.iter())
            .find(|drink| &drink.identifier == identifier)
    }

    /// Finds the entry holding `identifier`, for targeting a drink click.
    pub fn entry_of_drink(&self, identifier: &DrinkId) -> Option<usize> {
        self.cards
            .iter()
            .find(|card| card.drinks.iter().any(|d| &d.identifier == identifier))
            .map(|card| card.index)
    }

    /// Handlers a click on `target` passes through, innermost first. `None`
    /// when the target is not on the board.
    pub fn bubble_path(&self, target: &ClickTarget) -> Option<Vec<&ClickHandler>> {
        let mut path = Vec::with_capacity(3);
        match target {
            ClickTarget::Background => {}
            ClickTarget::Entry(index) => {
                path.push(&self.card(*index)?.on_click);
            }
            ClickTarget::Drink { entry, identifier } => {
                let card = self.card(*entry)?;
                let drink = card.drinks.iter().find(|d| &d.identifier == identifier)?;
                path.push(&drink.on_click);
                path.push(&card.on_click);
            }
        }
        path.push(&self.on_background_click);
        Some(path)
    }

    /// Runs the click handlers for `target` against `selection`, stopping at
    /// the first handler that stops propagation. Returns `false` when the
    /// target is not on the board.
    pub fn dispatch_click(&self, target: &ClickTarget, selection: &mut SelectionState) -> bool {
        let Some(path) = self.bubble_path(target) else {
            return false;
        };
        for handler in path {
            handler.action.apply(selection);
            if handler.stop_propagation {
                break;
            }
        }
        true
    }
}

fn entry_card(index: usize, entry: &QueueEntry, selection: &SelectionState) -> EntryCard {
    let (header, show_customers) = match entry {
        QueueEntry::Order(order) => (
            CardHeader::Order {
                customer: order.customer_name.clone(),
                received: order.time_received.display(),
            },
            false,
        ),
        QueueEntry::Batch(batch) => (
            CardHeader::Batch {
                heading: batch.heading(),
            },
            true,
        ),
    };

    let drinks = entry
        .drinks()
        .iter()
        .map(|drink| DrinkCard {
            identifier: drink.identifier.clone(),
            name: drink.drink_name.clone(),
            milk_class: drink.milk_type.as_ref().map(|m| m.as_str().to_string()),
            milk_label: drink.milk_label(),
            options: drink.options.clone(),
            customer: if show_customers {
                drink.customer_name.clone()
            } else {
                None
            },
            selected: selection.is_drink_selected(&drink.identifier),
            on_click: ClickHandler::stopping(SelectionAction::ToggleDrink(
                drink.identifier.clone(),
            )),
        })
        .collect();

    EntryCard {
        index,
        header,
        drinks,
        selected: selection.is_entry_selected(index),
        on_click: ClickHandler::stopping(SelectionAction::ToggleEntry(index)),
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
