//! Stdin commands understood by the terminal board.

use std::num::NonZeroUsize;

use client_core::{BoardEvent, ClickTarget};
use shared::domain::DrinkId;

pub const HELP: &str = "commands: order <n> | drink <id> | clear | complete | show | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Click the entry card numbered `n` on screen (1-based).
    Order(NonZeroUsize),
    Drink(DrinkId),
    Clear,
    Complete,
    Show,
    Help,
    Quit,
}

impl Command {
    /// The board event this command stands for, `None` for commands handled
    /// by the terminal loop itself.
    pub fn into_event(self) -> Option<BoardEvent> {
        match self {
            Self::Order(number) => Some(BoardEvent::Click(ClickTarget::Entry(number.get() - 1))),
            Self::Drink(identifier) => Some(BoardEvent::ClickDrink(identifier)),
            Self::Clear => Some(BoardEvent::Click(ClickTarget::Background)),
            Self::Complete => Some(BoardEvent::Submit),
            Self::Show => Some(BoardEvent::Redraw),
            Self::Help | Self::Quit => None,
        }
    }
}

pub fn parse(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(HELP.to_string());
    };
    let argument = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for '{verb}'"));
    }

    match (verb, argument) {
        ("order" | "o", Some(raw)) => match raw.parse::<NonZeroUsize>() {
            Ok(number) => Ok(Command::Order(number)),
            _ => Err(format!("'{raw}' is not an order number")),
        },
        ("drink" | "d", Some(raw)) => Ok(Command::Drink(DrinkId::from(raw))),
        ("order" | "o" | "drink" | "d", None) => Err(format!("'{verb}' needs an argument")),
        ("clear" | "c", None) => Ok(Command::Clear),
        ("complete" | "done", None) => Ok(Command::Complete),
        ("show" | "s", None) => Ok(Command::Show),
        ("help" | "?", None) => Ok(Command::Help),
        ("quit" | "q" | "exit", None) => Ok(Command::Quit),
        (_, Some(_)) if ["clear", "complete", "show", "help", "quit"].contains(&verb) => {
            Err(format!("'{verb}' takes no argument"))
        }
        _ => Err(format!("unknown command '{verb}'; {HELP}")),
    }
}
