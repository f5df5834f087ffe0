//! Client-side core of the order board: decodes queue snapshots from the
//! push feed, tracks what the barista has selected, renders the board and
//! reconciles completion round-trips back into it.

pub mod board;
pub mod completion;
pub mod error;
pub mod feed;
pub mod html;
pub mod render;
pub mod selection;
pub mod view;

pub use board::{BoardEvent, BoardHandle, OrderBoard};
pub use completion::{CompletionEndpoint, HttpCompletionEndpoint, MissingCompletionEndpoint};
pub use error::{CompletionError, DispatchError, FeedError};
pub use feed::{FeedClient, FeedEvent};
pub use render::{DisplaySurface, HeadlessSurface, Notice, Renderer};
pub use selection::SelectionState;
pub use view::{BoardView, CardHeader, ClickTarget, DrinkCard, EntryCard};

#[cfg(test)]
#[path = "tests/fixtures.rs"]
mod fixtures;
