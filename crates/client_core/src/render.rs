//! Single render entry point shared by the feed, click and completion paths.

use std::fmt;

use shared::domain::QueueSnapshot;
use tracing::debug;

use crate::{selection::SelectionState, view::BoardView};

/// User-visible messages that are not part of the queue region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NothingSelected,
    CompletionInFlight,
    CompletionFailed(String),
    FeedError(String),
    FeedDisconnected,
}

impl Notice {
    /// Feed status notices describe the board itself and stay up until the
    /// feed delivers a snapshot again.
    pub fn is_feed_status(&self) -> bool {
        matches!(self, Self::FeedError(_) | Self::FeedDisconnected)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingSelected => f.write_str("Nothing selected"),
            Self::CompletionInFlight => {
                f.write_str("A completion is already being sent; wait for it to finish")
            }
            Self::CompletionFailed(reason) => write!(f, "Could not complete selection: {reason}"),
            Self::FeedError(reason) => write!(f, "Order feed error: {reason}"),
            Self::FeedDisconnected => f.write_str("Order feed disconnected; board may be stale"),
        }
    }
}

/// Where the board ends up: a terminal, an HTML page, a test recorder.
pub trait DisplaySurface: Send {
    /// Replaces the whole queue region, counters included.
    fn replace_queue(&mut self, view: &BoardView);

    fn show_notice(&mut self, notice: &Notice);

    /// Called when a feed snapshot arrives after a feed status notice.
    fn clear_feed_notice(&mut self) {}
}

pub struct Renderer<S: DisplaySurface> {
    surface: S,
    snapshot: QueueSnapshot,
    view: BoardView,
    feed_notice_shown: bool,
}

impl<S: DisplaySurface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            snapshot: QueueSnapshot::default(),
            view: BoardView::default(),
            feed_notice_shown: false,
        }
    }

    /// Makes `snapshot` the current one and redraws the board from scratch.
    pub fn render(&mut self, snapshot: QueueSnapshot, selection: &SelectionState) {
        self.snapshot = snapshot;
        self.refresh(selection);
    }

    /// Redraws the current snapshot with a new selection.
    pub fn refresh(&mut self, selection: &SelectionState) {
        self.view = BoardView::build(&self.snapshot, selection);
        debug!(
            entries = self.view.cards.len(),
            selected_entry = ?selection.selected_entry(),
            selected_drinks = selection.selected_drinks().len(),
            "render: replacing queue region"
        );
        self.surface.replace_queue(&self.view);
    }

    pub fn notify(&mut self, notice: Notice) {
        self.feed_notice_shown |= notice.is_feed_status();
        self.surface.show_notice(&notice);
    }

    /// Applies a snapshot from the feed, withdrawing any feed status notice.
    pub fn render_feed(&mut self, snapshot: QueueSnapshot, selection: &SelectionState) {
        if std::mem::take(&mut self.feed_notice_shown) {
            self.surface.clear_feed_notice();
        }
        self.render(snapshot, selection);
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn snapshot(&self) -> &QueueSnapshot {
        &self.snapshot
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// Surface that keeps the last frame and every notice in memory.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    pub last_view: Option<BoardView>,
    pub frames: usize,
    pub notices: Vec<Notice>,
    pub feed_notice_cleared: usize,
}

impl DisplaySurface for HeadlessSurface {
    fn replace_queue(&mut self, view: &BoardView) {
        self.last_view = Some(view.clone());
        self.frames += 1;
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn clear_feed_notice(&mut self) {
        self.feed_notice_cleared += 1;
    }
}
