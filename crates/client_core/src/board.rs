//! The board event loop.
//!
//! Feed messages, clicks, submits and completion results are all queued onto
//! one channel and handled one at a time by [`OrderBoard::run`], so the
//! selection and the rendered board never see concurrent writers. Only the
//! completion request itself runs on a separate task; its result comes back
//! through the same channel.

use std::sync::Arc;

use shared::domain::{DrinkId, QueueSnapshot};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use crate::{
    completion::{self, CompletionEndpoint},
    error::{CompletionError, DispatchError},
    feed::FeedEvent,
    render::{DisplaySurface, Notice, Renderer},
    selection::SelectionState,
    view::ClickTarget,
};

const BOARD_EVENT_CAPACITY: usize = 256;

#[derive(Debug)]
pub enum BoardEvent {
    Feed(FeedEvent),
    Click(ClickTarget),
    /// Click on the drink card showing this identifier, wherever it is.
    ClickDrink(DrinkId),
    Submit,
    Redraw,
    CompletionFinished(Result<QueueSnapshot, CompletionError>),
}

impl From<FeedEvent> for BoardEvent {
    fn from(event: FeedEvent) -> Self {
        Self::Feed(event)
    }
}

impl BoardEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Feed(FeedEvent::Snapshot(_)) => "feed_snapshot",
            Self::Feed(FeedEvent::TransportError(_)) => "feed_transport_error",
            Self::Feed(FeedEvent::Closed) => "feed_closed",
            Self::Click(_) => "click",
            Self::ClickDrink(_) => "click_drink",
            Self::Submit => "submit",
            Self::Redraw => "redraw",
            Self::CompletionFinished(_) => "completion_finished",
        }
    }
}

/// Cloneable sender side of the board.
#[derive(Clone)]
pub struct BoardHandle {
    tx: mpsc::Sender<BoardEvent>,
}

impl BoardHandle {
    /// Queues `event` without waiting.
    pub fn dispatch(&self, event: BoardEvent) -> Result<(), DispatchError> {
        let name = event.name();
        match self.tx.try_send(event) {
            Ok(()) => {
                debug!(event = name, "queued board event");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(DispatchError::Full),
            Err(TrySendError::Closed(_)) => Err(DispatchError::Closed),
        }
    }

    pub async fn send(&self, event: BoardEvent) -> Result<(), DispatchError> {
        self.tx.send(event).await.map_err(|_| DispatchError::Closed)
    }

    /// Raw sender, for producers such as [`crate::feed::FeedClient`].
    pub fn events(&self) -> mpsc::Sender<BoardEvent> {
        self.tx.clone()
    }
}

pub struct OrderBoard<S: DisplaySurface> {
    renderer: Renderer<S>,
    selection: SelectionState,
    endpoint: Arc<dyn CompletionEndpoint>,
    completion_in_flight: bool,
    inbox: mpsc::Receiver<BoardEvent>,
    outbox: mpsc::WeakSender<BoardEvent>,
}

impl<S: DisplaySurface> OrderBoard<S> {
    pub fn new(surface: S, endpoint: Arc<dyn CompletionEndpoint>) -> (Self, BoardHandle) {
        let (tx, inbox) = mpsc::channel(BOARD_EVENT_CAPACITY);
        let board = Self {
            renderer: Renderer::new(surface),
            selection: SelectionState::new(),
            endpoint,
            completion_in_flight: false,
            inbox,
            outbox: tx.downgrade(),
        };
        (board, BoardHandle { tx })
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn completion_in_flight(&self) -> bool {
        self.completion_in_flight
    }

    /// Handles events until every [`BoardHandle`] is dropped and no
    /// completion is outstanding.
    pub async fn run(mut self) -> Self {
        while self.step().await {}
        info!("board: event queue closed");
        self
    }

    /// Handles the next queued event. Returns `false` once the queue is
    /// closed.
    pub async fn step(&mut self) -> bool {
        match self.inbox.recv().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    pub fn handle(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::Feed(FeedEvent::Snapshot(snapshot)) => {
                info!(
                    entries = snapshot.entries.len(),
                    total_orders = snapshot.total_orders,
                    total_drinks = snapshot.total_drinks,
                    "board: applying queue snapshot"
                );
                self.renderer.render_feed(snapshot, &self.selection);
            }
            BoardEvent::Feed(FeedEvent::TransportError(reason)) => {
                self.renderer.notify(Notice::FeedError(reason));
            }
            BoardEvent::Feed(FeedEvent::Closed) => {
                self.renderer.notify(Notice::FeedDisconnected);
            }
            BoardEvent::Click(target) => self.click(&target),
            BoardEvent::ClickDrink(identifier) => {
                match self.renderer.view().entry_of_drink(&identifier) {
                    Some(entry) => self.click(&ClickTarget::Drink { entry, identifier }),
                    None => warn!(%identifier, "board: no drink card with this identifier"),
                }
            }
            BoardEvent::Submit => self.submit(),
            BoardEvent::Redraw => self.renderer.refresh(&self.selection),
            BoardEvent::CompletionFinished(result) => self.finish_completion(result),
        }
    }

    fn click(&mut self, target: &ClickTarget) {
        if self
            .renderer
            .view()
            .dispatch_click(target, &mut self.selection)
        {
            self.renderer.refresh(&self.selection);
        } else {
            warn!(?target, "board: ignoring click on element not on the board");
        }
    }

    fn submit(&mut self) {
        if self.completion_in_flight {
            warn!("board: completion already in flight, ignoring submit");
            self.renderer.notify(Notice::CompletionInFlight);
            return;
        }

        let form = match completion::prepare(&self.selection) {
            Ok(form) => form,
            Err(err) => {
                info!(error = %err, "board: completion rejected");
                self.renderer.notify(Notice::NothingSelected);
                return;
            }
        };

        let Some(tx) = self.outbox.upgrade() else {
            warn!("board: shutting down, completion not sent");
            return;
        };
        let endpoint = Arc::clone(&self.endpoint);
        self.completion_in_flight = true;
        tokio::spawn(async move {
            let result = endpoint.complete(form).await;
            let _ = tx.send(BoardEvent::CompletionFinished(result)).await;
        });
    }

    fn finish_completion(&mut self, result: Result<QueueSnapshot, CompletionError>) {
        self.completion_in_flight = false;
        match result {
            Ok(snapshot) => {
                info!(
                    entries = snapshot.entries.len(),
                    total_orders = snapshot.total_orders,
                    total_drinks = snapshot.total_drinks,
                    "board: completion applied"
                );
                self.selection.clear_all();
                self.renderer.render(snapshot, &self.selection);
            }
            Err(err) => {
                error!(error = %err, "board: completion failed, keeping current board");
                self.renderer.notify(Notice::CompletionFailed(err.to_string()));
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
