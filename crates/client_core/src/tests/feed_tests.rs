use super::*;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;

use crate::{
    board::OrderBoard,
    completion::MissingCompletionEndpoint,
    fixtures::{alex_snapshot, mixed_snapshot},
    render::{HeadlessSurface, Notice},
};

#[derive(Clone)]
struct FeedState {
    frames: Arc<Vec<String>>,
}

async fn handle_new_order(ws: WebSocketUpgrade, State(state): State<FeedState>) -> Response {
    ws.on_upgrade(move |socket| push_frames(socket, state.frames))
}

async fn push_frames(mut socket: WebSocket, frames: Arc<Vec<String>>) {
    for frame in frames.iter() {
        if socket.send(WsMessage::Text(frame.clone())).await.is_err() {
            return;
        }
    }
    let _ = socket.send(WsMessage::Close(None)).await;
}

fn feed_frame(snapshot: &QueueSnapshot) -> String {
    let message = QueueFeedMessage::from_snapshot(snapshot).expect("encode entries");
    serde_json::to_string(&message).expect("encode message")
}

async fn spawn_feed_server(frames: Vec<String>) -> std::io::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/newOrder", get(handle_new_order))
        .with_state(FeedState {
            frames: Arc::new(frames),
        });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[test]
fn derives_websocket_url_from_http_server_url() {
    let feed = FeedClient::from_server_url("http://127.0.0.1:8000", "/newOrder").expect("url");
    assert_eq!(feed.url().as_str(), "ws://127.0.0.1:8000/newOrder");

    let feed = FeedClient::from_server_url("https://cafe.example", "/newOrder").expect("url");
    assert_eq!(feed.url().as_str(), "wss://cafe.example/newOrder");
}

#[test]
fn rejects_unknown_schemes() {
    let err = FeedClient::from_server_url("ftp://cafe.example", "/newOrder")
        .err()
        .expect("must fail");
    assert!(matches!(err, FeedError::InvalidUrl { .. }));
}

#[tokio::test]
async fn delivers_snapshots_skips_malformed_frames_and_reports_close() {
    let server_url = spawn_feed_server(vec![
        feed_frame(&alex_snapshot()),
        "{not json".to_string(),
        r#"{"orders": ["{\"broken\": true}"], "totalOrders": 1}"#.to_string(),
        feed_frame(&mixed_snapshot()),
    ])
    .await
    .expect("spawn server");
    let (tx, mut rx) = mpsc::channel::<FeedEvent>(16);

    let reader = FeedClient::from_server_url(&server_url, "/newOrder")
        .expect("url")
        .spawn(tx)
        .await
        .expect("connect");

    match rx.recv().await {
        Some(FeedEvent::Snapshot(snapshot)) => assert_eq!(snapshot, alex_snapshot()),
        other => panic!("expected first snapshot, got {other:?}"),
    }
    match rx.recv().await {
        Some(FeedEvent::Snapshot(snapshot)) => assert_eq!(snapshot, mixed_snapshot()),
        other => panic!("expected second snapshot, got {other:?}"),
    }
    assert!(matches!(rx.recv().await, Some(FeedEvent::Closed)));
    reader.await.expect("reader task");
}

#[tokio::test]
async fn connection_refused_is_returned_to_the_caller() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let (tx, _rx) = mpsc::channel::<FeedEvent>(1);

    let err = FeedClient::from_server_url(&format!("http://{addr}"), "/newOrder")
        .expect("url")
        .spawn(tx)
        .await
        .err()
        .expect("connect must fail");
    assert!(matches!(err, FeedError::Connect { .. }));
}

#[tokio::test]
async fn feed_drives_the_board() {
    let server_url = spawn_feed_server(vec![feed_frame(&mixed_snapshot())])
        .await
        .expect("spawn server");
    let (board, handle) = OrderBoard::new(
        HeadlessSurface::default(),
        Arc::new(MissingCompletionEndpoint),
    );
    FeedClient::from_server_url(&server_url, "/newOrder")
        .expect("url")
        .spawn(handle.events())
        .await
        .expect("connect");
    drop(handle);

    let board = board.run().await;
    let view = board.renderer().view();
    assert_eq!(view.orders_counter, "Orders: 4");
    assert_eq!(view.cards.len(), 2);
    assert_eq!(
        board.renderer().surface().notices,
        vec![Notice::FeedDisconnected]
    );
}
