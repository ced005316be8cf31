//! Server-sent event feeds backed by the notification bus.
//!
//! The order and data feeds carry no payload; clients re-read the
//! queue or stats endpoint on every event. Closing the HTTP connection
//! drops the stream and with it the subscription.

use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Deserialize;
use tracing::info;

use crate::bus::Subscription;
use crate::error::{AppError, AppResponse, AppResult, ok};
use crate::state::AppState;

fn signal_stream(
    sub: Subscription<()>,
    name: &'static str,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(sub, move |mut sub| async move {
        sub.recv()
            .await
            .map(|()| (Ok(Event::default().event(name).data("")), sub))
    })
}

/// Throttled invalidation feed for bar and kitchen screens.
pub async fn order_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(signal_stream(
        state.bus.subscribe_order_changes(),
        "order-changed",
    ))
    .keep_alive(KeepAlive::default())
}

/// Throttled refresh feed for the statistics screen.
pub async fn data_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(signal_stream(
        state.bus.subscribe_data_changes(),
        "data-changed",
    ))
    .keep_alive(KeepAlive::default())
}

/// Unthrottled announcement feed.
pub async fn message_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = futures::stream::unfold(state.bus.subscribe_messages(), |mut sub| async move {
        sub.recv()
            .await
            .map(|message| (Ok(Event::default().event("message").data(message)), sub))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Broadcast an admin announcement to every connected client.
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<Json<AppResponse<bool>>> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::validation("message must not be empty"));
    }

    state.bus.broadcast_message(message);
    info!(length = message.len(), "announcement broadcast");

    Ok(ok(true))
}
