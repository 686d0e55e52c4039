use crate::state::AppState;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use posematch::Session;
use posematch_protocol::protocol::ServerMessage;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| {
        let span = info_span!("session", id = %Uuid::new_v4());
        handle_play_client(socket, state).instrument(span)
    })
}

/// Runs one message on the blocking pool and hands the session back.
async fn process(session: Session, text: Utf8Bytes, state: &AppState) -> Option<(Session, Option<ServerMessage>)> {
    let detector = state.detector.clone();
    let span = Span::current();
    let task = tokio::task::spawn_blocking(move || {
        let _enter = span.enter();
        let mut session = session;
        let reply = session.handle_text(text.as_str(), detector.as_ref());
        (session, reply)
    });

    match task.await {
        Ok(done) => Some(done),
        Err(e) => {
            error!("Message handler crashed: {}", e);
            None
        }
    }
}

async fn handle_play_client(mut socket: WebSocket, state: Arc<AppState>) {
    let mut session = match Session::new(state.params.clone()) {
        Ok(s) => s,
        Err(e) => {
            error!("Cannot start session: {}", e);
            return;
        }
    };
    info!("Client connected ({})", session.strategy());

    loop {
        let text = match socket.recv().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => Utf8Bytes::from(text),
                Err(_) => {
                    warn!("Ignoring non-UTF-8 binary message");
                    continue;
                }
            },
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!("Receive failed: {}", e);
                break;
            }
        };

        // Messages of one connection are handled strictly one at a time
        let reply = match process(session, text, &state).await {
            Some((s, reply)) => {
                session = s;
                reply
            }
            None => return,
        };

        let Some(reply) = reply else { continue };
        let json = match serde_json::to_string(&reply) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to encode reply: {}", e);
                continue;
            }
        };
        debug!("-> {}", json);
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }

    info!(
        frames = session.frames_seen(),
        song = session.song().unwrap_or("-"),
        "Client disconnected"
    );
}
