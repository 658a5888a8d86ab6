//! Live view WebSocket.
//!
//! `GET /api/v1/live/{screen}?token=...&<filters>` upgrades to a socket that
//! receives `{"screen": ..., "data": ...}` with the recomputed view-state each
//! time a collection the screen reads changes. Browsers cannot set headers
//! on a WebSocket handshake, so the bearer token travels in the query.

use std::collections::HashMap;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        FromRef, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::json;
use tokio::select;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::{LiveFeed, LiveView};
use crate::interfaces::http::common::ApiError;
use crate::interfaces::http::middleware::{
    auth_error_response, authenticate, AuthError, AuthState, AuthenticatedUser,
};
use crate::interfaces::http::modules::metrics::LIVE_SOCKETS;
use crate::interfaces::http::state::AppState;

const TOKEN_PARAM: &str = "token";

/// Close code sent when the session behind the socket ends
const POLICY_VIOLATION: u16 = 1008;

/// Authenticate the handshake and resolve the requested screen
pub fn open_view(
    state: &AppState,
    screen: &str,
    mut params: HashMap<String, String>,
) -> Result<(AuthenticatedUser, LiveView), Response> {
    let token = params.remove(TOKEN_PARAM).unwrap_or_default();
    let user = authenticate(&token, &AuthState::from_ref(state)).map_err(auth_error_response)?;

    let view = LiveView::from_params(screen, &params).ok_or_else(|| {
        ApiError::new(StatusCode::NOT_FOUND, format!("Pantalla desconocida: {}", screen))
            .into_response()
    })?;
    if !user.can_access(view.module()) {
        return Err(auth_error_response(AuthError::NoAccess));
    }
    Ok((user, view))
}

pub async fn ws_live_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(screen): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match open_view(&state, &screen, params) {
        Ok((user, view)) => {
            info!(uid = %user.uid, screen = %view.module(), "Live view requested");
            ws.on_upgrade(move |socket| handle_live_socket(socket, state, user, view))
        }
        Err(response) => response,
    }
}

/// Why a live socket stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveExit {
    ClientGone,
    SourcesClosed,
    SessionEnded,
    SendFailed,
}

async fn handle_live_socket(
    socket: WebSocket,
    state: AppState,
    user: AuthenticatedUser,
    view: LiveView,
) {
    let screen = view.module().as_str();
    let (mut sender, receiver) = socket.split();

    let feed = match LiveFeed::open(state.documents.as_ref(), view).await {
        Ok(feed) => feed,
        Err(e) => {
            warn!(screen, error = %e, "Cannot open live subscriptions");
            let error = json!({"screen": screen, "error": e.to_string()});
            let _ = sender.send(Message::Text(error.to_string().into())).await;
            return;
        }
    };
    let Some(session_end) = state.auth.sessions().watch(&user.session_id) else {
        send_session_closed(&mut sender).await;
        return;
    };

    metrics::gauge!(LIVE_SOCKETS, "screen" => screen).increment(1.0);
    debug!(uid = %user.uid, screen, "Live socket open");

    let exit = pump(&mut sender, receiver, feed, session_end, screen).await;

    metrics::gauge!(LIVE_SOCKETS, "screen" => screen).decrement(1.0);
    debug!(uid = %user.uid, screen, ?exit, "Live socket closed");
}

async fn send_session_closed<S>(sender: &mut S)
where
    S: Sink<Message> + Unpin,
{
    let _ = sender
        .send(Message::Close(Some(CloseFrame {
            code: POLICY_VIOLATION,
            reason: "session closed".into(),
        })))
        .await;
}

/// Forward view-state frames until the client leaves, the sources close or
/// the session ends. Dropping `feed` on return releases the subscriptions.
async fn pump<S, R>(
    sender: &mut S,
    mut receiver: R,
    mut feed: LiveFeed,
    mut session_end: watch::Receiver<()>,
    screen: &str,
) -> LiveExit
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        select! {
            _ = session_end.changed() => {
                send_session_closed(sender).await;
                return LiveExit::SessionEnded;
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            return LiveExit::SendFailed;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return LiveExit::ClientGone,
                    Some(Err(e)) => {
                        debug!(screen, error = %e, "Live socket error");
                        return LiveExit::ClientGone;
                    }
                    Some(Ok(_)) => {}
                }
            }

            update = feed.next() => {
                let Some(data) = update else {
                    warn!(screen, "Live sources closed");
                    return LiveExit::SourcesClosed;
                };
                let frame = json!({"screen": screen, "data": data});
                if sender.send(Message::Text(frame.to_string().into())).await.is_err() {
                    return LiveExit::SendFailed;
                }
            }
        }
    }
}
