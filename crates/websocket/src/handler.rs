use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::time::interval;

use engine::SearchService;
use events::{EventEnvelope, EventStream};
use tot_core::RunRequest;

use crate::messages::{ClientMessage, ServerMessage};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const BUSY_MESSAGE: &str = "A run is already in progress on this connection";

#[derive(Clone)]
pub struct WsState {
    pub service: Arc<SearchService>,
}

impl WsState {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self { service }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<WsState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection run slot. The slot frees as soon as the terminal event
/// has been forwarded, not when the run task winds down.
struct Session {
    service: Arc<SearchService>,
    run: Option<EventStream>,
}

impl Session {
    fn new(service: Arc<SearchService>) -> Self {
        Self { service, run: None }
    }

    fn is_busy(&self) -> bool {
        self.run.is_some()
    }

    async fn next_event(&mut self) -> Option<EventEnvelope> {
        match &mut self.run {
            Some(stream) => stream.next().await,
            None => std::future::pending().await,
        }
    }

    /// Message to forward for a run event, if any.
    fn on_event(&mut self, envelope: Option<EventEnvelope>) -> Option<ServerMessage> {
        match envelope {
            Some(envelope) => {
                if envelope.event.is_terminal() {
                    self.run = None;
                }
                Some(ServerMessage::Event(envelope.event))
            }
            None => {
                tracing::debug!("Run stream closed");
                self.run = None;
                None
            }
        }
    }

    /// Reply to a client text frame, if any.
    fn on_text(&mut self, text: &str) -> Option<ServerMessage> {
        match ClientMessage::parse(text) {
            Ok(ClientMessage::Ping) => Some(ServerMessage::pong()),
            Ok(ClientMessage::Run { .. }) if self.is_busy() => {
                Some(ServerMessage::busy(BUSY_MESSAGE))
            }
            Ok(ClientMessage::Run { task, payload }) => {
                match (RunRequest { task, payload }).validate() {
                    Ok(input) => {
                        self.run = Some(self.service.spawn(input));
                        None
                    }
                    Err(e) => Some(ServerMessage::error(e.to_string())),
                }
            }
            Err(message) => Some(ServerMessage::error(message)),
        }
    }
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    sender.send(Message::Text(message.to_json().into())).await
}

async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut sender, mut receiver) = socket.split();
    tracing::debug!("WebSocket client connected");

    let mut session = Session::new(Arc::clone(&state.service));

    let mut heartbeat = interval(HEARTBEAT_INTERVAL);
    heartbeat.reset();

    loop {
        let reply = tokio::select! {
            _ = heartbeat.tick() => {
                if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
                None
            }

            envelope = session.next_event() => session.on_event(envelope),

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => session.on_text(text.as_str()),
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                        None
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                        break;
                    }
                    Some(Ok(_)) => None,
                }
            }
        };

        if let Some(reply) = reply {
            if send(&mut sender, &reply).await.is_err() {
                break;
            }
        }
    }

    tracing::debug!(run_active = session.is_busy(), "WebSocket connection closed");
}
