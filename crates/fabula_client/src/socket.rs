//! WebSocket push channel for a single story.
//!
//! The server pushes every turn it stores for a story as a JSON text frame. The
//! client may also send prompts over the same socket, which the server answers
//! with more pushed turns.
//!
//! No reconnect policy is applied: when the socket closes the event stream ends
//! with [`PushEvent::Closed`] and the caller decides what to do next.

use async_stream::stream;
use fabula_core::{PushEvent, PushPrompt, StoryId, Turn};
use fabula_error::{FabulaResult, JsonError, SocketError, SocketErrorKind};
use futures_util::stream::{BoxStream, SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, trace, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Socket address for a story: `{socket_base}/ws/story/{story_id}`.
///
/// # Examples
///
/// ```
/// use fabula_client::socket_url;
/// use fabula_core::StoryId;
///
/// let url = socket_url("ws://127.0.0.1:8000/", &StoryId::from("abc"));
/// assert_eq!(url, "ws://127.0.0.1:8000/ws/story/abc");
/// ```
pub fn socket_url(socket_base: &str, story_id: &StoryId) -> String {
    format!("{}/ws/story/{}", socket_base.trim_end_matches('/'), story_id)
}

/// Decode one pushed frame into a turn.
///
/// # Examples
///
/// ```
/// use fabula_client::decode_push_frame;
///
/// let turn = decode_push_frame(r#"{"story_id":"s1","turn":-1,"author":"ai","text":"..."}"#).unwrap();
/// assert!(turn.is_provisional());
///
/// assert!(decode_push_frame("not json").is_err());
/// ```
pub fn decode_push_frame(frame: &str) -> Result<Turn, JsonError> {
    serde_json::from_str(frame)
        .map_err(|e| JsonError::new(format!("Pushed frame is not a turn: {}", e)))
}

/// Active push socket for one story.
pub struct StorySocket {
    story_id: StoryId,
    writer: SplitSink<WsStream, Message>,
    reader: Option<SplitStream<WsStream>>,
}

impl StorySocket {
    /// Connect to the push socket of `story_id`.
    #[instrument(name = "story_socket_connect", skip(socket_base), fields(story_id = %story_id))]
    pub async fn connect(socket_base: &str, story_id: &StoryId) -> FabulaResult<Self> {
        if story_id.is_empty() {
            return Err(SocketError::new(SocketErrorKind::InvalidUrl(
                "story id is empty".to_string(),
            ))
            .into());
        }

        let url = socket_url(socket_base, story_id);
        info!("Connecting to push socket: {}", url);

        let (ws_stream, _) = connect_async(url.as_str()).await.map_err(|e| {
            error!("WebSocket connection failed: {}", e);
            SocketError::new(SocketErrorKind::Connection(e.to_string()))
        })?;

        debug!("WebSocket connection established");

        let (writer, reader) = ws_stream.split();
        Ok(Self {
            story_id: story_id.clone(),
            writer,
            reader: Some(reader),
        })
    }

    /// Story this socket is bound to.
    pub fn story_id(&self) -> &StoryId {
        &self.story_id
    }

    /// Send a prompt; the answer arrives as pushed turns.
    #[instrument(skip(self, prompt), fields(story_id = %self.story_id, rounds = prompt.rounds))]
    pub async fn send_prompt(&mut self, prompt: &PushPrompt) -> FabulaResult<()> {
        let json = serde_json::to_string(prompt)
            .map_err(|e| JsonError::new(format!("Failed to encode prompt: {}", e)))?;

        trace!("Prompt JSON: {}", json);

        self.writer
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| {
                error!("Failed to send prompt: {}", e);
                SocketError::new(SocketErrorKind::Send(e.to_string()))
            })?;

        debug!("Prompt sent");
        Ok(())
    }

    /// Take the stream of push events.
    ///
    /// The stream starts with [`PushEvent::Opened`], yields one
    /// [`PushEvent::Turn`] per well-formed frame, and ends with
    /// [`PushEvent::Closed`]. Frames that are not turns are logged and dropped.
    ///
    /// # Errors
    ///
    /// The events can be taken once; later calls fail with
    /// [`SocketErrorKind::Closed`].
    pub fn events(&mut self) -> FabulaResult<BoxStream<'static, PushEvent>> {
        let mut reader = self
            .reader
            .take()
            .ok_or_else(|| SocketError::new(SocketErrorKind::Closed))?;
        let story_id = self.story_id.clone();

        let events = stream! {
            yield PushEvent::Opened;

            while let Some(frame) = reader.next().await {
                match frame {
                    Ok(Message::Text(text)) => match decode_push_frame(text.as_str()) {
                        Ok(turn) => {
                            trace!(story_id = %story_id, turn = turn.turn, "Received pushed turn");
                            yield PushEvent::Turn(turn);
                        }
                        Err(e) => {
                            warn!(story_id = %story_id, error = %e.message, "Dropping malformed push frame");
                        }
                    },
                    Ok(Message::Binary(bytes)) => {
                        match std::str::from_utf8(&bytes).map_err(|e| e.to_string()).and_then(|text| {
                            decode_push_frame(text).map_err(|e| e.message)
                        }) {
                            Ok(turn) => {
                                yield PushEvent::Turn(turn);
                            }
                            Err(e) => {
                                warn!(story_id = %story_id, error = %e, "Dropping malformed binary frame");
                            }
                        }
                    }
                    Ok(Message::Close(reason)) => {
                        debug!(story_id = %story_id, ?reason, "Server closed push socket");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(story_id = %story_id, "Push socket error: {}", e);
                        yield PushEvent::Error(e.to_string());
                        break;
                    }
                }
            }

            yield PushEvent::Closed;
        };

        Ok(events.boxed())
    }

    /// Close the socket politely.
    #[instrument(skip(self), fields(story_id = %self.story_id))]
    pub async fn close(&mut self) -> FabulaResult<()> {
        self.writer.close().await.map_err(|e| {
            SocketError::new(SocketErrorKind::Send(format!("Close failed: {}", e)))
        })?;
        info!("Push socket closed");
        Ok(())
    }
}
