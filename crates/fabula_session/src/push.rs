//! Draining push socket events into a session.

use crate::StorySession;
use fabula_core::PushEvent;
use futures_util::{Stream, StreamExt};
use tracing::{debug, info, instrument, warn};

impl StorySession {
    /// Append every pushed turn until the stream reports the socket closed.
    ///
    /// Lifecycle events are logged, never stored. Returns the number of turns
    /// appended.
    #[instrument(skip_all)]
    pub async fn attach_push_stream<S>(&self, events: S) -> usize
    where
        S: Stream<Item = PushEvent>,
    {
        let mut events = std::pin::pin!(events);
        let mut appended = 0;

        while let Some(event) = events.next().await {
            match event {
                PushEvent::Opened => debug!("Push socket opened"),
                PushEvent::Turn(turn) => {
                    if self.append_pushed_turn(turn).await {
                        appended += 1;
                    }
                }
                PushEvent::Error(message) => warn!(error = %message, "Push socket error"),
                PushEvent::Closed => {
                    info!(appended, "Push socket closed");
                    break;
                }
            }
        }

        appended
    }
}
