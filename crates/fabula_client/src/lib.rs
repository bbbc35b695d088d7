//! REST and push socket clients for the Fabula story service.
//!
//! - [`HttpStoryClient`] implements [`fabula_interface::StoryApi`] over HTTP/JSON
//! - [`StorySocket`] receives pushed turns for one story over a WebSocket
//!
//! # Example
//!
//! ```rust,no_run
//! use fabula_client::{ClientConfig, HttpStoryClient, StorySocket};
//! use fabula_interface::StoryApi;
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://127.0.0.1:8000", "ws://127.0.0.1:8000");
//!     let client = HttpStoryClient::new(config.clone())?;
//!
//!     let story = client.create_story().await?;
//!     let mut socket = StorySocket::connect(&config.socket_url, &story.story_id).await?;
//!
//!     let mut events = socket.events()?;
//!     while let Some(event) = events.next().await {
//!         println!("{:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod http;
mod socket;

pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use http::HttpStoryClient;
pub use socket::{StorySocket, decode_push_frame, socket_url};
