//! Channel/video resolution pipeline for a creator dashboard.
//!
//! Given a free-form query (a channel handle, a canonical channel ID, or a
//! pasted video URL), this crate resolves the canonical channel, assembles
//! its full video catalogue — preferring the local catalogue service and
//! falling back to the paginated platform API — optionally enriches each
//! video with a "top comment", normalizes/deduplicates/sorts the rows, and
//! publishes incremental [`state::ResultState`] snapshots to an observer
//! channel.
//!
//! # Sessions and race safety
//!
//! Every submission opens a [`session::SessionManager`] session; starting
//! a new one cancels the previous session's token. All publishes go
//! through [`state::StatePublisher`], which checks session currency
//! atomically at the point of publish, so overlapping queries can never
//! interleave their snapshots: a superseded resolution runs its in-flight
//! request to completion and then goes permanently silent.
//!
//! # Example
//!
//! ```rust,no_run
//! use channelscope::{ChannelResolver, Config, HttpTransport, ResolveOptions};
//! use std::sync::Arc;
//!
//! # async fn example() -> eyre::Result<()> {
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let resolver = ChannelResolver::new(&Config::from_env()?, Arc::new(HttpTransport::new()), tx);
//!
//! tokio::spawn(async move {
//!     while let Some(state) = rx.recv().await {
//!         println!("{} videos (loading: {})", state.videos.len(), state.is_loading);
//!     }
//! });
//!
//! resolver.resolve("@exampleChan", ResolveOptions::default()).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod enrich;
pub mod local_api;
pub mod normalize;
pub mod query;
pub mod records;
pub mod resolver;
pub mod session;
pub mod state;
pub mod subscription;
pub mod transport;
pub mod youtube_api;

pub use config::Config;
pub use query::{ChannelQuery, QueryTarget};
pub use records::{ChannelRecord, TopComment, VideoRecord, VideoSource};
pub use resolver::{ChannelResolver, ResolveOptions, Resolution};
pub use session::{SessionManager, SessionToken};
pub use state::{ResultState, StateObserver, StatePublisher};
pub use transport::{HttpTransport, Transport, TransportError};
