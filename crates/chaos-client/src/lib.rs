#![doc = include_str!("../README.md")]

mod client;
mod error;
mod poller;
mod sync;
mod types;

pub use client::AdminClient;
pub use error::ClientError;
pub use poller::{FeedHandle, TrafficFeedPoller};
pub use sync::SyncClient;
pub use types::*;
