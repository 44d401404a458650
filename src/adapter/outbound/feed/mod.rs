//! Live movement feed adapter.

mod channel;

pub use channel::{ChannelFeed, FeedPublisher, UnitState};
