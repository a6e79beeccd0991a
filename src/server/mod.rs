//! Vibes server core
//!
//! The inbound and outbound halves of a session never talk to each other
//! directly. [`ProcessAgentRequest`] writes requests into the session store;
//! [`VibeStreamLoop`] reads them back out on its next tick, runs handlers and
//! pushes frames through the session's [`VibeTransporter`].

mod context;
pub mod event_loop;
pub mod router;
pub mod transport;

pub use context::VibeContext;
pub use event_loop::{Tick, VibeStreamLoop};
pub use router::ProcessAgentRequest;
pub use transport::{format_frame, ChannelSink, FrameSink, RecordingSink, VibeTransporter};
