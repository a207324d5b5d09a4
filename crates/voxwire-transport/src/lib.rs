//! Outbound packet plumbing for voxwire senders.
//!
//! The edit path never writes a socket directly: it hands finished
//! packets to an [`OutboundQueue`], and a worker drains that queue on its
//! own `process` cadence. [`InMemoryQueue`] captures traffic for tests
//! and simulations; [`UdpOutbound`] is the best-effort UDP worker.

pub mod queue;
pub mod udp;

pub use queue::{InMemoryQueue, NetworkPacket, OutboundQueue};
pub use udp::UdpOutbound;
