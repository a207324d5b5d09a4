//! Jurisdiction-aware edit batching and dispatch.
//!
//! This crate sits between a bursty producer of voxel edits and a fleet
//! of spatially-partitioned voxel servers whose jurisdictions arrive
//! asynchronously.
//!
//! Typical integration loop:
//! 1. Keep a [`membership::ServerDirectory`] current with the fleet and
//!    feed jurisdiction broadcasts into a
//!    [`membership::JurisdictionDirectory`].
//! 2. Producer side: hand edits to
//!    [`sender::EditPacketSender::queue_edit_messages`] (batched) or
//!    [`sender::EditPacketSender::send_edit_message`] (single-shot);
//!    call [`sender::EditPacketSender::release_queued_messages`] when a
//!    burst ends.
//! 3. Tick [`sender::EditPacketSender::process`] periodically; it drains
//!    edits buffered before any server was known and then drives the
//!    outbound queue worker.

pub mod buffer;
pub mod config;
pub mod membership;
pub mod pending;
pub mod sender;
pub mod stats;

pub use buffer::EditPacketBuffer;
pub use config::{SenderConfig, SenderConfigBuilder, DEFAULT_MAX_PENDING_MESSAGES};
pub use membership::{JurisdictionDirectory, ServerDirectory, StaticDirectory, VoxelServer};
pub use pending::{PendingEditQueue, PendingPush};
pub use sender::EditPacketSender;
pub use stats::SenderStats;
