/// Locally-recovered failure and throughput counters for one sender.
///
/// Nothing here ever propagates to the producer; a user-visible failure
/// is solely "my edit didn't appear".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SenderStats {
    /// Edits that landed in at least one per-server buffer.
    pub edits_routed: usize,
    /// Edits and whole packets that matched no server's jurisdiction.
    pub edits_unroutable: usize,
    /// Edits dropped because encoding failed or could never fit a packet.
    pub encode_failures: usize,
    /// Pre-server entries discarded under backpressure.
    pub pending_evictions: usize,
    /// Public calls ignored while sending was disabled.
    pub dropped_disabled: usize,
    /// Packets handed to the outbound queue.
    pub packets_queued: usize,
}
