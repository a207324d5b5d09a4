use std::collections::VecDeque;

use voxwire_proto::PacketType;

/// Outcome of offering an entry to the pre-server queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingPush {
    /// Stored without displacing anything.
    Stored,
    /// Stored; the oldest entry of the same queue was evicted to stay
    /// under the cap.
    Evicted,
    /// The cap is zero; the entry was dropped.
    Dropped,
}

/// Edits accepted before any voxel server is known.
///
/// Two FIFOs: whole single-message packets (already stamped with a
/// sequence number and timestamp, replayed verbatim on drain) and
/// packable raw payloads (re-batched into fresh packets on drain). The
/// combined length never exceeds the cap; overflow evicts the oldest
/// entry, never the newest.
#[derive(Debug)]
pub struct PendingEditQueue {
    single: VecDeque<Vec<u8>>,
    packable: VecDeque<(PacketType, Vec<u8>)>,
    max_pending: usize,
}

impl PendingEditQueue {
    pub fn new(max_pending: usize) -> Self {
        Self {
            single: VecDeque::new(),
            packable: VecDeque::new(),
            max_pending,
        }
    }

    /// Combined length of both queues.
    pub fn len(&self) -> usize {
        self.single.len() + self.packable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.packable.is_empty()
    }

    /// Offers a whole single-message packet.
    pub fn push_single(&mut self, packet: Vec<u8>) -> PendingPush {
        if self.max_pending == 0 {
            return PendingPush::Dropped;
        }
        self.single.push_back(packet);
        if self.len() > self.max_pending {
            self.single.pop_front();
            return PendingPush::Evicted;
        }
        PendingPush::Stored
    }

    /// Offers a packable raw payload.
    pub fn push_packable(&mut self, packet_type: PacketType, payload: Vec<u8>) -> PendingPush {
        if self.max_pending == 0 {
            return PendingPush::Dropped;
        }
        self.packable.push_back((packet_type, payload));
        if self.len() > self.max_pending {
            self.packable.pop_front();
            return PendingPush::Evicted;
        }
        PendingPush::Stored
    }

    /// Oldest buffered single-message packet.
    pub fn pop_single(&mut self) -> Option<Vec<u8>> {
        self.single.pop_front()
    }

    /// Oldest buffered packable payload.
    pub fn pop_packable(&mut self) -> Option<(PacketType, Vec<u8>)> {
        self.packable.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use voxwire_proto::PacketType;

    use super::{PendingEditQueue, PendingPush};

    #[test]
    fn combined_length_never_exceeds_the_cap() {
        let mut queue = PendingEditQueue::new(3);
        assert_eq!(queue.push_single(vec![0]), PendingPush::Stored);
        assert_eq!(
            queue.push_packable(PacketType::SetVoxel, vec![1]),
            PendingPush::Stored
        );
        assert_eq!(queue.push_single(vec![2]), PendingPush::Stored);
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.push_single(vec![3]), PendingPush::Evicted);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn overflow_evicts_the_oldest_of_the_pushed_queue() {
        let mut queue = PendingEditQueue::new(2);
        queue.push_single(vec![0]);
        queue.push_single(vec![1]);
        queue.push_single(vec![2]);

        assert_eq!(queue.pop_single(), Some(vec![1]));
        assert_eq!(queue.pop_single(), Some(vec![2]));
        assert_eq!(queue.pop_single(), None);
    }

    #[test]
    fn packable_overflow_does_not_touch_single_messages() {
        let mut queue = PendingEditQueue::new(2);
        queue.push_single(vec![9]);
        queue.push_packable(PacketType::SetVoxel, vec![0]);
        assert_eq!(
            queue.push_packable(PacketType::SetVoxel, vec![1]),
            PendingPush::Evicted
        );

        assert_eq!(queue.pop_single(), Some(vec![9]));
        assert_eq!(queue.pop_packable(), Some((PacketType::SetVoxel, vec![1])));
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_cap_drops_new_entries() {
        let mut queue = PendingEditQueue::new(0);
        assert_eq!(queue.push_single(vec![0]), PendingPush::Dropped);
        assert_eq!(
            queue.push_packable(PacketType::EraseVoxel, vec![1]),
            PendingPush::Dropped
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn queues_drain_in_fifo_order() {
        let mut queue = PendingEditQueue::new(8);
        queue.push_packable(PacketType::SetVoxel, vec![0]);
        queue.push_packable(PacketType::EraseVoxel, vec![1]);

        assert_eq!(queue.pop_packable(), Some((PacketType::SetVoxel, vec![0])));
        assert_eq!(queue.pop_packable(), Some((PacketType::EraseVoxel, vec![1])));
    }
}
