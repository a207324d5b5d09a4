use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;
use voxwire_core::OctalCode;
use voxwire_proto::{
    code_in_edit_packet, encode_edit_details, encode_edit_message, write_edit_preamble,
    Containment, PacketType, VoxelEdit,
};
use voxwire_transport::OutboundQueue;

use crate::buffer::{unix_usec_now, EditPacketBuffer};
use crate::config::SenderConfig;
use crate::membership::{JurisdictionDirectory, ServerDirectory};
use crate::pending::{PendingEditQueue, PendingPush};
use crate::stats::SenderStats;

/// Routes voxel edits to the servers whose jurisdiction they fall in,
/// coalescing many small edits into few packets.
///
/// All state is touched from one thread: the producer's calls and the
/// periodic [`process`](Self::process) tick. Jurisdiction and membership
/// are read as per-call snapshots, so their owners may swap them
/// concurrently. Socket writes never happen here; finished packets go to
/// the outbound queue worker.
pub struct EditPacketSender<D, Q> {
    config: SenderConfig,
    directory: Arc<D>,
    jurisdictions: Arc<JurisdictionDirectory>,
    outbound: Q,
    should_send: bool,
    sequence: u16,
    pending_packets: HashMap<Uuid, EditPacketBuffer>,
    pre_server: PendingEditQueue,
    release_pending: bool,
    stats: SenderStats,
}

impl<D: ServerDirectory, Q: OutboundQueue> EditPacketSender<D, Q> {
    pub fn new(
        config: SenderConfig,
        directory: Arc<D>,
        jurisdictions: Arc<JurisdictionDirectory>,
        outbound: Q,
    ) -> Self {
        Self {
            config,
            directory,
            jurisdictions,
            outbound,
            should_send: true,
            sequence: 0,
            pending_packets: HashMap::new(),
            pre_server: PendingEditQueue::new(config.max_pending_messages),
            release_pending: false,
            stats: SenderStats::default(),
        }
    }

    /// When false, every public entry point is a counted no-op. Used to
    /// quiesce the sender across a disconnect.
    pub fn set_should_send(&mut self, should_send: bool) {
        self.should_send = should_send;
    }

    pub fn should_send(&self) -> bool {
        self.should_send
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    pub fn stats(&self) -> SenderStats {
        self.stats
    }

    /// Combined length of the pre-server queues.
    pub fn pre_server_pending(&self) -> usize {
        self.pre_server.len()
    }

    pub fn outbound(&self) -> &Q {
        &self.outbound
    }

    pub fn outbound_mut(&mut self) -> &mut Q {
        &mut self.outbound
    }

    /// True when edits can be routed: at least one voxel server has an
    /// active socket, and every such server's jurisdiction is known.
    pub fn servers_ready(&self) -> bool {
        let jurisdictions = self.jurisdictions.snapshot();
        let mut any_active = false;
        for server in self.directory.voxel_servers() {
            if server.socket.is_some() {
                if !jurisdictions.contains_key(&server.id) {
                    return false;
                }
                any_active = true;
            }
        }
        any_active
    }

    /// Encodes one edit as a whole single-message packet and dispatches
    /// it, or buffers the finished packet while no servers are known.
    pub fn send_edit_message(&mut self, packet_type: PacketType, edit: &VoxelEdit) {
        if !self.should_send {
            self.stats.dropped_disabled += 1;
            return;
        }
        let sequence = self.next_sequence();
        let packet = match encode_edit_message(
            packet_type,
            sequence,
            unix_usec_now(),
            std::slice::from_ref(edit),
            self.config.max_packet_size,
        ) {
            Ok(packet) => packet,
            Err(err) => {
                self.stats.encode_failures += 1;
                debug!("single edit message failed to encode, dropping: {err}");
                return;
            }
        };
        if !self.servers_ready() {
            let outcome = self.pre_server.push_single(packet);
            self.note_pending_push(outcome);
            return;
        }
        self.queue_packet_to_nodes(&packet);
    }

    /// Encodes each detail and feeds it to the batching entry point.
    pub fn queue_edit_messages(&mut self, packet_type: PacketType, edits: &[VoxelEdit]) {
        if !self.should_send {
            self.stats.dropped_disabled += 1;
            return;
        }
        for edit in edits {
            match encode_edit_details(std::slice::from_ref(edit), self.config.max_packet_size) {
                Ok(payload) => self.queue_edit_message(packet_type, &payload),
                Err(err) => {
                    self.stats.encode_failures += 1;
                    debug!("edit detail failed to encode, dropping: {err}");
                }
            }
        }
    }

    /// The batching entry point: classifies one encoded octal-code+colour
    /// payload against every known voxel server and appends it to each
    /// matching per-server buffer, flushing full or type-switching
    /// buffers first. Buffers the payload while no servers are known.
    pub fn queue_edit_message(&mut self, packet_type: PacketType, payload: &[u8]) {
        if !self.should_send {
            self.stats.dropped_disabled += 1;
            return;
        }
        if !self.servers_ready() {
            let outcome = self.pre_server.push_packable(packet_type, payload.to_vec());
            self.note_pending_push(outcome);
            return;
        }
        if !self.payload_can_fit(packet_type, payload) {
            self.stats.encode_failures += 1;
            warn!(
                "edit payload of {} bytes can never fit a {}-byte packet, dropping",
                payload.len(),
                self.config.max_packet_size
            );
            return;
        }
        let code = match OctalCode::from_bytes(payload) {
            Ok(code) => code,
            Err(err) => {
                self.stats.encode_failures += 1;
                warn!("edit payload with undecodable octal code, dropping: {err}");
                return;
            }
        };

        let jurisdictions = self.jurisdictions.snapshot();
        let mut matched = false;
        for server in self.directory.voxel_servers() {
            if server.socket.is_none() {
                continue;
            }
            // a server whose jurisdiction is unknown is never mine
            let Some(map) = jurisdictions.get(&server.id) else {
                continue;
            };
            if map.containment(&code, None) != Containment::Within {
                continue;
            }
            matched = true;
            self.append_to_server_buffer(server.id, packet_type, payload);
        }
        if matched {
            self.stats.edits_routed += 1;
        } else {
            self.stats.edits_unroutable += 1;
            debug!("edit {code} matched no server jurisdiction, dropping");
        }
    }

    /// Dispatches a whole pre-encoded edit packet to every server whose
    /// jurisdiction contains its leading octal code. No coalescing: each
    /// matching server receives the literal packet.
    pub fn queue_packet_to_nodes(&mut self, packet: &[u8]) {
        if !self.should_send {
            self.stats.dropped_disabled += 1;
            return;
        }
        let code = match code_in_edit_packet(packet) {
            Ok(code) => code,
            Err(err) => {
                self.stats.encode_failures += 1;
                warn!("edit packet with undecodable octal code, dropping: {err}");
                return;
            }
        };
        let jurisdictions = self.jurisdictions.snapshot();
        let mut matched = false;
        for server in self.directory.voxel_servers() {
            if server.socket.is_none() {
                continue;
            }
            let Some(map) = jurisdictions.get(&server.id) else {
                continue;
            };
            if map.containment(&code, None) == Containment::Within {
                matched = true;
                self.queue_packet_to_node(Some(server.id), packet);
            }
        }
        if !matched {
            self.stats.edits_unroutable += 1;
            debug!("packet for {code} matched no server jurisdiction, dropping");
        }
    }

    /// Pushes literal packet bytes to one server's outbound queue, or to
    /// every voxel server when `server` is `None` (broadcast).
    pub fn queue_packet_to_node(&mut self, server: Option<Uuid>, packet: &[u8]) {
        if !self.should_send {
            self.stats.dropped_disabled += 1;
            return;
        }
        for candidate in self.directory.voxel_servers() {
            if server.is_some_and(|id| id != candidate.id) {
                continue;
            }
            let Some(socket) = candidate.socket else {
                continue;
            };
            self.outbound.queue_packet(socket, packet);
            self.stats.packets_queued += 1;
        }
    }

    /// Flushes every per-server buffer to the outbound queue. Before any
    /// server is known the request is remembered and honoured by the
    /// first `process` tick that drains the pre-server queues.
    pub fn release_queued_messages(&mut self) {
        if !self.should_send {
            self.stats.dropped_disabled += 1;
            return;
        }
        if !self.servers_ready() {
            self.release_pending = true;
            return;
        }
        let servers: Vec<Uuid> = self.pending_packets.keys().copied().collect();
        for server in servers {
            self.release_server_buffer(server);
        }
    }

    /// The periodic tick: replays edits buffered before servers were
    /// known, honours a pending release, then runs the outbound queue
    /// worker's own process step and returns its result.
    pub fn process(&mut self) -> bool {
        if self.should_send && self.servers_ready() && !self.pre_server.is_empty() {
            self.drain_pre_server_queues();
        }
        self.outbound.process()
    }

    fn next_sequence(&mut self) -> u16 {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        sequence
    }

    fn payload_can_fit(&self, packet_type: PacketType, payload: &[u8]) -> bool {
        let mut probe = Vec::new();
        let preamble = write_edit_preamble(&mut probe, packet_type, 0, 0);
        preamble + payload.len() <= self.config.max_packet_size
    }

    fn note_pending_push(&mut self, outcome: PendingPush) {
        match outcome {
            PendingPush::Stored => {}
            PendingPush::Evicted => {
                self.stats.pending_evictions += 1;
                debug!("pre-server queue over capacity, evicted the oldest entry");
            }
            PendingPush::Dropped => {
                self.stats.pending_evictions += 1;
            }
        }
    }

    fn append_to_server_buffer(&mut self, server: Uuid, packet_type: PacketType, payload: &[u8]) {
        let max = self.config.max_packet_size;
        let needs_flush = self.pending_packets.get(&server).is_some_and(|buffer| {
            (!buffer.is_empty() && buffer.current_type() != Some(packet_type))
                || buffer.len() + payload.len() > max
        });
        if needs_flush {
            self.release_server_buffer(server);
        }
        let needs_init = self
            .pending_packets
            .get(&server)
            .map_or(true, |buffer| buffer.current_type().is_none());
        if needs_init {
            let sequence = self.next_sequence();
            let created_at = unix_usec_now();
            self.pending_packets
                .entry(server)
                .or_insert_with(|| EditPacketBuffer::new(server, max))
                .initialize(packet_type, sequence, created_at);
        }
        if let Some(buffer) = self.pending_packets.get_mut(&server) {
            if !buffer.append(payload) {
                self.stats.encode_failures += 1;
                warn!("edit payload still over capacity after flush, dropping");
            }
        }
    }

    fn release_server_buffer(&mut self, server: Uuid) {
        let Some(buffer) = self.pending_packets.get_mut(&server) else {
            return;
        };
        let Some((_, bytes)) = buffer.take() else {
            return;
        };
        self.queue_packet_to_node(Some(server), &bytes);
    }

    fn drain_pre_server_queues(&mut self) {
        // single-message packets were wrapped at a point in time and are
        // replayed verbatim; packable payloads are re-batched with fresh
        // sequence numbers
        while let Some(packet) = self.pre_server.pop_single() {
            self.queue_packet_to_nodes(&packet);
        }
        while let Some((packet_type, payload)) = self.pre_server.pop_packable() {
            self.queue_edit_message(packet_type, &payload);
        }
        if self.release_pending {
            self.release_pending = false;
            self.release_queued_messages();
        }
    }
}
