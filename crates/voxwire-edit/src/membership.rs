use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use tracing::warn;
use uuid::Uuid;
use voxwire_proto::{JurisdictionMap, ProtoError};

/// One voxel server as seen in a membership snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelServer {
    pub id: Uuid,
    /// The server's active socket, if one has been established.
    pub socket: Option<SocketAddr>,
}

impl VoxelServer {
    pub fn new(id: Uuid, socket: Option<SocketAddr>) -> Self {
        Self { id, socket }
    }
}

/// Membership service contract: who the voxel servers are right now.
///
/// `voxel_servers` returns a point-in-time snapshot; the set may change
/// between calls. An implementation is free to side-effect while
/// answering (for example, ping a server that has no active socket yet).
pub trait ServerDirectory {
    fn voxel_servers(&self) -> Vec<VoxelServer>;
}

/// Directory backed by an explicit server list, for tests and
/// simulations.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    servers: RwLock<Vec<VoxelServer>>,
}

impl StaticDirectory {
    /// Adds (or replaces) a server entry.
    pub fn upsert(&self, server: VoxelServer) {
        let mut servers = match self.servers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match servers.iter_mut().find(|existing| existing.id == server.id) {
            Some(existing) => *existing = server,
            None => servers.push(server),
        }
    }

    /// Drops a server entry.
    pub fn remove(&self, id: Uuid) {
        let mut servers = match self.servers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        servers.retain(|server| server.id != id);
    }
}

impl ServerDirectory for StaticDirectory {
    fn voxel_servers(&self) -> Vec<VoxelServer> {
        match self.servers.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Read-copy-swap table of per-server jurisdictions.
///
/// The broadcast subscriber owns updates; the sender only takes
/// snapshots. A snapshot is one immutable map, so a classify pass sees
/// either the old or the new table, never a mix.
#[derive(Debug, Default)]
pub struct JurisdictionDirectory {
    table: RwLock<Arc<HashMap<Uuid, JurisdictionMap>>>,
}

impl JurisdictionDirectory {
    /// The current table; cheap to take, immutable once held.
    pub fn snapshot(&self) -> Arc<HashMap<Uuid, JurisdictionMap>> {
        match self.table.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Installs `map` as `server`'s jurisdiction (copy-on-write).
    pub fn set(&self, server: Uuid, map: JurisdictionMap) {
        self.update(|table| {
            table.insert(server, map);
        });
    }

    /// Forgets `server`'s jurisdiction (copy-on-write).
    pub fn remove(&self, server: Uuid) {
        self.update(|table| {
            table.remove(&server);
        });
    }

    /// Decodes and installs a jurisdiction broadcast payload.
    ///
    /// A malformed broadcast is rejected whole: the previous map for
    /// `server` (if any) stays in place.
    pub fn ingest_broadcast(&self, server: Uuid, payload: &[u8]) -> Result<(), ProtoError> {
        match JurisdictionMap::decode(payload) {
            Ok(map) => {
                self.set(server, map);
                Ok(())
            }
            Err(err) => {
                warn!("rejecting malformed jurisdiction broadcast from {server}: {err}");
                Err(err)
            }
        }
    }

    fn update(&self, apply: impl FnOnce(&mut HashMap<Uuid, JurisdictionMap>)) {
        let mut guard = match self.table.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = HashMap::clone(&guard);
        apply(&mut next);
        *guard = Arc::new(next);
    }
}
