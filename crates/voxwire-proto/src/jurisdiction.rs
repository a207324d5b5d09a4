use std::fmt;

use voxwire_core::OctalCode;

use crate::error::ProtoError;

/// Where a queried code falls relative to one server's jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// The server owns the queried node.
    Within,
    /// The query covers more than the server owns (strict ancestor of
    /// the jurisdiction root).
    Above,
    /// The query lies strictly inside a carved-out end-node subtree.
    Below,
    /// The query is unrelated to this jurisdiction.
    NotMine,
}

/// One server's claim over octree space: a root it owns, minus the
/// subtrees strictly below its end nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JurisdictionMap {
    root: OctalCode,
    end_nodes: Vec<OctalCode>,
}

impl JurisdictionMap {
    pub fn new(root: OctalCode, end_nodes: Vec<OctalCode>) -> Self {
        Self { root, end_nodes }
    }

    /// A jurisdiction covering the whole subtree under `root`.
    pub fn for_root(root: OctalCode) -> Self {
        Self::new(root, Vec::new())
    }

    pub fn root(&self) -> &OctalCode {
        &self.root
    }

    pub fn end_nodes(&self) -> &[OctalCode] {
        &self.end_nodes
    }

    /// Classifies `code` against this jurisdiction.
    ///
    /// `trailing_child` extends the query by one section, probing a
    /// prospective child without allocating its code. An end node itself
    /// remains [`Containment::Within`]; only its strict descendants are
    /// [`Containment::Below`].
    pub fn containment(&self, code: &OctalCode, trailing_child: Option<u8>) -> Containment {
        let root_covers_query = self.root.is_ancestor_of(code, trailing_child);
        let query_covers_root = extended_is_ancestor(code, trailing_child, &self.root);
        if !root_covers_query && !query_covers_root {
            return Containment::NotMine;
        }
        if query_covers_root && !root_covers_query {
            return Containment::Above;
        }
        for end_node in &self.end_nodes {
            if end_node.is_ancestor_of(code, trailing_child)
                && !extended_is_ancestor(code, trailing_child, end_node)
            {
                return Containment::Below;
            }
        }
        Containment::Within
    }

    /// Serialises the broadcast wire form: root code, end-node count
    /// (u16 LE), then the end-node codes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(self.root.as_bytes());
        out.extend_from_slice(&(self.end_nodes.len() as u16).to_le_bytes());
        for end_node in &self.end_nodes {
            out.extend_from_slice(end_node.as_bytes());
        }
        out
    }

    /// Parses a broadcast payload, rejecting structural damage: a map
    /// either decodes completely or not at all.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtoError> {
        let root = OctalCode::from_bytes(bytes)?;
        let mut at = root.as_bytes().len();
        let count_raw: [u8; 2] = bytes
            .get(at..at + 2)
            .and_then(|s| s.try_into().ok())
            .ok_or(ProtoError::MalformedJurisdiction("missing end-node count"))?;
        at += 2;
        let count = u16::from_le_bytes(count_raw) as usize;
        let mut end_nodes = Vec::with_capacity(count);
        for _ in 0..count {
            let end_node = OctalCode::from_bytes(&bytes[at.min(bytes.len())..])?;
            at += end_node.as_bytes().len();
            end_nodes.push(end_node);
        }
        if at != bytes.len() {
            return Err(ProtoError::MalformedJurisdiction("trailing bytes"));
        }
        Ok(Self::new(root, end_nodes))
    }
}

impl fmt::Display for JurisdictionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root={}", self.root.to_hex())?;
        write!(f, " ends=[")?;
        for (index, end_node) in self.end_nodes.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", end_node.to_hex())?;
        }
        write!(f, "]")
    }
}

/// True when `code` extended by `trailing_child` is an ancestor of (or
/// equal to) `other`.
fn extended_is_ancestor(code: &OctalCode, trailing_child: Option<u8>, other: &OctalCode) -> bool {
    match trailing_child {
        None => code.is_ancestor_of(other, None),
        Some(child) => {
            if code.sections() + 1 > other.sections() {
                return false;
            }
            code.is_ancestor_of(other, None) && other.section(code.sections()) == (child & 0x07)
        }
    }
}
