//! Core voxwire spatial-addressing primitives shared across crates.
//!
//! An [`OctalCode`] names a node in a sparse octree by its root-to-node
//! path, three bits per level, packed into a variable-length byte string
//! with an inline section-count header. Every operation here is bit-exact
//! against the fleet wire format; a code that decodes is always fully
//! valid (count matches the packed contents, trailing pad bits zero).

pub mod error;
pub mod octal;
pub mod voxel;

pub use error::OctalCodeError;
pub use octal::{
    bytes_required, compare_code_slices, section_count, CodeComparison, LengthBound, OctalCode,
};
pub use voxel::VoxelExtent;
