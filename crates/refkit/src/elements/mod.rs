mod hex;
mod line;
mod prism;
mod quad;
mod tables;
mod tet;
mod tri;

pub use self::hex::Hex;
pub use self::line::Line;
pub use self::prism::Prism;
pub use self::quad::{Quad, Surround};
pub use self::tet::Tet;
pub use self::tri::Tri;

/// Position of an element on the space-filling curve of one refinement
/// level. A hexahedron at level 30 needs 90 bits, so the index is 128 bits
/// wide for every class.
pub type LinearId = u128;
