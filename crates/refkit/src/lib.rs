/// This module defines the element class tag and the dimension enum.
///
/// An element class groups every element that refines with the same rule
/// (quadrilateral, hexahedron, triangle, tetrahedron, prism, line). The
/// class tag is carried by the owning scheme rather than per element.
pub mod eclass;
/// This module holds the per-class element kernels.
///
/// Each kernel is a plain-old-data record (anchor coordinates, level and,
/// for simplices, a kind discriminant) together with the pure functions
/// that navigate the implicit refinement tree and the space-filling curve:
/// parent, children, siblings, ancestors, descendants, face neighbours,
/// linear ids, successors. Every operation writes a freshly computed value;
/// no kernel allocates.
pub mod elements;
/// This module exposes the polymorphic element scheme.
///
/// A [`scheme::Scheme`] is the capability set of one element class: the
/// forest dispatches operations on opaque [`scheme::Element`] values and
/// never names a concrete record. The scheme also owns the element pool
/// used by `new_element`/`destroy_element`.
pub mod scheme;

pub mod prelude {
    pub use crate::eclass::{Dimension, Eclass};
    pub use crate::elements::{Hex, Line, LinearId, Prism, Quad, Surround, Tet, Tri};
    pub use crate::scheme::{Element, ElementPool, Scheme};
}
