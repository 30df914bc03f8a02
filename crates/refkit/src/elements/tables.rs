//! Refinement tables for the Bey subdivision of triangles and tetrahedra.
//!
//! The reference simplex of kind `k` has vertex 0 at the anchor, vertex 1 at
//! `anchor + h*e_i` with `i = k` (2D) or `i = k/2` (3D), vertex 2 at
//! `v1 + h*e_j` with `j = 1 - i` (2D) or `j = (i + 2) % 3` for even `k` and
//! `(i + 1) % 3` for odd `k` (3D), and (3D) vertex 3 at `anchor + h*(1,1,1)`.
//! Refinement follows J. Bey, "Tetrahedral grid refinement", Computing 55
//! (1995): the corner children 0..=dim keep the parent's shape at the
//! parent's vertices; the interior children split the inner octahedron
//! (2D: the inner triangle).
//!
//! The space-filling curve orders the children of one parent by
//! (cube id, kind). That single rule forces every table below; the values
//! were generated from the vertex formulas and exhaustively checked against
//! each other (parent of child, id round trips, successor chains, ancestor
//! kinds, neighbour involution) before being frozen here.
//!
//! A cube id is the 2- or 3-bit index of the child-sized sub-cube an element
//! occupies inside its parent's cube: bit 0 for x, bit 1 for y, bit 2 for z.

/// Parent kind of a triangle, by the triangle's cube id and kind.
pub const TRI_CID_KIND_TO_PARENT_KIND: [[u8; 2]; 4] = [
    [0, 1],
    [0, 0],
    [1, 1],
    [0, 1],
];

/// Bey child number of the child with a given local (curve) index, by
/// parent kind.
pub const TRI_LOCAL_INDEX_TO_BEY_ID: [[u8; 4]; 2] = [
    [0, 1, 3, 2],
    [0, 3, 1, 2],
];

/// Kind of the child with a given Bey number, by parent kind.
pub const TRI_KIND_OF_BEY_CHILD: [[u8; 4]; 2] = [
    [0, 0, 0, 1],
    [1, 1, 1, 0],
];

/// Kind of the child with a given local index, by parent kind.
pub const TRI_PARENT_KIND_LOCAL_INDEX_TO_KIND: [[u8; 4]; 2] = [
    [0, 0, 1, 0],
    [1, 0, 1, 1],
];

/// Cube id of the child with a given local index, by parent kind.
pub const TRI_PARENT_KIND_LOCAL_INDEX_TO_CID: [[u8; 4]; 2] = [
    [0, 1, 1, 3],
    [0, 2, 2, 3],
];

/// Local index of a triangle inside its parent, by kind and cube id.
pub const TRI_KIND_CID_TO_LOCAL_INDEX: [[u8; 4]; 2] = [
    [0, 1, 1, 3],
    [0, 2, 2, 3],
];

/// Parent vertex whose midpoint with the parent anchor is the anchor of a
/// Bey child. Child 0 sits at the anchor itself.
pub const TRI_BEY_ID_TO_VERTEX: [u8; 4] = [0, 1, 2, 1];

/// Parent kind of a tetrahedron, by the tetrahedron's cube id and kind.
pub const TET_CID_KIND_TO_PARENT_KIND: [[u8; 6]; 8] = [
    [0, 1, 2, 3, 4, 5],
    [0, 1, 1, 1, 0, 0],
    [2, 2, 2, 3, 3, 3],
    [1, 1, 2, 2, 2, 1],
    [5, 5, 4, 4, 4, 5],
    [0, 0, 0, 5, 5, 5],
    [4, 3, 3, 3, 4, 4],
    [0, 1, 2, 3, 4, 5],
];

/// Bey child number of the child with a given local (curve) index, by
/// parent kind.
pub const TET_LOCAL_INDEX_TO_BEY_ID: [[u8; 8]; 6] = [
    [0, 1, 4, 5, 2, 7, 6, 3],
    [0, 1, 5, 4, 7, 2, 6, 3],
    [0, 4, 5, 1, 2, 7, 6, 3],
    [0, 1, 5, 4, 6, 7, 2, 3],
    [0, 4, 5, 1, 6, 2, 7, 3],
    [0, 5, 4, 1, 6, 7, 2, 3],
];

/// Kind of the child with a given Bey number, by parent kind.
pub const TET_KIND_OF_BEY_CHILD: [[u8; 8]; 6] = [
    [0, 0, 0, 0, 4, 5, 2, 1],
    [1, 1, 1, 1, 3, 2, 5, 0],
    [2, 2, 2, 2, 0, 1, 4, 3],
    [3, 3, 3, 3, 5, 4, 1, 2],
    [4, 4, 4, 4, 2, 3, 0, 5],
    [5, 5, 5, 5, 1, 0, 3, 4],
];

/// Kind of the child with a given local index, by parent kind.
pub const TET_PARENT_KIND_LOCAL_INDEX_TO_KIND: [[u8; 8]; 6] = [
    [0, 0, 4, 5, 0, 1, 2, 0],
    [1, 1, 2, 3, 0, 1, 5, 1],
    [2, 0, 1, 2, 2, 3, 4, 2],
    [3, 3, 4, 5, 1, 2, 3, 3],
    [4, 2, 3, 4, 0, 4, 5, 4],
    [5, 0, 1, 5, 3, 4, 5, 5],
];

/// Cube id of the child with a given local index, by parent kind.
pub const TET_PARENT_KIND_LOCAL_INDEX_TO_CID: [[u8; 8]; 6] = [
    [0, 1, 1, 1, 5, 5, 5, 7],
    [0, 1, 1, 1, 3, 3, 3, 7],
    [0, 2, 2, 2, 3, 3, 3, 7],
    [0, 2, 2, 2, 6, 6, 6, 7],
    [0, 4, 4, 4, 6, 6, 6, 7],
    [0, 4, 4, 4, 5, 5, 5, 7],
];

/// Local index of a tetrahedron inside its parent, by kind and cube id.
pub const TET_KIND_CID_TO_LOCAL_INDEX: [[u8; 8]; 6] = [
    [0, 1, 1, 4, 1, 4, 4, 7],
    [0, 1, 2, 5, 2, 5, 4, 7],
    [0, 2, 3, 4, 1, 6, 5, 7],
    [0, 3, 1, 5, 2, 4, 6, 7],
    [0, 2, 2, 6, 3, 5, 5, 7],
    [0, 3, 3, 6, 3, 6, 6, 7],
];

/// Parent vertex whose midpoint with the parent anchor is the anchor of a
/// Bey child. Children 4..=7 split the inner octahedron and anchor at the
/// edge midpoints m01, m01, m02, m02.
pub const TET_BEY_ID_TO_VERTEX: [u8; 8] = [0, 1, 2, 3, 1, 1, 2, 2];
