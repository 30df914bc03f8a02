use serde::{Deserialize, Serialize};

/// Topological dimension of an element class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Dimension {
    D0,
    D1,
    D2,
    D3,
}

/// All element classes supported in refkit.
///
/// A class fixes the refinement rule and the space-filling-curve layout of
/// one kind of element. Quadrilaterals and hexahedra refine by the plain
/// Morton rule, triangles and tetrahedra by the Bey rule with a per-element
/// kind discriminant, and prisms as the tensor product triangle x line.
/// `Line` appears as the boundary class of quadrilateral and triangle faces
/// and as the vertical factor of the prism; forests do not build line trees
/// on their own.
#[repr(u8)]
#[derive(Debug, Eq, Hash, Copy, Clone, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Eclass {
    Quad,
    Hex,
    Tri,
    Tet,
    Prism,
    Line,
}

impl Eclass {
    pub fn dimension(&self) -> Dimension {
        use Eclass::*;
        match self {
            Line => Dimension::D1,
            Quad | Tri => Dimension::D2,
            Hex | Tet | Prism => Dimension::D3,
        }
    }

    /// Number of children produced by one refinement step.
    pub fn num_children(&self) -> usize {
        use Eclass::*;
        match self {
            Line => 2,
            Quad | Tri => 4,
            Hex | Tet | Prism => 8,
        }
    }

    pub fn num_faces(&self) -> usize {
        use Eclass::*;
        match self {
            Line => 2,
            Tri => 3,
            Quad | Tet => 4,
            Prism => 5,
            Hex => 6,
        }
    }

    pub fn num_vertices(&self) -> usize {
        use Eclass::*;
        match self {
            Line => 2,
            Tri => 3,
            Quad | Tet => 4,
            Prism => 6,
            Hex => 8,
        }
    }

    /// Deepest refinement level representable by the class's bit record.
    pub fn max_level(&self) -> u8 {
        use Eclass::*;
        match self {
            Quad | Hex => 30,
            Tri | Tet | Prism | Line => 21,
        }
    }

    /// Edge length of the root cell in anchor-coordinate units.
    pub fn root_len(&self) -> i32 {
        1 << self.max_level()
    }

    /// Class of the `child_id`-th child. Refinement never changes the class.
    pub fn child_eclass(&self, child_id: usize) -> Eclass {
        assert!(
            child_id < self.num_children(),
            "child id {child_id} out of range for {self:?}"
        );
        *self
    }

    /// Class of the codimension-one element sitting on the given face.
    pub fn boundary_class(&self, face: usize) -> Eclass {
        use Eclass::*;
        assert!(
            face < self.num_faces(),
            "face {face} out of range for {self:?}"
        );
        match self {
            Quad | Tri => Line,
            Hex => Quad,
            Tet => Tri,
            // Side faces are quadrilaterals, top and bottom are triangles.
            Prism => {
                if face < 3 {
                    Quad
                } else {
                    Tri
                }
            }
            Line => panic!("line faces are vertices and carry no element class"),
        }
    }
}
