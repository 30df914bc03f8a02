use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{Line, LinearId, Quad, Tri};

/// One triangular prism, the tensor product of a triangle and a line.
///
/// The two factor records share one refinement level. Every structural
/// operation decomposes into one operation per factor; the product curve
/// runs through the four triangle children before stepping the line, with
/// carries ascending one level at a time.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prism {
    pub tri: Tri,
    pub line: Line,
}

impl Prism {
    pub const MAX_LEVEL: u8 = 21;
    pub const ROOT_LEN: i32 = 1 << Self::MAX_LEVEL;
    pub const CHILDREN: usize = 8;
    pub const FACES: usize = 5;

    pub fn len(level: u8) -> i32 {
        1 << (Self::MAX_LEVEL - level)
    }

    pub fn new(tri: Tri, line: Line) -> Self {
        assert_eq!(tri.level, line.level, "prism factors must share one level");
        Prism { tri, line }
    }

    pub fn root() -> Self {
        Prism::default()
    }

    pub fn level(&self) -> u8 {
        debug_assert_eq!(self.tri.level, self.line.level);
        self.tri.level
    }

    pub fn kind(&self) -> u8 {
        self.tri.kind
    }

    pub fn anchor(&self) -> [i32; 3] {
        [self.tri.x, self.tri.y, self.line.x]
    }

    /// Corner `vertex` of the prism: the base triangle's corners at the
    /// bottom (0..=2) and top (3..=5) of the line interval.
    pub fn vertex_coords(&self, vertex: usize) -> [i32; 3] {
        assert!(vertex < 6, "prism vertex {vertex} out of range");
        let base = self.tri.vertex_coords(vertex % 3);
        let z = self.line.vertex_coords(vertex / 3);
        [base[0], base[1], z[0]]
    }

    pub fn parent(&self) -> Self {
        Prism {
            tri: self.tri.parent(),
            line: self.line.parent(),
        }
    }

    /// `child_id`-th child of the product rule: the triangle child cycles
    /// fastest, the line child selects bottom or top.
    pub fn child(&self, child_id: usize) -> Self {
        assert!(child_id < Self::CHILDREN, "prism child id {child_id} out of range");
        Prism {
            tri: self.tri.child(child_id % 4),
            line: self.line.child(child_id / 4),
        }
    }

    pub fn children(&self) -> ArrayVec<Self, 8> {
        (0..Self::CHILDREN).map(|k| self.child(k)).collect()
    }

    pub fn child_id(&self) -> usize {
        self.tri.child_id() + 4 * self.line.child_id()
    }

    pub fn sibling(&self, sibling_id: usize) -> Self {
        self.parent().child(sibling_id)
    }

    pub fn ancestor(&self, level: u8) -> Self {
        Prism {
            tri: self.tri.ancestor(level),
            line: self.line.ancestor(level),
        }
    }

    pub fn is_ancestor(&self, other: &Self) -> bool {
        self.tri.is_ancestor(&other.tri) && self.line.is_ancestor(&other.line)
    }

    /// Per-level digit string of the product curve: triangle index plus
    /// four times the line index, one octal digit per level.
    fn curve_index(&self, level: u8) -> u128 {
        let tid = self.tri.linear_id(level);
        let lid = self.line.linear_id(level);
        let mut index = 0u128;
        for i in 0..u32::from(level) {
            let t = (tid >> (2 * i)) & 3;
            let l = (lid >> i) & 1;
            index |= (t + 4 * l) << (3 * i);
        }
        index
    }

    fn from_curve_index(index: u128, level: u8) -> Self {
        let mut tid = 0u128;
        let mut lid = 0u128;
        for i in 0..u32::from(level) {
            let digit = (index >> (3 * i)) & 7;
            tid |= (digit & 3) << (2 * i);
            lid |= (digit >> 2) << i;
        }
        Prism {
            tri: Tri::from_linear_id(tid, level),
            line: Line::from_linear_id(lid, level),
        }
    }

    /// Position of the prism on the coupled product curve.
    ///
    /// TODO: needs a defining test vector before it can be exposed; the
    /// factor ids fix the per-level digits but not the published encoding.
    pub fn linear_id(&self, _level: u8) -> LinearId {
        todo!("prism linear ids await a defining test vector for the coupled curve")
    }

    pub fn from_linear_id(_id: LinearId, _level: u8) -> Self {
        todo!("prism linear ids await a defining test vector for the coupled curve")
    }

    pub fn first_descendant(&self, level: u8) -> Self {
        Prism {
            tri: self.tri.first_descendant(level),
            line: self.line.first_descendant(level),
        }
    }

    pub fn last_descendant(&self, level: u8) -> Self {
        Prism {
            tri: self.tri.last_descendant(level),
            line: self.line.last_descendant(level),
        }
    }

    /// Next prism of the uniform `level` refinement: the triangle child id
    /// steps first; when it wraps the line child steps; when both wrap the
    /// carry ascends one level. Wraps around past the last element.
    pub fn successor(&self, level: u8) -> Self {
        assert!(
            (1..=self.level()).contains(&level),
            "cannot step the curve at level {level} from level {}",
            self.level()
        );
        let total = 1u128 << (3 * u32::from(level));
        Self::from_curve_index((self.curve_index(level) + 1) % total, level)
    }

    pub fn predecessor(&self, level: u8) -> Self {
        assert!(
            (1..=self.level()).contains(&level),
            "cannot step the curve at level {level} from level {}",
            self.level()
        );
        let total = 1u128 << (3 * u32::from(level));
        Self::from_curve_index((self.curve_index(level) + total - 1) % total, level)
    }

    /// Neighbour across `face` (0..=2 the vertical quad faces over the
    /// triangle's faces, 3 the bottom triangle, 4 the top) and the
    /// neighbour's face index.
    pub fn face_neighbour(&self, face: usize) -> (Self, usize) {
        assert!(face < Self::FACES, "prism face {face} out of range");
        match face {
            0..=2 => {
                let (tri, back) = self.tri.face_neighbour(face);
                (Prism { tri, line: self.line }, back)
            }
            3 => {
                let (line, _) = self.line.face_neighbour(0);
                (Prism { tri: self.tri, line }, 4)
            }
            _ => {
                let (line, _) = self.line.face_neighbour(1);
                (Prism { tri: self.tri, line }, 3)
            }
        }
    }

    pub fn nca(&self, other: &Self) -> Self {
        let tri = self.tri.nca(&other.tri);
        let line = self.line.nca(&other.line);
        self.ancestor(tri.level.min(line.level))
    }

    pub fn compare(&self, other: &Self) -> std::cmp::Ordering {
        let level = self.level().max(other.level());
        self.curve_index(level)
            .cmp(&other.curve_index(level))
            .then(self.level().cmp(&other.level()))
    }

    pub fn is_family(family: &[Self]) -> bool {
        if family.len() != Self::CHILDREN || family[0].level() == 0 {
            return false;
        }
        if family.iter().any(|f| f.level() != family[0].level()) {
            return false;
        }
        if family[0].child_id() != 0 {
            return false;
        }
        let parent = family[0].parent();
        family.iter().enumerate().all(|(k, f)| *f == parent.child(k))
    }

    pub fn inside_root(&self) -> bool {
        self.tri.inside_root() && self.line.inside_root()
    }

    /// Face quadrant of a side face (0..=2): the triangle's root-edge
    /// coordinate runs horizontally, the line coordinate vertically, both
    /// rescaled to the quad tree's finer grid. Only faces on the root
    /// boundary have a face tree; asking for an interior face aborts.
    pub fn boundary_side(&self, face: usize) -> Quad {
        assert!(face < 3, "prism side face {face} out of range");
        let a = self.tri.vertex_coords((face + 1) % 3);
        let b = self.tri.vertex_coords((face + 2) % 3);
        let on_root_edge = (a[0] == Tri::ROOT_LEN && b[0] == Tri::ROOT_LEN)
            || (a[1] == 0 && b[1] == 0)
            || (a[0] == a[1] && b[0] == b[1]);
        assert!(on_root_edge, "prism face {face} does not lie on the root boundary");
        let scale = Quad::MAX_LEVEL - Tri::MAX_LEVEL;
        Quad {
            x: self.tri.boundary(face).x << scale,
            y: self.line.x << scale,
            level: self.level(),
            surround: None,
        }
    }

    /// Face triangle of the bottom (3) or top (4) face. Only faces on the
    /// root boundary have a face tree; asking for an interior face aborts.
    pub fn boundary_cap(&self, face: usize) -> Tri {
        assert!((3..5).contains(&face), "prism cap face {face} out of range");
        let at_root = if face == 3 {
            self.line.x == 0
        } else {
            self.line.x + Line::len(self.level()) == Line::ROOT_LEN
        };
        assert!(at_root, "prism face {face} does not lie on the root boundary");
        self.tri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prism(tri: Tri, line: Line) -> Prism {
        Prism::new(tri, line)
    }

    #[test]
    fn test_children_compose_factors() {
        let p = Prism::root();
        for k in 0..8 {
            let c = p.child(k);
            assert_eq!(c.tri, p.tri.child(k % 4));
            assert_eq!(c.line, p.line.child(k / 4));
            assert_eq!(c.parent(), p);
            assert_eq!(c.child_id(), k);
        }
    }

    #[test]
    fn test_successor_carries_from_triangle_to_line() {
        let h = Prism::len(2);
        let p = prism(
            Tri { x: h, y: 0, level: 2, kind: 1 },
            Line { x: 3 * h, level: 2 },
        );
        let s = p.successor(2);
        // The factor successors advance jointly: triangle digit steps,
        // line digit unchanged unless the triangle wrapped.
        let expect_tri_wrap = p.tri.child_id() == 3;
        if expect_tri_wrap {
            assert_eq!(s.tri.child_id(), 0);
        } else {
            assert_eq!(s.tri, p.tri.successor(2));
            assert_eq!(s.line, p.line);
        }
    }

    #[test]
    fn test_successor_chain_covers_level() {
        let mut p = Prism::root().first_descendant(2);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..64 {
            assert!(seen.insert(p.anchor().map(|c| (c, p.kind()))));
            p = p.successor(2);
        }
        assert_eq!(seen.len(), 64);
        assert_eq!(p, Prism::root().first_descendant(2));
    }

    #[test]
    fn test_compound_overflow_ascends() {
        // Last child of the first level-1 prism: both factors wrap and the
        // carry moves to level 1.
        let p = Prism::root().child(7).first_descendant(2);
        let last_in_branch = Prism::root().child(7).last_descendant(2);
        let next = last_in_branch.successor(2);
        assert_eq!(next, Prism::root().first_descendant(2));
        assert!(p.level() == 2);
    }

    #[test]
    fn test_vertex_coords() {
        let p = Prism::root();
        let l = Prism::ROOT_LEN;
        assert_eq!(p.vertex_coords(0), [0, 0, 0]);
        assert_eq!(p.vertex_coords(1), [l, 0, 0]);
        assert_eq!(p.vertex_coords(2), [l, l, 0]);
        assert_eq!(p.vertex_coords(5), [l, l, l]);
    }

    #[test]
    fn test_face_neighbours() {
        let p = Prism::root().child(5);
        let (side, back) = p.face_neighbour(1);
        assert_eq!(side.line, p.line);
        assert_eq!(back, 1);
        let (below, bf) = p.face_neighbour(3);
        assert_eq!(below.tri, p.tri);
        assert_eq!(below.line.x, p.line.x - Prism::len(p.level()));
        assert_eq!(bf, 4);
    }

    #[test]
    fn test_family() {
        let p = Prism::root().child(3);
        let mut family: Vec<Prism> = p.children().to_vec();
        assert!(Prism::is_family(&family));
        family.reverse();
        assert!(!Prism::is_family(&family));
    }

    #[test]
    fn test_boundary_faces() {
        let root = Prism::root();
        for face in 0..3 {
            assert_eq!(root.boundary_side(face), Quad { x: 0, y: 0, level: 0, surround: None });
        }
        assert_eq!(root.boundary_cap(3), Tri::root());
        assert_eq!(root.boundary_cap(4), Tri::root());
        // Child 5 keeps its face 0 on the root's first side wall; the line
        // offset becomes the quadrant's vertical coordinate.
        let p = root.child(5);
        let scale = Quad::MAX_LEVEL - Tri::MAX_LEVEL;
        let q = p.boundary_side(0);
        assert_eq!(q.level, 1);
        assert_eq!((q.x, q.y), (0, (Prism::ROOT_LEN / 2) << scale));
    }

    #[test]
    #[should_panic]
    fn test_interior_cap_has_no_boundary_element() {
        // The bottom face of a top-half child is interior.
        let _ = Prism::root().child(5).boundary_cap(3);
    }

    #[test]
    fn test_nca_spans_factors() {
        let a = Prism::root().child(0).child(1);
        let b = Prism::root().child(4).child(2);
        // Different line branches meet only at the root.
        assert_eq!(a.nca(&b), Prism::root());
        let c = Prism::root().child(0).child(2);
        let d = Prism::root().child(0).child(3);
        assert_eq!(c.nca(&d), Prism::root().child(0));
    }
}
