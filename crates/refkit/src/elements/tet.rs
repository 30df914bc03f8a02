use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::tables::{
    TET_BEY_ID_TO_VERTEX, TET_CID_KIND_TO_PARENT_KIND, TET_KIND_CID_TO_LOCAL_INDEX,
    TET_KIND_OF_BEY_CHILD, TET_LOCAL_INDEX_TO_BEY_ID, TET_PARENT_KIND_LOCAL_INDEX_TO_CID,
    TET_PARENT_KIND_LOCAL_INDEX_TO_KIND,
};
use super::{LinearId, Tri};

/// One tetrahedron of the Bey-refined 3D tree.
///
/// The unit cube splits into six tetrahedra, one per ordering of the three
/// coordinates; the kind is the index of that ordering chain
/// (0: x>=z>=y, 1: x>=y>=z, 2: y>=x>=z, 3: y>=z>=x, 4: z>=y>=x,
/// 5: z>=x>=y). A refkit tree is rooted at the kind-0 tetrahedron. The four
/// corner children keep the parent's kind; the four interior children split
/// the inner octahedron and take kinds given by the child tables.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tet {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub level: u8,
    pub kind: u8,
}

/// Kinds whose chain puts the first coordinate of the pair above the
/// second, for the pairs (x,y), (x,z), (y,z).
const CHAIN_ABOVE: [[u8; 3]; 3] = [[0, 1, 5], [0, 1, 2], [1, 2, 3]];

impl Tet {
    pub const MAX_LEVEL: u8 = 21;
    pub const ROOT_LEN: i32 = 1 << Self::MAX_LEVEL;
    pub const CHILDREN: usize = 8;
    pub const FACES: usize = 4;
    pub const KINDS: u8 = 6;

    /// Edge length of a tetrahedron at `level`.
    pub fn len(level: u8) -> i32 {
        1 << (Self::MAX_LEVEL - level)
    }

    pub fn root() -> Self {
        Tet::default()
    }

    pub fn anchor(&self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Index of the child-sized sub-cube holding the tetrahedron inside its
    /// parent's cube: bit 0 from x, bit 1 from y, bit 2 from z.
    pub fn cube_id(&self, level: u8) -> u8 {
        if level == 0 {
            return 0;
        }
        let h = Self::len(level);
        u8::from(self.x & h != 0)
            | (u8::from(self.y & h != 0) << 1)
            | (u8::from(self.z & h != 0) << 2)
    }

    /// Kind this tetrahedron's ancestor has at `level`.
    pub fn kind_at(&self, level: u8) -> u8 {
        assert!(level <= self.level, "kind_at level exceeds the element level");
        let mut kind = self.kind;
        for i in (level + 1..=self.level).rev() {
            kind = TET_CID_KIND_TO_PARENT_KIND[self.cube_id(i) as usize][kind as usize];
        }
        kind
    }

    pub fn vertex_coords(&self, vertex: usize) -> [i32; 3] {
        assert!(vertex < 4, "tet vertex {vertex} out of range");
        let h = Self::len(self.level);
        let ei = usize::from(self.kind / 2);
        let ej = (ei + if self.kind % 2 == 0 { 2 } else { 1 }) % 3;
        let mut coords = [self.x, self.y, self.z];
        match vertex {
            0 => {}
            1 => coords[ei] += h,
            2 => {
                coords[ei] += h;
                coords[ej] += h;
            }
            _ => {
                coords[0] += h;
                coords[1] += h;
                coords[2] += h;
            }
        }
        coords
    }

    pub fn parent(&self) -> Self {
        assert!(self.level > 0, "the root tetrahedron has no parent");
        let h = Self::len(self.level);
        let cid = self.cube_id(self.level);
        Tet {
            x: self.x & !h,
            y: self.y & !h,
            z: self.z & !h,
            level: self.level - 1,
            kind: TET_CID_KIND_TO_PARENT_KIND[cid as usize][self.kind as usize],
        }
    }

    pub fn child(&self, child_id: usize) -> Self {
        assert!(child_id < Self::CHILDREN, "tet child id {child_id} out of range");
        assert!(self.level < Self::MAX_LEVEL, "tet at the deepest level cannot be refined");
        let bey = TET_LOCAL_INDEX_TO_BEY_ID[self.kind as usize][child_id];
        let (x, y, z) = if bey == 0 {
            (self.x, self.y, self.z)
        } else {
            let v = self.vertex_coords(TET_BEY_ID_TO_VERTEX[bey as usize] as usize);
            (
                (self.x + v[0]) >> 1,
                (self.y + v[1]) >> 1,
                (self.z + v[2]) >> 1,
            )
        };
        Tet {
            x,
            y,
            z,
            level: self.level + 1,
            kind: TET_KIND_OF_BEY_CHILD[self.kind as usize][bey as usize],
        }
    }

    pub fn children(&self) -> ArrayVec<Self, 8> {
        (0..Self::CHILDREN).map(|k| self.child(k)).collect()
    }

    pub fn child_id(&self) -> usize {
        assert!(self.level > 0, "the root tetrahedron has no child id");
        TET_KIND_CID_TO_LOCAL_INDEX[self.kind as usize][self.cube_id(self.level) as usize] as usize
    }

    pub fn sibling(&self, sibling_id: usize) -> Self {
        self.parent().child(sibling_id)
    }

    /// Ancestor at `level`. The coordinates drop the refined bits; the kind
    /// is the unique ordering chain compatible with the offset the
    /// tetrahedron keeps inside the ancestor's cube, ties inheriting the
    /// element's own chain.
    pub fn ancestor(&self, level: u8) -> Self {
        assert!(level <= self.level, "ancestor level exceeds the element level");
        let mask = !(Self::len(level) - 1);
        let (x, y, z) = (self.x & mask, self.y & mask, self.z & mask);
        let delta = [self.x - x, self.y - y, self.z - z];
        let mut possible = [true; 6];
        for (pair, above) in [(0, 1), (0, 2), (1, 2)].into_iter().zip(CHAIN_ABOVE) {
            let keep_above = match delta[pair.0].cmp(&delta[pair.1]) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => above.contains(&self.kind),
            };
            for q in 0..6u8 {
                if above.contains(&q) != keep_above {
                    possible[q as usize] = false;
                }
            }
        }
        debug_assert_eq!(possible.iter().filter(|&&p| p).count(), 1);
        let kind = possible.iter().position(|&p| p).unwrap() as u8;
        Tet { x, y, z, level, kind }
    }

    pub fn is_ancestor(&self, other: &Self) -> bool {
        self.level <= other.level && other.ancestor(self.level) == *self
    }

    pub fn linear_id(&self, level: u8) -> LinearId {
        assert!(level <= Self::MAX_LEVEL, "tet level {level} out of range");
        let lo = level.min(self.level);
        let mut id: LinearId = 0;
        let mut kind = self.kind_at(lo);
        for i in (1..=lo).rev() {
            let cid = self.cube_id(i);
            let iloc = TET_KIND_CID_TO_LOCAL_INDEX[kind as usize][cid as usize];
            id |= LinearId::from(iloc) << (3 * u32::from(lo - i));
            kind = TET_CID_KIND_TO_PARENT_KIND[cid as usize][kind as usize];
        }
        id << (3 * u32::from(level - lo))
    }

    pub fn from_linear_id(id: LinearId, level: u8) -> Self {
        assert!(level <= Self::MAX_LEVEL, "tet level {level} out of range");
        assert!(
            id >> (3 * u32::from(level)) == 0,
            "linear id {id} out of range for level {level}"
        );
        let mut tet = Tet {
            level,
            ..Tet::default()
        };
        for i in 1..=level {
            let iloc = ((id >> (3 * u32::from(level - i))) & 7) as usize;
            let cid = TET_PARENT_KIND_LOCAL_INDEX_TO_CID[tet.kind as usize][iloc];
            tet.kind = TET_PARENT_KIND_LOCAL_INDEX_TO_KIND[tet.kind as usize][iloc];
            let h = Self::len(i);
            if cid & 1 != 0 {
                tet.x |= h;
            }
            if cid & 2 != 0 {
                tet.y |= h;
            }
            if cid & 4 != 0 {
                tet.z |= h;
            }
        }
        tet
    }

    pub fn first_descendant(&self, level: u8) -> Self {
        assert!((self.level..=Self::MAX_LEVEL).contains(&level));
        Self::from_linear_id(self.linear_id(level), level)
    }

    pub fn last_descendant(&self, level: u8) -> Self {
        assert!((self.level..=Self::MAX_LEVEL).contains(&level));
        let shift = 3 * u32::from(level - self.level);
        let id = (self.linear_id(self.level) << shift) | ((1 << shift) - 1);
        Self::from_linear_id(id, level)
    }

    /// Next tetrahedron of the uniform `level` refinement along the curve.
    /// Wraps back to the first one after the last; callers meaning to stop
    /// must check the linear id first.
    pub fn successor(&self, level: u8) -> Self {
        self.advance(level, true)
    }

    pub fn predecessor(&self, level: u8) -> Self {
        self.advance(level, false)
    }

    fn advance(&self, level: u8, forward: bool) -> Self {
        assert!(
            (1..=self.level).contains(&level),
            "cannot step the curve at level {level} from level {}",
            self.level
        );
        let last = (Self::CHILDREN - 1) as u8;
        let mut kinds = [0u8; Self::MAX_LEVEL as usize + 1];
        kinds[self.level as usize] = self.kind;
        for i in (1..=self.level).rev() {
            kinds[i as usize - 1] =
                TET_CID_KIND_TO_PARENT_KIND[self.cube_id(i) as usize][kinds[i as usize] as usize];
        }
        let mut carry_level = level;
        let stepped = loop {
            if carry_level == 0 {
                break None;
            }
            let iloc = TET_KIND_CID_TO_LOCAL_INDEX[kinds[carry_level as usize] as usize]
                [self.cube_id(carry_level) as usize];
            let next = if forward { (iloc + 1) % 8 } else { (iloc + 7) % 8 };
            let wrapped = if forward { next == 0 } else { next == last };
            if !wrapped {
                break Some(next);
            }
            carry_level -= 1;
        };
        let Some(stepped) = stepped else {
            let total = 1u128 << (3 * u32::from(level));
            return Self::from_linear_id(if forward { 0 } else { total - 1 }, level);
        };
        let mut s = self.ancestor(level);
        let fill = if forward { 0 } else { last };
        let mut kind = kinds[carry_level as usize - 1];
        for i in carry_level..=level {
            let iloc = if i == carry_level { stepped } else { fill } as usize;
            let cid = TET_PARENT_KIND_LOCAL_INDEX_TO_CID[kind as usize][iloc];
            kind = TET_PARENT_KIND_LOCAL_INDEX_TO_KIND[kind as usize][iloc];
            let h = Self::len(i);
            s.x = if cid & 1 != 0 { s.x | h } else { s.x & !h };
            s.y = if cid & 2 != 0 { s.y | h } else { s.y & !h };
            s.z = if cid & 4 != 0 { s.z | h } else { s.z & !h };
        }
        s.kind = kind;
        s
    }

    /// Neighbour of the same size across `face` (face `i` is opposite
    /// vertex `i`) and the neighbour's face index. The result may lie
    /// outside the root tetrahedron; see [`Tet::inside_root`].
    pub fn face_neighbour(&self, face: usize) -> (Self, usize) {
        assert!(face < Self::FACES, "tet face {face} out of range");
        let h = Self::len(self.level);
        let kind = u32::from(self.kind);
        let even = self.kind % 2 == 0;
        let mut coords = [self.x, self.y, self.z];
        let (new_kind, back) = match face {
            0 => {
                coords[usize::from(self.kind / 2)] += h;
                ((kind + if even { 4 } else { 2 }) % 6, 3)
            }
            3 => {
                coords[((usize::from(self.kind) + 3) % 6) / 2] -= h;
                ((kind + if even { 2 } else { 4 }) % 6, 0)
            }
            _ => {
                let step = if even == (face == 2) { 1 } else { 5 };
                ((kind + step) % 6, face)
            }
        };
        (
            Tet {
                x: coords[0],
                y: coords[1],
                z: coords[2],
                level: self.level,
                kind: new_kind as u8,
            },
            back,
        )
    }

    /// Deepest element that is an ancestor of both tetrahedra; below the
    /// shared-cube level the level drops until the two kind paths meet.
    pub fn nca(&self, other: &Self) -> Self {
        let xor = (self.x ^ other.x) | (self.y ^ other.y) | (self.z ^ other.z);
        let m = 32 - (xor as u32).leading_zeros();
        let mut level = u32::from(Self::MAX_LEVEL)
            .saturating_sub(m)
            .min(u32::from(self.level))
            .min(u32::from(other.level)) as u8;
        while level > 0 && self.kind_at(level) != other.kind_at(level) {
            level -= 1;
        }
        self.ancestor(level)
    }

    pub fn compare(&self, other: &Self) -> std::cmp::Ordering {
        let level = self.level.max(other.level);
        self.linear_id(level)
            .cmp(&other.linear_id(level))
            .then(self.level.cmp(&other.level))
    }

    /// Whether the eight tetrahedra are the children of one parent in curve
    /// order, checked against the child tables.
    pub fn is_family(family: &[Self]) -> bool {
        if family.len() != Self::CHILDREN || family[0].level == 0 {
            return false;
        }
        if family.iter().any(|f| f.level != family[0].level) {
            return false;
        }
        if family[0].child_id() != 0 {
            return false;
        }
        let parent = family[0].parent();
        family.iter().enumerate().all(|(k, f)| *f == parent.child(k))
    }

    pub fn inside_root(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|c| (0..Self::ROOT_LEN).contains(c))
            && self.ancestor(0).kind == 0
    }

    /// Face triangle of the tetrahedron, in the face tree of the root face
    /// the face lies on. The root tetrahedron's boundary consists of the
    /// planes `x = ROOT_LEN`, `y = 0`, `x = z` and `y = z`; projecting the
    /// face's vertices out of its plane yields the triangle's anchor and
    /// kind directly. Only faces on the root boundary have a face tree;
    /// asking for an interior face aborts.
    pub fn boundary(&self, face: usize) -> Tri {
        assert!(face < Self::FACES, "tet face {face} out of range");
        let mut verts: ArrayVec<[i32; 3], 3> = ArrayVec::new();
        for v in 0..4 {
            if v != face {
                verts.push(self.vertex_coords(v));
            }
        }
        let uv: ArrayVec<[i32; 2], 3> = if verts.iter().all(|c| c[0] == Self::ROOT_LEN) {
            verts.iter().map(|c| [c[2], c[1]]).collect()
        } else if verts.iter().all(|c| c[1] == 0) {
            verts.iter().map(|c| [c[0], c[2]]).collect()
        } else if verts.iter().all(|c| c[0] == c[2]) || verts.iter().all(|c| c[1] == c[2]) {
            verts.iter().map(|c| [c[0], c[1]]).collect()
        } else {
            panic!("tet face {face} does not lie on the root boundary");
        };
        let h = Self::len(self.level);
        let x = uv.iter().map(|p| p[0]).min().unwrap();
        let y = uv.iter().map(|p| p[1]).min().unwrap();
        Tri {
            x,
            y,
            level: self.level,
            kind: u8::from(!uv.contains(&[x + h, y])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_children() {
        let c: Vec<Tet> = Tet::root().children().to_vec();
        let h = Tet::ROOT_LEN / 2;
        // Corner children at local indices 0, 1 and 7 keep kind 0.
        assert_eq!(c[0], Tet { x: 0, y: 0, z: 0, level: 1, kind: 0 });
        assert_eq!(c[1], Tet { x: h, y: 0, z: 0, level: 1, kind: 0 });
        assert_eq!(c[7], Tet { x: h, y: h, z: h, level: 1, kind: 0 });
        // The interior children cover the kinds given by the child table.
        assert_eq!(c[2].kind, 4);
        assert_eq!(c[3].kind, 5);
        assert_eq!(c[4].kind, 0);
        assert_eq!(c[5].kind, 1);
        assert_eq!(c[6].kind, 2);
        for t in &c {
            assert!(t.inside_root());
        }
    }

    #[test]
    fn test_parent_child_round_trip() {
        let t = Tet::from_linear_id(0o1735, 4);
        for k in 0..8 {
            assert_eq!(t.child(k).parent(), t);
            assert_eq!(t.child(k).child_id(), k);
        }
    }

    #[test]
    fn test_parent_of_interior_descendant() {
        // Anchor (h, h, 0) with h = ROOT_LEN / 8 sits in sub-cube 3 at
        // level 3; a kind-3 element there has a kind-2 parent.
        let h = Tet::ROOT_LEN / 8;
        let t = Tet { x: h, y: h, z: 0, level: 3, kind: 3 };
        let p = t.parent();
        assert_eq!(p, Tet { x: 0, y: 0, z: 0, level: 2, kind: 2 });
    }

    #[test]
    fn test_linear_id_round_trip() {
        for id in 0..512u128 {
            let t = Tet::from_linear_id(id, 3);
            assert_eq!(t.linear_id(3), id);
            assert!(t.inside_root());
        }
    }

    #[test]
    fn test_successor_walks_the_curve() {
        let mut t = Tet::from_linear_id(0, 3);
        for id in 1..512u128 {
            t = t.successor(3);
            assert_eq!(t.linear_id(3), id);
        }
        assert_eq!(t.successor(3), Tet::from_linear_id(0, 3));
        assert_eq!(Tet::from_linear_id(0, 3).predecessor(3).linear_id(3), 511);
    }

    #[test]
    fn test_ancestor_recovers_kind() {
        let t = Tet::from_linear_id(0o4213, 4);
        let mut up = t;
        for level in (0..=4u8).rev() {
            assert_eq!(t.ancestor(level), up);
            if level > 0 {
                up = up.parent();
            }
        }
    }

    #[test]
    fn test_face_neighbour_involution() {
        for id in [0u128, 0o7, 0o52, 0o146] {
            let t = Tet::from_linear_id(id, 3);
            for face in 0..4 {
                let (n, nf) = t.face_neighbour(face);
                let (back, bf) = n.face_neighbour(nf);
                assert_eq!(back, t);
                assert_eq!(bf, face);
            }
        }
    }

    #[test]
    fn test_family() {
        let t = Tet::from_linear_id(0o31, 2);
        let mut family: Vec<Tet> = t.children().to_vec();
        assert!(Tet::is_family(&family));
        family.swap(2, 5);
        assert!(!Tet::is_family(&family));
        family.swap(2, 5);
        family[4].kind = (family[4].kind + 1) % 6;
        assert!(!Tet::is_family(&family));
    }

    #[test]
    fn test_nca_is_deepest_common_ancestor() {
        let t1 = Tet::from_linear_id(0o10, 4);
        let t2 = Tet::from_linear_id(0o17, 4);
        let r = t1.nca(&t2);
        assert!(r.is_ancestor(&t1) && r.is_ancestor(&t2));
        // Same cube, different kind paths: the two middle children of one
        // parent share their cube but only meet at the parent.
        let p = Tet::from_linear_id(0o6, 1);
        let a = p.child(2);
        let b = p.child(3);
        assert_eq!(a.cube_id(2), b.cube_id(2));
        assert_eq!(a.nca(&b), p);
    }

    #[test]
    fn test_descendant_interval() {
        let t = Tet::from_linear_id(0o5, 2);
        let first = t.first_descendant(6).linear_id(6);
        let last = t.last_descendant(6).linear_id(6);
        let d = t.child(6).child(2).child(7).child(1);
        let id = d.linear_id(6);
        assert!(first <= id && id <= last);
        assert_eq!(first, t.linear_id(6));
    }

    #[test]
    fn test_root_faces_bound_the_face_tree_roots() {
        for face in 0..4 {
            assert_eq!(Tet::root().boundary(face), Tri::root());
        }
    }

    #[test]
    fn test_boundary_face_projection() {
        // Child 1 of the root keeps its face 0 on the x = ROOT_LEN plane;
        // the projection lands at the face tree's origin.
        let t = Tet::root().child(1);
        assert_eq!(t.boundary(0), Tri { x: 0, y: 0, level: 1, kind: 0 });
        // Child 5 is the kind-1 interior child against the same plane; its
        // face projects to a kind-1 triangle.
        let h = Tet::ROOT_LEN / 2;
        let t = Tet::root().child(5);
        assert_eq!(t, Tet { x: h, y: 0, z: h, level: 1, kind: 1 });
        assert_eq!(t.boundary(0), Tri { x: h, y: 0, level: 1, kind: 1 });
    }

    #[test]
    #[should_panic]
    fn test_interior_face_has_no_boundary_element() {
        let _ = Tet::root().child(7).boundary(3);
    }

    #[test]
    #[should_panic]
    fn test_root_parent_is_fatal() {
        let _ = Tet::root().parent();
    }
}
