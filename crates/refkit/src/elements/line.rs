use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::LinearId;

/// One element of the 1D line tree.
///
/// Lines never form trees of their own; they are the vertical factor of the
/// prism kernel and the boundary class of quadrilateral and triangle faces.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub x: i32,
    pub level: u8,
}

impl Line {
    pub const MAX_LEVEL: u8 = 21;
    pub const ROOT_LEN: i32 = 1 << Self::MAX_LEVEL;
    pub const CHILDREN: usize = 2;

    /// Edge length of an element at `level`.
    pub fn len(level: u8) -> i32 {
        1 << (Self::MAX_LEVEL - level)
    }

    pub fn root() -> Self {
        Line { x: 0, level: 0 }
    }

    pub fn anchor(&self) -> [i32; 1] {
        [self.x]
    }

    pub fn vertex_coords(&self, vertex: usize) -> [i32; 1] {
        assert!(vertex < 2, "line vertex {vertex} out of range");
        [self.x + vertex as i32 * Self::len(self.level)]
    }

    pub fn parent(&self) -> Self {
        assert!(self.level > 0, "the root line has no parent");
        let h = Self::len(self.level);
        Line {
            x: self.x & !h,
            level: self.level - 1,
        }
    }

    pub fn child(&self, child_id: usize) -> Self {
        assert!(child_id < Self::CHILDREN, "line child id {child_id} out of range");
        assert!(self.level < Self::MAX_LEVEL, "line at the deepest level cannot be refined");
        let h = Self::len(self.level + 1);
        Line {
            x: self.x + child_id as i32 * h,
            level: self.level + 1,
        }
    }

    pub fn children(&self) -> ArrayVec<Self, 2> {
        (0..Self::CHILDREN).map(|k| self.child(k)).collect()
    }

    pub fn child_id(&self) -> usize {
        assert!(self.level > 0, "the root line has no child id");
        usize::from(self.x & Self::len(self.level) != 0)
    }

    pub fn sibling(&self, sibling_id: usize) -> Self {
        self.parent().child(sibling_id)
    }

    pub fn ancestor(&self, level: u8) -> Self {
        assert!(level <= self.level, "ancestor level exceeds the element level");
        Line {
            x: self.x & !(Self::len(level) - 1),
            level,
        }
    }

    pub fn is_ancestor(&self, other: &Self) -> bool {
        self.level <= other.level && other.ancestor(self.level) == *self
    }

    pub fn linear_id(&self, level: u8) -> LinearId {
        assert!(level <= Self::MAX_LEVEL, "line level {level} out of range");
        let lo = level.min(self.level);
        let mut id: LinearId = 0;
        for i in 1..=lo {
            if self.x & Self::len(i) != 0 {
                id |= 1 << u32::from(lo - i);
            }
        }
        id << u32::from(level - lo)
    }

    pub fn from_linear_id(id: LinearId, level: u8) -> Self {
        assert!(level <= Self::MAX_LEVEL, "line level {level} out of range");
        assert!(id >> u32::from(level) == 0, "linear id {id} out of range for level {level}");
        let mut x = 0;
        for i in 1..=level {
            if id & (1 << u32::from(level - i)) != 0 {
                x |= Self::len(i);
            }
        }
        Line { x, level }
    }

    pub fn first_descendant(&self, level: u8) -> Self {
        assert!((self.level..=Self::MAX_LEVEL).contains(&level));
        Line { x: self.x, level }
    }

    pub fn last_descendant(&self, level: u8) -> Self {
        assert!((self.level..=Self::MAX_LEVEL).contains(&level));
        Line {
            x: self.x + Self::len(self.level) - Self::len(level),
            level,
        }
    }

    /// Next element of the uniform `level` refinement. Wraps back to the
    /// first element after the last one; callers meaning to stop must check
    /// the linear id first.
    pub fn successor(&self, level: u8) -> Self {
        let total = 1u128 << u32::from(level);
        Self::from_linear_id((self.linear_id(level) + 1) % total, level)
    }

    pub fn predecessor(&self, level: u8) -> Self {
        let total = 1u128 << u32::from(level);
        Self::from_linear_id((self.linear_id(level) + total - 1) % total, level)
    }

    /// Neighbour across `face` (0 below, 1 above) and the neighbour's face
    /// index. The result may lie outside the root interval.
    pub fn face_neighbour(&self, face: usize) -> (Self, usize) {
        assert!(face < 2, "line face {face} out of range");
        let h = Self::len(self.level);
        let n = Line {
            x: if face == 0 { self.x - h } else { self.x + h },
            level: self.level,
        };
        (n, 1 - face)
    }

    pub fn nca(&self, other: &Self) -> Self {
        let xor = self.x ^ other.x;
        let m = 32 - (xor as u32).leading_zeros();
        let level = u32::from(Self::MAX_LEVEL)
            .saturating_sub(m)
            .min(u32::from(self.level))
            .min(u32::from(other.level)) as u8;
        self.ancestor(level)
    }

    pub fn compare(&self, other: &Self) -> std::cmp::Ordering {
        let level = self.level.max(other.level);
        self.linear_id(level)
            .cmp(&other.linear_id(level))
            .then(self.level.cmp(&other.level))
    }

    pub fn is_family(family: &[Self]) -> bool {
        if family.len() != Self::CHILDREN || family[0].level == 0 {
            return false;
        }
        if family.iter().any(|f| f.level != family[0].level) {
            return false;
        }
        family[0].child_id() == 0 && family[1].x == family[0].x + Self::len(family[0].level)
    }

    pub fn inside_root(&self) -> bool {
        (0..Self::ROOT_LEN).contains(&self.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_child_round_trip() {
        let l = Line { x: 3 * Line::len(2), level: 2 };
        for k in 0..2 {
            assert_eq!(l.child(k).parent(), l);
            assert_eq!(l.child(k).child_id(), k);
        }
    }

    #[test]
    fn test_linear_id_round_trip() {
        for id in 0..32u128 {
            let l = Line::from_linear_id(id, 5);
            assert_eq!(l.linear_id(5), id);
            assert!(l.inside_root());
        }
    }

    #[test]
    fn test_successor_steps() {
        let mut l = Line::from_linear_id(0, 4);
        for id in 1..16u128 {
            l = l.successor(4);
            assert_eq!(l.linear_id(4), id);
        }
    }

    #[test]
    fn test_neighbour_involution() {
        let l = Line { x: Line::len(3), level: 3 };
        for face in 0..2 {
            let (n, nf) = l.face_neighbour(face);
            let (back, bf) = n.face_neighbour(nf);
            assert_eq!(back, l);
            assert_eq!(bf, face);
        }
    }
}
