use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{LinearId, Quad, Surround};

/// One octant of the 3D Morton tree.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub level: u8,
}

impl Hex {
    pub const MAX_LEVEL: u8 = 30;
    pub const ROOT_LEN: i32 = 1 << Self::MAX_LEVEL;
    pub const CHILDREN: usize = 8;
    pub const FACES: usize = 6;

    pub fn len(level: u8) -> i32 {
        1 << (Self::MAX_LEVEL - level)
    }

    pub fn root() -> Self {
        Hex::default()
    }

    pub fn anchor(&self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn vertex_coords(&self, vertex: usize) -> [i32; 3] {
        assert!(vertex < 8, "hex vertex {vertex} out of range");
        let h = Self::len(self.level);
        [
            self.x + (vertex as i32 & 1) * h,
            self.y + ((vertex as i32 >> 1) & 1) * h,
            self.z + ((vertex as i32 >> 2) & 1) * h,
        ]
    }

    pub fn parent(&self) -> Self {
        assert!(self.level > 0, "the root octant has no parent");
        let h = Self::len(self.level);
        Hex {
            x: self.x & !h,
            y: self.y & !h,
            z: self.z & !h,
            level: self.level - 1,
        }
    }

    pub fn child(&self, child_id: usize) -> Self {
        assert!(child_id < Self::CHILDREN, "hex child id {child_id} out of range");
        assert!(self.level < Self::MAX_LEVEL, "hex at the deepest level cannot be refined");
        let h = Self::len(self.level + 1);
        Hex {
            x: self.x | (if child_id & 1 != 0 { h } else { 0 }),
            y: self.y | (if child_id & 2 != 0 { h } else { 0 }),
            z: self.z | (if child_id & 4 != 0 { h } else { 0 }),
            level: self.level + 1,
        }
    }

    pub fn children(&self) -> ArrayVec<Self, 8> {
        (0..Self::CHILDREN).map(|k| self.child(k)).collect()
    }

    pub fn child_id(&self) -> usize {
        assert!(self.level > 0, "the root octant has no child id");
        let h = Self::len(self.level);
        usize::from(self.x & h != 0)
            | (usize::from(self.y & h != 0) << 1)
            | (usize::from(self.z & h != 0) << 2)
    }

    pub fn sibling(&self, sibling_id: usize) -> Self {
        self.parent().child(sibling_id)
    }

    pub fn ancestor(&self, level: u8) -> Self {
        assert!(level <= self.level, "ancestor level exceeds the element level");
        let mask = !(Self::len(level) - 1);
        Hex {
            x: self.x & mask,
            y: self.y & mask,
            z: self.z & mask,
            level,
        }
    }

    pub fn is_ancestor(&self, other: &Self) -> bool {
        self.level <= other.level && other.ancestor(self.level) == *self
    }

    pub fn linear_id(&self, level: u8) -> LinearId {
        assert!(level <= Self::MAX_LEVEL, "hex level {level} out of range");
        let lo = level.min(self.level);
        let mut id: LinearId = 0;
        for i in 1..=lo {
            let h = Self::len(i);
            let mut digit = 0u128;
            if self.x & h != 0 {
                digit |= 1;
            }
            if self.y & h != 0 {
                digit |= 2;
            }
            if self.z & h != 0 {
                digit |= 4;
            }
            id |= digit << (3 * u32::from(lo - i));
        }
        id << (3 * u32::from(level - lo))
    }

    pub fn from_linear_id(id: LinearId, level: u8) -> Self {
        assert!(level <= Self::MAX_LEVEL, "hex level {level} out of range");
        assert!(
            id >> (3 * u32::from(level)) == 0,
            "linear id {id} out of range for level {level}"
        );
        let mut hex = Hex {
            level,
            ..Hex::default()
        };
        for i in 1..=level {
            let digit = (id >> (3 * u32::from(level - i))) & 7;
            let h = Self::len(i);
            if digit & 1 != 0 {
                hex.x |= h;
            }
            if digit & 2 != 0 {
                hex.y |= h;
            }
            if digit & 4 != 0 {
                hex.z |= h;
            }
        }
        hex
    }

    pub fn first_descendant(&self, level: u8) -> Self {
        assert!((self.level..=Self::MAX_LEVEL).contains(&level));
        Hex { level, ..*self }
    }

    pub fn last_descendant(&self, level: u8) -> Self {
        assert!((self.level..=Self::MAX_LEVEL).contains(&level));
        let d = Self::len(self.level) - Self::len(level);
        Hex {
            x: self.x + d,
            y: self.y + d,
            z: self.z + d,
            level,
        }
    }

    /// Next octant of the uniform `level` refinement in Morton order.
    /// Wraps back to the first octant after the last one.
    pub fn successor(&self, level: u8) -> Self {
        let total = 1u128 << (3 * u32::from(level));
        Self::from_linear_id((self.linear_id(level) + 1) % total, level)
    }

    pub fn predecessor(&self, level: u8) -> Self {
        let total = 1u128 << (3 * u32::from(level));
        Self::from_linear_id((self.linear_id(level) + total - 1) % total, level)
    }

    /// Neighbour across `face` (-x, +x, -y, +y, -z, +z) and the neighbour's
    /// face index. The result may lie outside the root cube.
    pub fn face_neighbour(&self, face: usize) -> (Self, usize) {
        assert!(face < Self::FACES, "hex face {face} out of range");
        let h = Self::len(self.level);
        let sign = if face % 2 == 0 { -h } else { h };
        let mut n = *self;
        match face / 2 {
            0 => n.x += sign,
            1 => n.y += sign,
            _ => n.z += sign,
        }
        (n, face ^ 1)
    }

    pub fn nca(&self, other: &Self) -> Self {
        let xor = (self.x ^ other.x) | (self.y ^ other.y) | (self.z ^ other.z);
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
        let parent = family[0].parent();
        family.iter().enumerate().all(|(k, f)| *f == parent.child(k))
    }

    pub fn inside_root(&self) -> bool {
        (0..Self::ROOT_LEN).contains(&self.x)
            && (0..Self::ROOT_LEN).contains(&self.y)
            && (0..Self::ROOT_LEN).contains(&self.z)
    }

    /// Face quadrant of the octant, stamped with the hex face it came from.
    /// The in-plane axes keep their relative order (y,z / x,z / x,y).
    pub fn boundary(&self, face: usize) -> Quad {
        assert!(face < Self::FACES, "hex face {face} out of range");
        let (u, v) = match face / 2 {
            0 => (self.y, self.z),
            1 => (self.x, self.z),
            _ => (self.x, self.y),
        };
        Quad {
            x: u,
            y: v,
            level: self.level,
            surround: Some(Surround { face: face as u8 }),
        }
    }
}
