mod pool;

pub use self::pool::ElementPool;

use std::cmp::Ordering;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::eclass::Eclass;
use crate::elements::{Hex, Line, LinearId, Prism, Quad, Tet, Tri};

/// Runs `body` on the concrete record and wraps the result back into the
/// matching variant.
macro_rules! per_class {
    ($value:expr, $el:ident => $body:expr) => {
        match $value {
            Element::Quad($el) => Element::Quad($body),
            Element::Hex($el) => Element::Hex($body),
            Element::Tri($el) => Element::Tri($body),
            Element::Tet($el) => Element::Tet($body),
            Element::Prism($el) => Element::Prism($body),
            Element::Line($el) => Element::Line($body),
        }
    };
}

/// Runs `body` on the concrete record of any class.
macro_rules! with_class {
    ($value:expr, $el:ident => $body:expr) => {
        match $value {
            Element::Quad($el) => $body,
            Element::Hex($el) => $body,
            Element::Tri($el) => $body,
            Element::Tet($el) => $body,
            Element::Prism($el) => $body,
            Element::Line($el) => $body,
        }
    };
}

/// One element of any class, dispatched by variant.
///
/// The forest talks to elements exclusively through this enum (and through
/// [`Scheme`]); it never names a concrete record. Pairwise operations
/// require both operands to be of the same class and abort otherwise.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Quad(Quad),
    Hex(Hex),
    Tri(Tri),
    Tet(Tet),
    Prism(Prism),
    Line(Line),
}

impl Element {
    pub fn root(eclass: Eclass) -> Self {
        match eclass {
            Eclass::Quad => Element::Quad(Quad::root()),
            Eclass::Hex => Element::Hex(Hex::root()),
            Eclass::Tri => Element::Tri(Tri::root()),
            Eclass::Tet => Element::Tet(Tet::root()),
            Eclass::Prism => Element::Prism(Prism::root()),
            Eclass::Line => Element::Line(Line::root()),
        }
    }

    pub fn eclass(&self) -> Eclass {
        match self {
            Element::Quad(_) => Eclass::Quad,
            Element::Hex(_) => Eclass::Hex,
            Element::Tri(_) => Eclass::Tri,
            Element::Tet(_) => Eclass::Tet,
            Element::Prism(_) => Eclass::Prism,
            Element::Line(_) => Eclass::Line,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Element::Quad(q) => q.level,
            Element::Hex(h) => h.level,
            Element::Tri(t) => t.level,
            Element::Tet(t) => t.level,
            Element::Prism(p) => p.level(),
            Element::Line(l) => l.level,
        }
    }

    /// Bey kind of a simplex or prism; orthotopes and lines report 0.
    pub fn kind(&self) -> u8 {
        match self {
            Element::Quad(_) | Element::Hex(_) | Element::Line(_) => 0,
            Element::Tri(t) => t.kind,
            Element::Tet(t) => t.kind,
            Element::Prism(p) => p.kind(),
        }
    }

    /// Anchor coordinates, unused axes reported as 0.
    pub fn anchor(&self) -> [i32; 3] {
        match self {
            Element::Quad(q) => [q.x, q.y, 0],
            Element::Hex(h) => h.anchor(),
            Element::Tri(t) => [t.x, t.y, 0],
            Element::Tet(t) => t.anchor(),
            Element::Prism(p) => p.anchor(),
            Element::Line(l) => [l.x, 0, 0],
        }
    }

    pub fn vertex_coords(&self, vertex: usize) -> [i32; 3] {
        match self {
            Element::Quad(q) => {
                let [x, y] = q.vertex_coords(vertex);
                [x, y, 0]
            }
            Element::Hex(h) => h.vertex_coords(vertex),
            Element::Tri(t) => {
                let [x, y] = t.vertex_coords(vertex);
                [x, y, 0]
            }
            Element::Tet(t) => t.vertex_coords(vertex),
            Element::Prism(p) => p.vertex_coords(vertex),
            Element::Line(l) => {
                let [x] = l.vertex_coords(vertex);
                [x, 0, 0]
            }
        }
    }

    pub fn parent(&self) -> Self {
        per_class!(self, el => el.parent())
    }

    pub fn child(&self, child_id: usize) -> Self {
        per_class!(self, el => el.child(child_id))
    }

    pub fn children(&self) -> ArrayVec<Self, 8> {
        (0..self.eclass().num_children())
            .map(|k| self.child(k))
            .collect()
    }

    pub fn child_id(&self) -> usize {
        with_class!(self, el => el.child_id())
    }

    pub fn sibling(&self, sibling_id: usize) -> Self {
        per_class!(self, el => el.sibling(sibling_id))
    }

    pub fn ancestor(&self, level: u8) -> Self {
        per_class!(self, el => el.ancestor(level))
    }

    /// All strict ancestors, the parent first and the tree root last.
    pub fn ancestors(&self) -> SmallVec<[Self; 31]> {
        let mut chain = SmallVec::new();
        let mut current = *self;
        while current.level() > 0 {
            current = current.parent();
            chain.push(current);
        }
        chain
    }

    pub fn is_ancestor(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Quad(a), Element::Quad(b)) => a.is_ancestor(b),
            (Element::Hex(a), Element::Hex(b)) => a.is_ancestor(b),
            (Element::Tri(a), Element::Tri(b)) => a.is_ancestor(b),
            (Element::Tet(a), Element::Tet(b)) => a.is_ancestor(b),
            (Element::Prism(a), Element::Prism(b)) => a.is_ancestor(b),
            (Element::Line(a), Element::Line(b)) => a.is_ancestor(b),
            _ => panic!("cannot relate elements of different classes"),
        }
    }

    pub fn linear_id(&self, level: u8) -> LinearId {
        with_class!(self, el => el.linear_id(level))
    }

    pub fn from_linear_id(eclass: Eclass, id: LinearId, level: u8) -> Self {
        match eclass {
            Eclass::Quad => Element::Quad(Quad::from_linear_id(id, level)),
            Eclass::Hex => Element::Hex(Hex::from_linear_id(id, level)),
            Eclass::Tri => Element::Tri(Tri::from_linear_id(id, level)),
            Eclass::Tet => Element::Tet(Tet::from_linear_id(id, level)),
            Eclass::Prism => Element::Prism(Prism::from_linear_id(id, level)),
            Eclass::Line => Element::Line(Line::from_linear_id(id, level)),
        }
    }

    pub fn first_descendant(&self, level: u8) -> Self {
        per_class!(self, el => el.first_descendant(level))
    }

    pub fn last_descendant(&self, level: u8) -> Self {
        per_class!(self, el => el.last_descendant(level))
    }

    pub fn successor(&self, level: u8) -> Self {
        per_class!(self, el => el.successor(level))
    }

    pub fn predecessor(&self, level: u8) -> Self {
        per_class!(self, el => el.predecessor(level))
    }

    pub fn face_neighbour(&self, face: usize) -> (Self, usize) {
        match self {
            Element::Quad(q) => {
                let (n, f) = q.face_neighbour(face);
                (Element::Quad(n), f)
            }
            Element::Hex(h) => {
                let (n, f) = h.face_neighbour(face);
                (Element::Hex(n), f)
            }
            Element::Tri(t) => {
                let (n, f) = t.face_neighbour(face);
                (Element::Tri(n), f)
            }
            Element::Tet(t) => {
                let (n, f) = t.face_neighbour(face);
                (Element::Tet(n), f)
            }
            Element::Prism(p) => {
                let (n, f) = p.face_neighbour(face);
                (Element::Prism(n), f)
            }
            Element::Line(l) => {
                let (n, f) = l.face_neighbour(face);
                (Element::Line(n), f)
            }
        }
    }

    /// Codimension-one element on `face`, in the face tree's coordinates.
    /// The 3D classes require the face to lie on the root boundary.
    pub fn boundary(&self, face: usize) -> Self {
        match self {
            Element::Quad(q) => Element::Line(q.boundary(face)),
            Element::Hex(h) => Element::Quad(h.boundary(face)),
            Element::Tri(t) => Element::Line(t.boundary(face)),
            Element::Tet(t) => Element::Tri(t.boundary(face)),
            Element::Prism(p) => {
                if face < 3 {
                    Element::Quad(p.boundary_side(face))
                } else {
                    Element::Tri(p.boundary_cap(face))
                }
            }
            Element::Line(_) => panic!("line faces are vertices and carry no element"),
        }
    }

    pub fn nca(&self, other: &Self) -> Self {
        match (self, other) {
            (Element::Quad(a), Element::Quad(b)) => Element::Quad(a.nca(b)),
            (Element::Hex(a), Element::Hex(b)) => Element::Hex(a.nca(b)),
            (Element::Tri(a), Element::Tri(b)) => Element::Tri(a.nca(b)),
            (Element::Tet(a), Element::Tet(b)) => Element::Tet(a.nca(b)),
            (Element::Prism(a), Element::Prism(b)) => Element::Prism(a.nca(b)),
            (Element::Line(a), Element::Line(b)) => Element::Line(a.nca(b)),
            _ => panic!("cannot relate elements of different classes"),
        }
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Element::Quad(a), Element::Quad(b)) => a.compare(b),
            (Element::Hex(a), Element::Hex(b)) => a.compare(b),
            (Element::Tri(a), Element::Tri(b)) => a.compare(b),
            (Element::Tet(a), Element::Tet(b)) => a.compare(b),
            (Element::Prism(a), Element::Prism(b)) => a.compare(b),
            (Element::Line(a), Element::Line(b)) => a.compare(b),
            _ => panic!("cannot order elements of different classes"),
        }
    }

    pub fn is_family(family: &[Self]) -> bool {
        let Some(first) = family.first() else {
            return false;
        };
        if family.len() != first.eclass().num_children() {
            return false;
        }
        match first {
            Element::Quad(_) => Self::family_of(family, |el| match el {
                Element::Quad(q) => Some(*q),
                _ => None,
            }, Quad::is_family),
            Element::Hex(_) => Self::family_of(family, |el| match el {
                Element::Hex(h) => Some(*h),
                _ => None,
            }, Hex::is_family),
            Element::Tri(_) => Self::family_of(family, |el| match el {
                Element::Tri(t) => Some(*t),
                _ => None,
            }, Tri::is_family),
            Element::Tet(_) => Self::family_of(family, |el| match el {
                Element::Tet(t) => Some(*t),
                _ => None,
            }, Tet::is_family),
            Element::Prism(_) => Self::family_of(family, |el| match el {
                Element::Prism(p) => Some(*p),
                _ => None,
            }, Prism::is_family),
            Element::Line(_) => Self::family_of(family, |el| match el {
                Element::Line(l) => Some(*l),
                _ => None,
            }, Line::is_family),
        }
    }

    fn family_of<T>(
        family: &[Self],
        unwrap: impl Fn(&Self) -> Option<T>,
        check: impl Fn(&[T]) -> bool,
    ) -> bool {
        let mut records: ArrayVec<T, 8> = ArrayVec::new();
        for el in family {
            match unwrap(el) {
                Some(record) => records.push(record),
                None => return false,
            }
        }
        check(&records)
    }

    pub fn inside_root(&self) -> bool {
        with_class!(self, el => el.inside_root())
    }
}

/// Capability set of one element class, as consumed by the forest.
///
/// The scheme bundles the class-generic entry points with the element pool
/// backing `new_element`/`destroy_element`. All preconditions are
/// contractual; handing in an element of another class aborts.
#[derive(Debug)]
pub struct Scheme {
    eclass: Eclass,
    pool: ElementPool,
}

impl Scheme {
    pub fn new(eclass: Eclass) -> Self {
        Scheme {
            eclass,
            pool: ElementPool::new(eclass),
        }
    }

    pub fn eclass(&self) -> Eclass {
        self.eclass
    }

    /// Bytes of the class's concrete record.
    pub fn size(&self) -> usize {
        match self.eclass {
            Eclass::Quad => std::mem::size_of::<Quad>(),
            Eclass::Hex => std::mem::size_of::<Hex>(),
            Eclass::Tri => std::mem::size_of::<Tri>(),
            Eclass::Tet => std::mem::size_of::<Tet>(),
            Eclass::Prism => std::mem::size_of::<Prism>(),
            Eclass::Line => std::mem::size_of::<Line>(),
        }
    }

    pub fn max_level(&self) -> u8 {
        self.eclass.max_level()
    }

    pub fn root_len(&self) -> i32 {
        self.eclass.root_len()
    }

    pub fn num_children(&self) -> usize {
        self.eclass.num_children()
    }

    pub fn num_faces(&self) -> usize {
        self.eclass.num_faces()
    }

    pub fn child_eclass(&self, child_id: usize) -> Eclass {
        self.eclass.child_eclass(child_id)
    }

    pub fn new_element(&mut self) -> Element {
        self.pool.allocate()
    }

    pub fn destroy_element(&mut self, element: Element) {
        self.pool.release(element);
    }

    pub fn pool(&self) -> &ElementPool {
        &self.pool
    }

    fn guard(&self, element: &Element) {
        assert_eq!(
            element.eclass(),
            self.eclass,
            "element belongs to another scheme"
        );
    }

    pub fn root(&self) -> Element {
        Element::root(self.eclass)
    }

    pub fn level(&self, element: &Element) -> u8 {
        self.guard(element);
        element.level()
    }

    pub fn parent(&self, element: &Element) -> Element {
        self.guard(element);
        element.parent()
    }

    pub fn child(&self, element: &Element, child_id: usize) -> Element {
        self.guard(element);
        element.child(child_id)
    }

    pub fn children(&self, element: &Element) -> ArrayVec<Element, 8> {
        self.guard(element);
        element.children()
    }

    pub fn child_id(&self, element: &Element) -> usize {
        self.guard(element);
        element.child_id()
    }

    pub fn sibling(&self, element: &Element, sibling_id: usize) -> Element {
        self.guard(element);
        element.sibling(sibling_id)
    }

    pub fn is_family(&self, family: &[Element]) -> bool {
        family.iter().for_each(|el| self.guard(el));
        Element::is_family(family)
    }

    pub fn compare(&self, a: &Element, b: &Element) -> Ordering {
        self.guard(a);
        self.guard(b);
        a.compare(b)
    }

    pub fn nca(&self, a: &Element, b: &Element) -> Element {
        self.guard(a);
        self.guard(b);
        a.nca(b)
    }

    pub fn face_neighbour(&self, element: &Element, face: usize) -> (Element, usize) {
        self.guard(element);
        element.face_neighbour(face)
    }

    pub fn boundary(&self, element: &Element, face: usize) -> Element {
        self.guard(element);
        element.boundary(face)
    }

    pub fn get_linear_id(&self, element: &Element, level: u8) -> LinearId {
        self.guard(element);
        element.linear_id(level)
    }

    /// Overwrites `element` with the element of `level` at `id` on the
    /// class's curve.
    pub fn set_linear_id(&self, element: &mut Element, id: LinearId, level: u8) {
        self.guard(element);
        *element = Element::from_linear_id(self.eclass, id, level);
    }

    pub fn first_descendant(&self, element: &Element, level: u8) -> Element {
        self.guard(element);
        element.first_descendant(level)
    }

    pub fn last_descendant(&self, element: &Element, level: u8) -> Element {
        self.guard(element);
        element.last_descendant(level)
    }

    pub fn successor(&self, element: &Element, level: u8) -> Element {
        self.guard(element);
        element.successor(level)
    }

    pub fn predecessor(&self, element: &Element, level: u8) -> Element {
        self.guard(element);
        element.predecessor(level)
    }

    pub fn anchor(&self, element: &Element) -> [i32; 3] {
        self.guard(element);
        element.anchor()
    }

    pub fn inside_root(&self, element: &Element) -> bool {
        self.guard(element);
        element.inside_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_round_trips() {
        for eclass in [Eclass::Quad, Eclass::Hex, Eclass::Tri, Eclass::Tet, Eclass::Prism] {
            let root = Element::root(eclass);
            assert_eq!(root.eclass(), eclass);
            for (k, child) in root.children().iter().enumerate() {
                assert_eq!(child.parent(), root);
                assert_eq!(child.child_id(), k);
                assert_eq!(child.level(), 1);
                assert!(child.inside_root());
            }
            assert!(Element::is_family(&root.children()));
        }
    }

    #[test]
    fn test_scheme_capabilities() {
        let scheme = Scheme::new(Eclass::Tri);
        let root = scheme.root();
        assert_eq!(scheme.level(&root), 0);
        assert_eq!(scheme.num_children(), 4);
        assert_eq!(scheme.max_level(), 21);
        assert_eq!(scheme.child_eclass(2), Eclass::Tri);
        let c = scheme.child(&root, 3);
        assert_eq!(scheme.child_id(&c), 3);
        assert_eq!(scheme.parent(&c), root);
        assert!(scheme.compare(&root, &c) == Ordering::Less);
    }

    #[test]
    fn test_set_linear_id_overwrites_in_place() {
        let scheme = Scheme::new(Eclass::Tet);
        let mut el = scheme.root();
        scheme.set_linear_id(&mut el, 0o52, 2);
        assert_eq!(scheme.get_linear_id(&el, 2), 0o52);
        assert_eq!(el.level(), 2);
    }

    #[test]
    fn test_pool_round_trip() {
        let mut scheme = Scheme::new(Eclass::Prism);
        let el = scheme.new_element();
        assert_eq!(el.eclass(), Eclass::Prism);
        scheme.destroy_element(el);
        assert_eq!(scheme.pool().live(), 0);
        assert_eq!(scheme.pool().pooled(), 1);
    }

    #[test]
    fn test_ancestors_chain() {
        let el = Element::root(Eclass::Tet).child(5).child(2).child(7);
        let chain = el.ancestors();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], el.parent());
        assert_eq!(chain[2], Element::root(Eclass::Tet));
        assert!(chain[2].is_ancestor(&el));
    }

    #[test]
    fn test_boundary_dispatch() {
        let hex = Element::root(Eclass::Hex).child(5);
        let quad = hex.boundary(2);
        assert_eq!(quad.eclass(), Eclass::Quad);
        let line = quad.boundary(0);
        assert_eq!(line.eclass(), Eclass::Line);
        for face in 0..Eclass::Tet.num_faces() {
            let tri = Element::root(Eclass::Tet).boundary(face);
            assert_eq!(tri.eclass(), Eclass::Tri);
            assert!(tri.inside_root());
        }
        let prism = Element::root(Eclass::Prism);
        assert_eq!(prism.boundary(1).eclass(), Eclass::Quad);
        assert_eq!(prism.boundary(4).eclass(), Eclass::Tri);
    }

    #[test]
    #[should_panic]
    fn test_cross_class_compare_is_fatal() {
        let _ = Element::root(Eclass::Tri).compare(&Element::root(Eclass::Quad));
    }

    #[test]
    #[should_panic]
    fn test_foreign_element_is_fatal() {
        let scheme = Scheme::new(Eclass::Tet);
        let _ = scheme.level(&Element::root(Eclass::Hex));
    }
}
