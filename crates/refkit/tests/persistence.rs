//! Element records serialize as fixed-width integers; a persistence layer
//! stores (class, level, kind, anchor) and nothing else.

use refkit::prelude::*;

fn round_trip(el: &Element) -> Element {
    let json = serde_json::to_string(el).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_records_round_trip_through_json() {
    let elements = [
        Element::root(Eclass::Quad).child(3).child(1),
        Element::root(Eclass::Hex).child(6),
        Element::root(Eclass::Tri).child(2).child(2),
        Element::root(Eclass::Tet).child(4).child(7).child(0),
        Element::root(Eclass::Prism).child(5).child(3),
        Element::root(Eclass::Line).child(1),
    ];
    for el in &elements {
        let back = round_trip(el);
        assert_eq!(back, *el);
        assert_eq!(back.eclass(), el.eclass());
        assert_eq!(back.level(), el.level());
        assert_eq!(back.anchor(), el.anchor());
        assert_eq!(back.kind(), el.kind());
    }
}

#[test]
fn test_surround_survives_serialization() {
    let quad = Element::root(Eclass::Hex).child(2).boundary(5);
    let back = round_trip(&quad);
    assert_eq!(back, quad);
    if let (Element::Quad(a), Element::Quad(b)) = (&quad, &back) {
        assert_eq!(a.surround, b.surround);
        assert!(a.surround.is_some());
    } else {
        panic!("hex boundary must be a quad");
    }
}
