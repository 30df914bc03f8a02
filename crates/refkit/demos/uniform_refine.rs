//! Refines every element class uniformly and prints per-level statistics.

use refkit::prelude::*;

fn main() {
    for eclass in [Eclass::Quad, Eclass::Hex, Eclass::Tri, Eclass::Tet, Eclass::Prism] {
        let mut front = vec![Element::root(eclass)];
        println!("{eclass:?} (children per element: {})", eclass.num_children());
        for level in 1..=3u8 {
            front = front.iter().flat_map(Element::children).collect();
            let families = front.chunks(eclass.num_children()).filter(|c| Element::is_family(c)).count();
            let inside = front.iter().filter(|el| el.inside_root()).count();
            println!(
                "  level {level}: {} elements, {families} families, {inside} inside the root",
                front.len(),
            );
        }
    }
}
