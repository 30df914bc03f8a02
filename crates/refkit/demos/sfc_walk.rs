//! Walks the space-filling curve of the tetrahedral tree at one level and
//! prints each element's id, anchor and kind.

use refkit::prelude::*;

fn main() {
    let eclass = Eclass::Tet;
    let level = 2u8;
    let scheme = Scheme::new(eclass);
    let mut el = scheme.root().first_descendant(level);
    let total = (eclass.num_children() as u128).pow(u32::from(level));
    for id in 0..total {
        assert_eq!(scheme.get_linear_id(&el, level), id);
        let [x, y, z] = scheme.anchor(&el);
        println!("{id:4}  anchor ({x:8}, {y:8}, {z:8})  kind {}", el.kind());
        if id + 1 < total {
            el = scheme.successor(&el, level);
        }
    }
}
