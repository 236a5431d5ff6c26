#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use neat_arcade::simulation::collision::{Extent, Mask, overlaps};
use neat_arcade::simulation::rng::SimRng;

#[test]
fn rectangles_overlap_by_interval_intersection() {
    let a = Extent::rect(0.0, 0.0, 10.0, 10.0);
    assert!(overlaps(&a, &Extent::rect(5.0, 5.0, 10.0, 10.0)));
    assert!(!overlaps(&a, &Extent::rect(20.0, 0.0, 10.0, 10.0)));
    // Touching edges are not material overlap.
    assert!(!overlaps(&a, &Extent::rect(10.0, 0.0, 10.0, 10.0)));
}

#[test]
fn ellipse_against_rect_is_exact_at_the_corners() {
    // Circle of radius 5 centered at (5, 5).
    let circle = Extent::ellipse(0.0, 0.0, 10.0, 10.0);

    // Bounding boxes overlap but the disc misses the corner.
    let missing = Extent::rect(8.6, 8.6, 10.0, 10.0);
    assert!(!overlaps(&circle, &missing));

    // Nudged in far enough for the disc to reach it.
    let hitting = Extent::rect(8.4, 8.4, 10.0, 10.0);
    assert!(overlaps(&circle, &hitting));
}

#[test]
fn tall_ellipse_reaches_where_its_scaled_circle_reaches() {
    // Semi-axes 5 and 10; the point (9, 14) lies inside the ellipse.
    let tall = Extent::ellipse(0.0, 0.0, 10.0, 20.0);
    let probe = Extent::rect(9.0, 14.0, 4.0, 2.0);
    assert!(overlaps(&tall, &probe));

    // A probe outside the ellipse but inside the bounding box.
    let outside = Extent::rect(9.3, 18.5, 4.0, 2.0);
    assert!(!overlaps(&tall, &outside));
}

#[test]
fn rounded_rectangles_miss_on_their_shaved_corners() {
    let a = Extent::rounded(0.0, 0.0, 20.0, 20.0, 5.0);
    let corner_miss = Extent::rounded(18.0, 18.0, 20.0, 20.0, 5.0);
    assert!(!overlaps(&a, &corner_miss));

    let corner_hit = Extent::rounded(16.0, 16.0, 20.0, 20.0, 5.0);
    assert!(overlaps(&a, &corner_hit));
}

#[test]
fn ellipse_pairs_use_a_cover_that_never_false_negatives() {
    let a = Extent::ellipse(0.0, 0.0, 40.0, 20.0);
    // Clearly interpenetrating.
    let b = Extent::ellipse(10.0, 5.0, 40.0, 20.0);
    assert!(overlaps(&a, &b));

    // Boxes apart entirely.
    let c = Extent::ellipse(100.0, 100.0, 40.0, 20.0);
    assert!(!overlaps(&a, &c));
}

#[test]
fn overlap_is_symmetric_across_masks_and_positions() {
    let mut rng = SimRng::seeded(31);
    let masks = [
        Mask::Rect,
        Mask::RoundedRect { radius: 6.0 },
        Mask::Ellipse,
    ];
    for _ in 0..500 {
        let a = Extent {
            x: rng.uniform(0.0, 100.0),
            y: rng.uniform(0.0, 100.0),
            w: rng.uniform(5.0, 60.0),
            h: rng.uniform(5.0, 60.0),
            mask: masks[rng.below(masks.len())],
        };
        let b = Extent {
            x: rng.uniform(0.0, 100.0),
            y: rng.uniform(0.0, 100.0),
            w: rng.uniform(5.0, 60.0),
            h: rng.uniform(5.0, 60.0),
            mask: masks[rng.below(masks.len())],
        };
        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }
}

#[test]
fn contained_shapes_always_overlap() {
    let outer = Extent::rect(0.0, 0.0, 100.0, 100.0);
    let inner_ellipse = Extent::ellipse(40.0, 40.0, 10.0, 10.0);
    let inner_rounded = Extent::rounded(40.0, 40.0, 10.0, 10.0, 3.0);
    assert!(overlaps(&outer, &inner_ellipse));
    assert!(overlaps(&outer, &inner_rounded));
    assert!(overlaps(&inner_ellipse, &inner_rounded));
}
