//! Overlap oracle for agent and obstacle extents.
//!
//! Sprites are approximated by silhouette masks rather than real pixel
//! data: an ellipse for the bird shapes, a rounded rectangle for the dino
//! poses, plain rectangles for pipes, barriers, and paddles. Exact-pixel
//! fidelity is a rendering-layer concern; the oracle's contract is that
//! materially overlapping silhouettes never produce a false negative.
//!
//! Rect/rect and ellipse/rect pairs are exact. Pairs involving a rounded
//! silhouette on both sides fall back to a rounded-rectangle cover of each
//! mask, which is slightly conservative (it can report an overlap a pixel
//! test would barely miss) but never misses a real one.

use serde::{Deserialize, Serialize};

/// Silhouette mask applied to a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mask {
    /// The bounding box itself.
    Rect,
    /// Rectangle with circular corners of the given radius.
    RoundedRect {
        /// Corner radius; clamped to half the smaller box dimension.
        radius: f32,
    },
    /// Axis-aligned ellipse inscribed in the bounding box.
    Ellipse,
}

/// Current visual extent of an entity: bounding box plus silhouette mask.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Extent {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width.
    pub w: f32,
    /// Box height.
    pub h: f32,
    /// Silhouette mask tested inside the box.
    pub mask: Mask,
}

impl Extent {
    /// Rectangular extent.
    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            mask: Mask::Rect,
        }
    }

    /// Rounded-rectangle extent.
    pub fn rounded(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            mask: Mask::RoundedRect { radius },
        }
    }

    /// Elliptical extent inscribed in the box.
    pub fn ellipse(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            mask: Mask::Ellipse,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Tests whether two extents materially overlap.
///
/// Symmetric and order-independent: `overlaps(a, b) == overlaps(b, a)` for
/// every mask pairing. Touching edges do not count as overlap.
pub fn overlaps(a: &Extent, b: &Extent) -> bool {
    if !boxes_overlap(a, b) {
        return false;
    }
    match (a.mask, b.mask) {
        (Mask::Rect, Mask::Rect) => true,
        (Mask::Ellipse, Mask::Rect) => ellipse_rect(a, b),
        (Mask::Rect, Mask::Ellipse) => ellipse_rect(b, a),
        _ => rounded_pair(a, b),
    }
}

fn boxes_overlap(a: &Extent, b: &Extent) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

/// Exact ellipse-vs-rectangle test: rescale the vertical axis so the
/// ellipse becomes a circle, then run the closest-point circle test.
fn ellipse_rect(e: &Extent, r: &Extent) -> bool {
    let rx = e.w * 0.5;
    let ry = e.h * 0.5;
    if rx <= f32::EPSILON || ry <= f32::EPSILON {
        // Degenerate ellipse; the bounding boxes already overlap.
        return true;
    }
    let sy = rx / ry;
    let cx = e.x + rx;
    let cy = (e.y + ry) * sy;
    let top = r.y * sy;
    let bottom = (r.y + r.h) * sy;
    let px = cx.clamp(r.x, r.x + r.w);
    let py = cy.clamp(top, bottom);
    let dx = cx - px;
    let dy = cy - py;
    dx * dx + dy * dy < rx * rx
}

/// Conservative test for mask pairs with two rounded silhouettes: cover
/// each mask with a rounded rectangle (an ellipse fits inside the rounded
/// rectangle of equal box and radius `min(w, h) / 2`), then compare the
/// gap between the deflated cores against the radius sum.
fn rounded_pair(a: &Extent, b: &Extent) -> bool {
    let (core_a, ra) = rounded_core(a);
    let (core_b, rb) = rounded_core(b);
    let dx = (core_a.0 - (core_b.0 + core_b.2)).max(core_b.0 - (core_a.0 + core_a.2)).max(0.0);
    let dy = (core_a.1 - (core_b.1 + core_b.3)).max(core_b.1 - (core_a.1 + core_a.3)).max(0.0);
    if dx == 0.0 && dy == 0.0 {
        return true;
    }
    let reach = ra + rb;
    dx * dx + dy * dy < reach * reach
}

/// Deflated core rectangle `(x, y, w, h)` and corner radius for a mask.
fn rounded_core(e: &Extent) -> ((f32, f32, f32, f32), f32) {
    let max_radius = (e.w.min(e.h)) * 0.5;
    let r = match e.mask {
        Mask::Rect => 0.0,
        Mask::RoundedRect { radius } => radius.clamp(0.0, max_radius),
        Mask::Ellipse => max_radius,
    };
    ((e.x + r, e.y + r, e.w - 2.0 * r, e.h - 2.0 * r), r)
}
