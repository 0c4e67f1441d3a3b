//! Fanned, depth-stacked placement of a wallet's cards.

use kurbo::{Point, Rect, Vec2};

/// Horizontal and vertical step between consecutive shown cards.
pub const CARD_DISTANCE_OFFSET: f64 = 5.0;
/// Depth step between consecutive shown cards.
pub const Z_POSITION_OFFSET: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub center: Point,
    pub z_position: f64,
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Outside the visible window; not drawn at all.
    Hidden,
    Shown(Slot),
}

/// Where the stack sits: the wallet's center, lifted to half its height
/// from the container origin. Coordinates are truncated to whole units.
pub fn base_anchor(wallet_frame: Rect) -> Point {
    let center = wallet_frame.center();
    Point::new(center.x.trunc(), (center.y.trunc() / 2.0).trunc())
}

/// How many of the oldest cards fall outside the window.
pub fn drop_count(count: usize, max_showable: usize) -> usize {
    count.saturating_sub(max_showable)
}

/// Place `count` cards, oldest first. The most recent `max_showable` are
/// fanned out from `base`; only the last of them takes touches.
pub fn arrange(count: usize, max_showable: usize, base: Point) -> Vec<Placement> {
    let drop = drop_count(count, max_showable);
    let shown = count - drop;

    let hidden = std::iter::repeat(Placement::Hidden).take(drop);
    let fanned = (0..shown).map(|index| {
        let step = index as f64;
        Placement::Shown(Slot {
            center: base + Vec2::new(-CARD_DISTANCE_OFFSET * step, CARD_DISTANCE_OFFSET * step),
            z_position: Z_POSITION_OFFSET * step,
            interactive: index + 1 == shown,
        })
    });

    hidden.chain(fanned).collect()
}
