//! Popup placement and hit testing.
//!
//! The check combo popup is an overlay anchored to the trigger line. These
//! helpers decide where it goes, clear the cells under it, and translate a
//! pointer position back into a row index.

use ratatui::layout::{Position, Rect};
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;

/// Place a popup of `height` x `width` cells next to `anchor`, inside `bounds`.
///
/// The popup goes below the anchor when it fits. Otherwise it goes on
/// whichever side has more room and is cut to that room. It is never
/// narrower than the anchor (bounds permitting) and is shifted left if it
/// would overflow the right edge.
pub fn popup_area(anchor: Rect, bounds: Rect, height: u16, width: u16) -> Rect {
    let width = width.max(anchor.width).min(bounds.width);
    let x = if anchor.x.saturating_add(width) > bounds.right() {
        bounds.right().saturating_sub(width).max(bounds.x)
    } else {
        anchor.x.max(bounds.x)
    };

    let below = bounds.bottom().saturating_sub(anchor.bottom());
    let above = anchor.y.saturating_sub(bounds.y);

    if height <= below || below >= above {
        Rect::new(x, anchor.bottom(), width, height.min(below))
    } else {
        let h = height.min(above);
        Rect::new(x, anchor.y - h, width, h)
    }
}

/// Map a pointer position inside the popup's `inner` area to a row index,
/// given the popup's scroll `offset`.
pub fn row_at(inner: Rect, offset: usize, position: Position) -> Option<usize> {
    if !inner.contains(position) {
        return None;
    }
    Some(offset + (position.y - inner.y) as usize)
}

/// Clear the overlay area and render the optional block border.
///
/// Returns the inner area (after block padding, if any).
pub fn render_overlay(frame: &mut Frame, area: Rect, block: Option<&Block>) -> Rect {
    frame.render_widget(Clear, area);
    if let Some(block) = block {
        let inner = block.inner(area);
        frame.render_widget(block.clone(), area);
        inner
    } else {
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 40,
        height: 20,
    };

    #[test]
    fn fits_below() {
        let anchor = Rect::new(2, 1, 20, 1);
        assert_eq!(popup_area(anchor, SCREEN, 6, 10), Rect::new(2, 2, 20, 6));
    }

    #[test]
    fn widens_past_anchor() {
        let anchor = Rect::new(2, 1, 10, 1);
        assert_eq!(popup_area(anchor, SCREEN, 4, 16).width, 16);
    }

    #[test]
    fn shifts_left_at_right_edge() {
        let anchor = Rect::new(30, 1, 8, 1);
        let area = popup_area(anchor, SCREEN, 4, 16);
        assert_eq!(area.x, 24);
        assert_eq!(area.right(), 40);
    }

    #[test]
    fn flips_above_when_more_room() {
        let anchor = Rect::new(0, 17, 20, 1);
        let area = popup_area(anchor, SCREEN, 6, 20);
        assert_eq!(area, Rect::new(0, 11, 20, 6));
    }

    #[test]
    fn cut_to_room_when_nothing_fits() {
        let anchor = Rect::new(0, 12, 20, 1);
        // 7 rows below, 12 above: goes above, cut to 12
        let area = popup_area(anchor, SCREEN, 15, 20);
        assert_eq!(area, Rect::new(0, 0, 20, 12));
    }

    #[test]
    fn no_room_gives_empty_rect() {
        let anchor = Rect::new(0, 0, 40, 20);
        assert_eq!(popup_area(anchor, SCREEN, 5, 10).height, 0);
    }

    #[test]
    fn row_at_maps_with_offset() {
        let inner = Rect::new(1, 3, 10, 4);
        assert_eq!(row_at(inner, 0, Position::new(2, 3)), Some(0));
        assert_eq!(row_at(inner, 5, Position::new(2, 5)), Some(7));
        assert_eq!(row_at(inner, 0, Position::new(0, 3)), None);
        assert_eq!(row_at(inner, 0, Position::new(2, 7)), None);
    }
}
