//! Collision geometry helpers shared by the physics and placement passes.

use crate::core::types::{Rect, Vec2};

/// Minimum translation to push `moving` out of `stationary`, along the
/// axis of least penetration. `None` when the rects do not overlap.
/// Coincident centers have no resolvable direction and push nowhere.
pub fn push_out(moving: &Rect, stationary: &Rect) -> Option<Vec2> {
    if !moving.intersects(stationary) {
        return None;
    }

    let delta = moving.center() - stationary.center();
    let combined_half_w = (moving.width + stationary.width) / 2.0;
    let combined_half_h = (moving.height + stationary.height) / 2.0;

    let overlap_x = combined_half_w - delta.x.abs();
    let overlap_y = combined_half_h - delta.y.abs();

    if overlap_x < overlap_y {
        let sign = if delta.x > 0.0 { 1.0 } else { -1.0 };
        Some(Vec2::new(sign * overlap_x, 0.0))
    } else {
        let sign = if delta.y > 0.0 { 1.0 } else { -1.0 };
        Some(Vec2::new(0.0, sign * overlap_y))
    }
}

/// Clamps a center position so its half-extents stay inside `bounds`.
/// Returns the clamped position and which axes were clamped.
pub fn clamp_to_bounds(position: Vec2, half_size: Vec2, bounds: &Rect) -> (Vec2, bool, bool) {
    let mut clamped = position;
    let mut clamped_x = false;
    let mut clamped_y = false;

    if clamped.x - half_size.x < bounds.x {
        clamped.x = bounds.x + half_size.x;
        clamped_x = true;
    } else if clamped.x + half_size.x > bounds.x + bounds.width {
        clamped.x = bounds.x + bounds.width - half_size.x;
        clamped_x = true;
    }

    if clamped.y - half_size.y < bounds.y {
        clamped.y = bounds.y + half_size.y;
        clamped_y = true;
    } else if clamped.y + half_size.y > bounds.y + bounds.height {
        clamped.y = bounds.y + bounds.height - half_size.y;
        clamped_y = true;
    }

    (clamped, clamped_x, clamped_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_out_least_penetration_axis() {
        // Deep vertical overlap, shallow horizontal overlap: push on x
        let moving = Rect::from_center(Vec2::new(58.0, 50.0), Vec2::new(20.0, 20.0));
        let wall = Rect::from_center(Vec2::new(40.0, 50.0), Vec2::new(20.0, 20.0));

        let push = push_out(&moving, &wall).expect("rects overlap");
        assert!(push.x > 0.0, "should push away from the wall center");
        assert_eq!(push.y, 0.0);

        // After applying the push the rects no longer overlap
        let resolved = Rect::from_center(
            moving.center() + push,
            Vec2::new(moving.width, moving.height),
        );
        assert!(!resolved.intersects(&wall));
    }

    #[test]
    fn test_push_out_is_idempotent() {
        let moving = Rect::from_center(Vec2::new(55.0, 50.0), Vec2::new(20.0, 20.0));
        let wall = Rect::from_center(Vec2::new(40.0, 50.0), Vec2::new(20.0, 20.0));

        let push = push_out(&moving, &wall).unwrap();
        let resolved = Rect::from_center(
            moving.center() + push,
            Vec2::new(moving.width, moving.height),
        );
        assert!(
            push_out(&resolved, &wall).is_none(),
            "a second resolution must find nothing to do"
        );
    }

    #[test]
    fn test_no_overlap_no_push() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(100.0, 100.0, 10.0, 10.0);
        assert!(push_out(&a, &b).is_none());
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = Rect::new(0.0, 0.0, 1280.0, 720.0);
        let (pos, cx, cy) = clamp_to_bounds(Vec2::new(-5.0, 360.0), Vec2::new(16.0, 16.0), &bounds);
        assert_eq!(pos, Vec2::new(16.0, 360.0));
        assert!(cx);
        assert!(!cy);

        let (pos, cx, cy) =
            clamp_to_bounds(Vec2::new(640.0, 800.0), Vec2::new(16.0, 16.0), &bounds);
        assert_eq!(pos, Vec2::new(640.0, 704.0));
        assert!(!cx);
        assert!(cy);
    }

    #[test]
    fn test_inside_bounds_untouched() {
        let bounds = Rect::new(0.0, 0.0, 1280.0, 720.0);
        let (pos, cx, cy) =
            clamp_to_bounds(Vec2::new(640.0, 360.0), Vec2::new(16.0, 16.0), &bounds);
        assert_eq!(pos, Vec2::new(640.0, 360.0));
        assert!(!cx && !cy);
    }
}
