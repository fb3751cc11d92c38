//! Axis-separated collision resolution against static tile geometry.
//!
//! Displacements are resolved one axis at a time, horizontal first. The
//! horizontal pass only ever cancels movement, while the vertical pass clamps
//! the body flush against the obstacle it would have entered. Keeping the axes
//! independent is what stops bodies from catching on tile corners.

use platformer_core::Rect;

/// Outcome of resolving a proposed displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Horizontal displacement that may be applied.
    pub dx: f32,
    /// Vertical displacement that may be applied.
    pub dy: f32,
    /// Vertical velocity after the resolution.
    pub velocity_y: f32,
    /// Indicates that an obstacle cancelled the horizontal displacement.
    pub blocked_x: bool,
    /// Indicates that the body came to rest on top of a surface.
    pub landed: bool,
}

/// Resolves a displacement of `body` against `obstacles`, x before y.
///
/// `velocity_y` decides the clamp direction on vertical contact: a rising body
/// stops flush under the obstacle, anything else lands flush on top of it.
/// When `ground_line` is set, the body also lands on that fixed height.
#[must_use]
pub fn resolve(
    body: Rect,
    dx: f32,
    dy: f32,
    velocity_y: f32,
    obstacles: &[Rect],
    ground_line: Option<f32>,
) -> Resolution {
    let mut resolution = Resolution {
        dx,
        dy,
        velocity_y,
        blocked_x: false,
        landed: false,
    };

    if dx != 0.0 {
        let swept = body.translated(dx, 0.0);
        if obstacles.iter().any(|obstacle| obstacle.overlaps(&swept)) {
            resolution.dx = 0.0;
            resolution.blocked_x = true;
        }
    }

    let horizontal = body.translated(resolution.dx, 0.0);
    let rising = velocity_y < 0.0;
    for obstacle in obstacles {
        if !obstacle.overlaps(&horizontal.translated(0.0, resolution.dy)) {
            continue;
        }

        resolution.velocity_y = 0.0;
        if rising {
            resolution.dy = obstacle.bottom() - horizontal.top();
        } else {
            resolution.dy = obstacle.top() - horizontal.bottom();
            resolution.landed = true;
        }
    }

    if let Some(line) = ground_line {
        if horizontal.bottom() + resolution.dy > line {
            resolution.dy = line - horizontal.bottom();
            resolution.velocity_y = 0.0;
            resolution.landed = true;
        }
    }

    resolution
}

/// Reports whether `body` overlaps any hazard rectangle.
#[must_use]
pub fn touches_hazard(body: &Rect, hazards: &[Rect]) -> bool {
    hazards.iter().any(|hazard| hazard.overlaps(body))
}
