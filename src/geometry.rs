//! Rectangles, points and screens.
//!
//! Every [`Frame`] lives in a [`CoordinateSpace`].  Hosts hand geometry to
//! tilebind in the *global* space (origin top-left of the primary display,
//! Y grows downward); some overlay primitives want the *flipped* space
//! (origin bottom-left, Y grows upward).  Converting between the two is
//! always explicit; see [`Frame::to_space`].

use serde::{Deserialize, Serialize};

/// Which way the Y axis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Origin top-left of the primary display, Y increases downward.
    #[default]
    Global,
    /// Origin bottom-left of the primary display, Y increases upward.
    Flipped,
}

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Express this point in `to`, given the space it is currently in.
    ///
    /// `primary_height` is the full height of the primary display, which
    /// anchors both spaces.
    pub fn to_space(self, from: CoordinateSpace, to: CoordinateSpace, primary_height: f64) -> Self {
        if from == to {
            return self;
        }
        Self {
            x: self.x,
            y: primary_height - self.y,
        }
    }
}

/// An axis-aligned rectangle in screen points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Build a frame.  Negative sizes are clamped to zero.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `p` lies inside this frame (the far edges are exclusive).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.max_x() && p.y >= self.y && p.y < self.max_y()
    }

    /// Whether `other` lies inside this frame, allowing each edge to poke
    /// out by at most `tolerance`.
    pub fn contains_frame(&self, other: &Frame, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.max_x() <= self.max_x() + tolerance
            && other.max_y() <= self.max_y() + tolerance
    }

    /// Area of the overlap between two frames (zero when disjoint).
    pub fn intersection_area(&self, other: &Frame) -> f64 {
        let w = self.max_x().min(other.max_x()) - self.x.max(other.x);
        let h = self.max_y().min(other.max_y()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Express this frame in `to`, given the space it is currently in.
    ///
    /// The conversion mirrors the frame about the primary display's
    /// horizontal extent, so applying it twice returns the original frame.
    pub fn to_space(self, from: CoordinateSpace, to: CoordinateSpace, primary_height: f64) -> Self {
        if from == to {
            return self;
        }
        Self {
            y: primary_height - (self.y + self.height),
            ..self
        }
    }
}

/// Place `offset` relative to `origin` and snap it to a whole unit.
///
/// All geometry produced by the partition engine passes through here, so
/// results are always anchored on the parent's own origin (which may sit
/// anywhere, including at negative coordinates, in a multi-monitor
/// desktop) and never request sub-pixel placement.
pub fn normalize(origin: f64, offset: f64) -> f64 {
    (origin + offset).round()
}

/// A connected display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    /// Stable identifier (e.g. `"DP-1"`), unique among connected screens.
    pub id: String,
    /// Full frame, including menu bars, docks and panels.
    pub frame: Frame,
    /// The part of `frame` that windows may occupy.
    pub visible_frame: Frame,
}

impl Screen {
    pub fn new(id: impl Into<String>, frame: Frame, visible_frame: Frame) -> Self {
        Self {
            id: id.into(),
            frame,
            visible_frame,
        }
    }

    /// A screen with no system chrome (visible frame == frame).
    pub fn bare(id: impl Into<String>, frame: Frame) -> Self {
        Self::new(id, frame, frame)
    }

    /// This screen with both frames expressed in `to`.
    pub fn to_space(&self, from: CoordinateSpace, to: CoordinateSpace, primary_height: f64) -> Self {
        Self {
            id: self.id.clone(),
            frame: self.frame.to_space(from, to, primary_height),
            visible_frame: self.visible_frame.to_space(from, to, primary_height),
        }
    }
}

/// The primary display: the one whose global frame starts at `(0, 0)`,
/// falling back to the first enumerated screen.
pub fn primary_screen(screens: &[Screen]) -> Option<&Screen> {
    screens
        .iter()
        .find(|s| s.frame.x == 0.0 && s.frame.y == 0.0)
        .or_else(|| screens.first())
}

/// The screen containing `p`, falling back to the first enumerated screen.
pub fn screen_at_point(screens: &[Screen], p: Point) -> Option<&Screen> {
    screens
        .iter()
        .find(|s| s.frame.contains_point(p))
        .or_else(|| screens.first())
}

/// The screen with the largest overlap with `frame`.
///
/// Used when a host cannot say which screen a window belongs to.
pub fn screen_for_frame<'a>(screens: &'a [Screen], frame: &Frame) -> Option<&'a Screen> {
    screens
        .iter()
        .max_by(|a, b| {
            a.frame
                .intersection_area(frame)
                .partial_cmp(&b.frame.intersection_area(frame))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
