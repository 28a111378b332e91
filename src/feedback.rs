//! User-facing labels and alert placement.
//!
//! Nothing in here influences control flow: labels are advisory text shown
//! through the host's alert overlay after (or instead of) a move.

use crate::geometry::{primary_screen, CoordinateSpace, Frame, Point, Screen};
use crate::partition::Partition;
use std::fmt;
use std::time::Duration;

/// Compass direction of a window move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::UpLeft => write!(f, "up-left"),
            Direction::UpRight => write!(f, "up-right"),
            Direction::DownLeft => write!(f, "down-left"),
            Direction::DownRight => write!(f, "down-right"),
        }
    }
}

/// `[sign(dy) + 1][sign(dx) + 1]`, in global space (Y grows downward).
const COMPASS: [[Option<Direction>; 3]; 3] = [
    [Some(Direction::UpLeft), Some(Direction::Up), Some(Direction::UpRight)],
    [Some(Direction::Left), None, Some(Direction::Right)],
    [Some(Direction::DownLeft), Some(Direction::Down), Some(Direction::DownRight)],
];

fn sign_index(v: f64) -> usize {
    if v < 0.0 {
        0
    } else if v > 0.0 {
        2
    } else {
        1
    }
}

impl Direction {
    /// Direction of travel for a move by `(dx, dy)`; `None` when the origin
    /// did not move.
    pub fn from_delta(dx: f64, dy: f64) -> Option<Direction> {
        COMPASS[sign_index(dy)][sign_index(dx)]
    }

    /// Direction from `from`'s origin to `to`'s origin.
    pub fn between(from: &Frame, to: &Frame) -> Option<Direction> {
        Self::from_delta(to.x - from.x, to.y - from.y)
    }
}

/// Human-readable label for a move by `(dx, dy)`.
pub fn direction_label(dx: f64, dy: f64) -> String {
    match Direction::from_delta(dx, dy) {
        Some(dir) => dir.to_string(),
        None => "no movement".to_string(),
    }
}

/// Label shown after snapping a window to `partition`.
pub fn partition_text(partition: Partition) -> &'static str {
    match partition {
        Partition::Left => "Left half",
        Partition::Right => "Right half",
        Partition::Up => "Top half",
        Partition::Down => "Bottom half",
        Partition::TopLeft => "Top-left quarter",
        Partition::TopRight => "Top-right quarter",
        Partition::BottomLeft => "Bottom-left quarter",
        Partition::BottomRight => "Bottom-right quarter",
        Partition::Centre => "Centre",
        Partition::LeftThird => "Left third",
        Partition::CentreThird => "Centre third",
        Partition::RightThird => "Right third",
        Partition::Left2Thirds => "Left two thirds",
        Partition::Right2Thirds => "Right two thirds",
        Partition::TopLeftSix => "Top-left sixth",
        Partition::TopCentreSix => "Top-centre sixth",
        Partition::TopRightSix => "Top-right sixth",
        Partition::BotLeftSix => "Bottom-left sixth",
        Partition::BotCentreSix => "Bottom-centre sixth",
        Partition::BotRightSix => "Bottom-right sixth",
    }
}

/// Label for a partition given by name.
///
/// A name with no label (anything outside the catalog) comes back
/// verbatim; this never fails.
pub fn partition_label(name: &str) -> String {
    match name.parse::<Partition>() {
        Ok(p) => partition_text(p).to_string(),
        Err(_) => name.to_string(),
    }
}

/// A transient text overlay, fully positioned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub text: String,
    /// Anchor point, expressed in `space`.
    pub origin: Point,
    pub space: CoordinateSpace,
    pub duration: Duration,
}

impl Alert {
    /// An alert anchored at the centre of `screen`'s visible frame.
    ///
    /// `screen` and `screens` are in global space; the origin is converted
    /// into `space` using the primary display's height.
    pub fn on_screen(
        text: impl Into<String>,
        screen: &Screen,
        screens: &[Screen],
        space: CoordinateSpace,
        duration: Duration,
    ) -> Self {
        let primary_height = primary_screen(screens)
            .map(|s| s.frame.height)
            .unwrap_or(screen.frame.height);
        let origin = screen
            .visible_frame
            .center()
            .to_space(CoordinateSpace::Global, space, primary_height);
        Self {
            text: text.into(),
            origin,
            space,
            duration,
        }
    }
}
