//! Moving a window to another screen.
//!
//! [`plan`] is pure: it picks the destination screen and computes the new
//! frame, but leaves committing it (and telling the user) to the
//! [`Tiler`](crate::tiler::Tiler).

use crate::feedback::Direction;
use crate::geometry::{Frame, Screen};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// Only the window's own screen is connected.
    #[error("no other screens")]
    NoOtherScreens,
}

/// The outcome of [`plan`].
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub destination: Screen,
    pub frame: Frame,
    /// Direction of travel of the window's origin; `None` if it stays put.
    pub direction: Option<Direction>,
}

/// A window is maximized when its size matches its screen's visible size
/// exactly.
pub fn is_maximized(window: &Frame, screen: &Screen) -> bool {
    window.width == screen.visible_frame.width && window.height == screen.visible_frame.height
}

/// First screen in enumeration order that is not `current`.
pub fn select_destination<'a>(current: &Screen, screens: &'a [Screen]) -> Option<&'a Screen> {
    if screens.len() < 2 {
        return None;
    }
    screens.iter().find(|s| s.id != current.id)
}

/// Plan moving `window` from `current` to another screen.
///
/// A maximized window with `keep_maximized` fills the destination's
/// visible frame.  Anything else keeps its size, shrunk per axis to fit,
/// and lands on the destination's visible origin.
pub fn plan(
    window: &Frame,
    current: &Screen,
    screens: &[Screen],
    keep_maximized: bool,
) -> Result<Migration, MigrationError> {
    let destination = select_destination(current, screens).ok_or(MigrationError::NoOtherScreens)?;
    let target = destination.visible_frame;

    let frame = if keep_maximized && is_maximized(window, current) {
        target
    } else {
        Frame::new(
            target.x,
            target.y,
            window.width.min(target.width),
            window.height.min(target.height),
        )
    };

    Ok(Migration {
        destination: destination.clone(),
        frame,
        direction: Direction::between(window, &frame),
    })
}
