//! Actions, commands and window info shared by every component.
//!
//! An [`Action`] is what a key chord is bound to: an immutable value that
//! carries all of its parameters.  A [`Command`] is what arrives from a
//! [`CommandSource`](crate::traits::CommandSource): either a chord the host
//! saw fire, or an action requested directly.
//!
//! # Wire format
//!
//! ```json
//! {"Chord":"ctrl+alt+left"}
//! {"Move":"leftThird"}
//! "Maximize"
//! {"NextScreen":{"keep_maximized":true}}
//! ```

use crate::binding::Chord;
use crate::geometry::Frame;
use crate::partition::Partition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something a chord can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Snap the focused window to a partition of its screen.
    MoveTo(Partition),
    /// Fill the screen's visible frame.
    Maximize,
    /// Move the focused window to the next screen.
    ///
    /// With `keep_maximized`, a maximized window fills the destination too;
    /// otherwise it is shrunk to fit.
    NextScreen { keep_maximized: bool },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveTo(p) => write!(f, "move to {}", p),
            Action::Maximize => write!(f, "maximize"),
            Action::NextScreen { keep_maximized: true } => write!(f, "next screen (keep maximized)"),
            Action::NextScreen { keep_maximized: false } => write!(f, "next screen"),
        }
    }
}

/// Every request the [`Tiler`](crate::tiler::Tiler) handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A registered chord fired; run whatever it is bound to.
    Chord(Chord),
    /// Snap to a partition given by name.
    ///
    /// The name is resolved on arrival; an unknown name is reported back to
    /// the user and nothing moves.
    Move(String),
    Maximize,
    NextScreen { keep_maximized: bool },
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        match action {
            Action::MoveTo(p) => Command::Move(p.name().to_string()),
            Action::Maximize => Command::Maximize,
            Action::NextScreen { keep_maximized } => Command::NextScreen { keep_maximized },
        }
    }
}

/// The focused window, as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    /// Host-specific handle (e.g. a Hyprland window address).
    pub address: String,
    pub title: String,
    /// Current frame, in global space.
    pub frame: Frame,
    /// Identifier of the screen the window is on.
    pub screen: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Key, Modifier};

    #[test]
    fn action_display() {
        assert_eq!(Action::MoveTo(Partition::TopLeft).to_string(), "move to topLeft");
        assert_eq!(Action::Maximize.to_string(), "maximize");
        assert_eq!(
            Action::NextScreen { keep_maximized: true }.to_string(),
            "next screen (keep maximized)"
        );
    }

    #[test]
    fn parse_wire_commands() {
        let cmd: Command = serde_json::from_str(r#"{"Chord":"ctrl+alt+left"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Chord(Chord::new(&[Modifier::Control, Modifier::Alt], Key::Left))
        );

        let cmd: Command = serde_json::from_str(r#"{"Move":"leftThird"}"#).unwrap();
        assert_eq!(cmd, Command::Move("leftThird".into()));

        let cmd: Command = serde_json::from_str(r#""Maximize""#).unwrap();
        assert_eq!(cmd, Command::Maximize);

        let cmd: Command =
            serde_json::from_str(r#"{"NextScreen":{"keep_maximized":true}}"#).unwrap();
        assert_eq!(cmd, Command::NextScreen { keep_maximized: true });
    }

    #[test]
    fn unknown_partition_name_still_parses() {
        // Resolution happens later, so the user can be told what was wrong.
        let cmd: Command = serde_json::from_str(r#"{"Move":"nowhere"}"#).unwrap();
        assert_eq!(cmd, Command::Move("nowhere".into()));
    }

    #[test]
    fn bad_chord_is_rejected_on_the_wire() {
        assert!(serde_json::from_str::<Command>(r#"{"Chord":"ctrl+hyper+left"}"#).is_err());
    }

    #[test]
    fn command_from_action() {
        assert_eq!(
            Command::from(Action::MoveTo(Partition::Right2Thirds)),
            Command::Move("right2Thirds".into())
        );
        assert_eq!(
            Command::from(Action::NextScreen { keep_maximized: false }),
            Command::NextScreen { keep_maximized: false }
        );
    }
}
