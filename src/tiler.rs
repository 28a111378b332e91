//! The dispatcher that ties bindings, geometry and the host together.
//!
//! [`Tiler`] reacts to [`Command`]s: it resolves chords through the
//! [`BindingTable`], queries the [`Host`] for fresh window and screen
//! state, computes the new frame with the partition engine or the
//! migration planner, commits it, and reports back through the host's
//! alert overlay.

use crate::binding::{BindingTable, Chord};
use crate::command::{Action, Command, WindowInfo};
use crate::config::Config;
use crate::feedback::{direction_label, partition_label, partition_text, Alert};
use crate::geometry::{screen_at_point, screen_for_frame, Frame, Screen};
use crate::migration::{self, Migration, MigrationError};
use crate::partition::{Partition, PartitionError};
use crate::traits::Host;
use log::{debug, info, warn};
use std::time::Duration;

/// Possible errors from the tiler.
///
/// None of these are fatal; [`Tiler::dispatch`] turns every one of them
/// into an alert.
#[derive(Debug, thiserror::Error)]
pub enum TilerError {
    #[error("nothing to move")]
    NoFocusedWindow,
    #[error("no other screens")]
    NoOtherScreens,
    #[error(transparent)]
    UnknownPartition(#[from] PartitionError),
    #[error("nothing bound to {0}")]
    Unbound(Chord),
    #[error("window is on unknown screen {0:?}")]
    UnknownScreen(String),
    /// The host returned an error.
    #[error("host error: {0}")]
    Host(String),
}

impl From<MigrationError> for TilerError {
    fn from(e: MigrationError) -> Self {
        match e {
            MigrationError::NoOtherScreens => TilerError::NoOtherScreens,
        }
    }
}

fn host_err(e: impl std::fmt::Display) -> TilerError {
    TilerError::Host(e.to_string())
}

/// What a successful action did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Moved { partition: Partition, frame: Frame },
    Maximized { frame: Frame },
    Migrated(Migration),
}

/// Resolves and applies actions against a [`Host`].
///
/// The tiler holds no window or screen state between actions; only the
/// immutable binding table and the alert duration.
///
/// # Typical usage
///
/// ```ignore
/// let table = BindingTable::build(Keymap::Classic)?;
/// let tiler = Tiler::new(HyprlandHost::new(), table, &Config::default());
/// tiler.dispatch(Command::Move("leftThird".into()));
/// ```
pub struct Tiler<H: Host> {
    host: H,
    bindings: BindingTable,
    alert_duration: Duration,
}

impl<H: Host> Tiler<H> {
    pub fn new(host: H, bindings: BindingTable, config: &Config) -> Self {
        Self {
            host,
            bindings,
            alert_duration: config.alert_duration(),
        }
    }

    /// Shared reference to the underlying host.
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Handle `cmd`, reporting failures to the user instead of returning
    /// them.
    ///
    /// This is the entry point for the event loop: whatever goes wrong, the
    /// user sees an alert and the loop keeps running.
    pub fn dispatch(&self, cmd: Command) -> Option<Outcome> {
        match self.handle(cmd) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("{}", e);
                self.report_failure(&e);
                None
            }
        }
    }

    /// Process a single [`Command`].
    pub fn handle(&self, cmd: Command) -> Result<Outcome, TilerError> {
        match cmd {
            Command::Chord(chord) => {
                let action = self
                    .bindings
                    .action_for(&chord)
                    .ok_or_else(|| TilerError::Unbound(chord.clone()))?;
                debug!("{} -> {}", chord, action);
                self.apply(action)
            }
            Command::Move(name) => {
                let partition: Partition = name.parse()?;
                self.apply(Action::MoveTo(partition))
            }
            Command::Maximize => self.apply(Action::Maximize),
            Command::NextScreen { keep_maximized } => {
                self.apply(Action::NextScreen { keep_maximized })
            }
        }
    }

    /// Run one action: query, compute, commit, report.
    pub fn apply(&self, action: Action) -> Result<Outcome, TilerError> {
        info!("{}", action);
        let (window, screens, screen) = self.focused()?;

        match action {
            Action::MoveTo(partition) => {
                let frame = partition.resolve(&screen.visible_frame);
                debug!(
                    "{} of {} {:?} -> {:?}",
                    partition, screen.id, screen.visible_frame, frame
                );
                self.host.set_frame(&window, frame).map_err(host_err)?;
                self.alert(partition_text(partition), &screen, &screens);
                Ok(Outcome::Moved { partition, frame })
            }

            Action::Maximize => {
                self.host.maximize(&window, &screen).map_err(host_err)?;
                self.alert("Maximized", &screen, &screens);
                Ok(Outcome::Maximized {
                    frame: screen.visible_frame,
                })
            }

            Action::NextScreen { keep_maximized } => {
                let m = migration::plan(&window.frame, &screen, &screens, keep_maximized)?;
                let label = direction_label(m.frame.x - window.frame.x, m.frame.y - window.frame.y);
                info!(
                    "  {} -> {} ({}): {:?}",
                    screen.id, m.destination.id, label, m.frame
                );
                self.host.set_frame(&window, m.frame).map_err(host_err)?;
                self.alert(
                    format!("Moved {} to {}", label, m.destination.id),
                    &screen,
                    &screens,
                );
                self.alert(
                    format!("Arrived from {} ({})", screen.id, label),
                    &m.destination,
                    &screens,
                );
                Ok(Outcome::Migrated(m))
            }
        }
    }

    /// Fresh focused window, all screens, and the window's screen.
    fn focused(&self) -> Result<(WindowInfo, Vec<Screen>, Screen), TilerError> {
        let window = self
            .host
            .focused_window()
            .map_err(host_err)?
            .ok_or(TilerError::NoFocusedWindow)?;
        let screens = self.host.screens().map_err(host_err)?;
        let screen = screens
            .iter()
            .find(|s| s.id == window.screen)
            .or_else(|| {
                debug!("screen {:?} not enumerated, matching by overlap", window.screen);
                screen_for_frame(&screens, &window.frame)
            })
            .cloned()
            .ok_or_else(|| TilerError::UnknownScreen(window.screen.clone()))?;
        Ok((window, screens, screen))
    }

    fn alert(&self, text: impl Into<String>, screen: &Screen, screens: &[Screen]) {
        let alert = Alert::on_screen(
            text,
            screen,
            screens,
            self.host.overlay_space(),
            self.alert_duration,
        );
        if let Err(e) = self.host.show_alert(&alert) {
            warn!("could not show alert {:?}: {}", alert.text, e);
        }
    }

    /// Show `err` on the screen under the pointer.
    fn report_failure(&self, err: &TilerError) {
        let text = match err {
            TilerError::UnknownPartition(PartitionError(name)) => {
                format!("Unknown partition: {}", partition_label(name))
            }
            other => {
                let msg = other.to_string();
                let mut chars = msg.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => msg,
                }
            }
        };
        let screens = match self.host.screens() {
            Ok(s) => s,
            Err(e) => {
                warn!("cannot place failure alert: {}", e);
                return;
            }
        };
        let pointer = self.host.pointer_location().unwrap_or_default();
        if let Some(screen) = screen_at_point(&screens, pointer) {
            self.alert(text, screen, &screens);
        }
    }
}

//  Tests
