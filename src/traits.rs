//! Core traits that decouple tilebind from any specific desktop.
//!
//! The [`Tiler`](crate::tiler::Tiler) and
//! [`BindingRegistry`](crate::binding::BindingRegistry) are generic over
//! these; the Hyprland backend and the socket listener are the production
//! implementations, and the unit tests bring their own recorders.

use crate::binding::Chord;
use crate::command::{Command, WindowInfo};
use crate::feedback::Alert;
use crate::geometry::{CoordinateSpace, Frame, Point, Screen};
use std::sync::mpsc;

/// The window-management primitives tilebind needs from its host.
///
/// All geometry crossing this trait is in the *global* coordinate space.
/// Nothing returned here is cached: the tiler queries afresh on every
/// action because windows and screens change between key presses.
pub trait Host {
    /// The error type produced by this host.
    type Error: std::error::Error + Send + 'static;

    /// The focused window, or `None` if nothing has focus.
    fn focused_window(&self) -> Result<Option<WindowInfo>, Self::Error>;

    /// Every connected screen, in the host's stable enumeration order.
    fn screens(&self) -> Result<Vec<Screen>, Self::Error>;

    /// Move and resize `window` to `frame`.
    fn set_frame(&self, window: &WindowInfo, frame: Frame) -> Result<(), Self::Error>;

    /// Maximize `window` on `screen`.
    fn maximize(&self, window: &WindowInfo, screen: &Screen) -> Result<(), Self::Error>;

    /// Current pointer location.
    fn pointer_location(&self) -> Result<Point, Self::Error>;

    /// Show a transient text overlay.
    fn show_alert(&self, alert: &Alert) -> Result<(), Self::Error>;

    /// The coordinate space [`show_alert`](Self::show_alert) expects its
    /// origin in.
    fn overlay_space(&self) -> CoordinateSpace {
        CoordinateSpace::Global
    }
}

/// Registers key chords with the host's hotkey machinery.
///
/// A chord stays registered until its handle is passed back to
/// [`unregister`](Self::unregister).  Use a
/// [`BindingRegistry`](crate::binding::BindingRegistry) rather than calling
/// this directly.
pub trait KeyRegistrar {
    type Error: std::error::Error + Send + 'static;
    /// Proof of a live registration.
    type Handle;

    fn register(&mut self, chord: &Chord) -> Result<Self::Handle, Self::Error>;

    fn unregister(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;
}

/// Produces [`Command`]s for the dispatcher.
///
/// `run` is called on its own thread and blocks. It forwards each command it
/// decodes into `sink` once, and returns when its transport is exhausted or
/// the receiver has been dropped.
pub trait CommandSource: Send {
    type Error: std::error::Error + Send + 'static;

    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
