//! **tilebind**: keyboard-driven window tiling.
//!
//! A key chord snaps the focused window to a named partition of its screen
//! (a half, quarter, third, sixth, the centre, …), maximizes it, or moves it
//! to the next screen.  Everything is computed fresh from the host's window
//! and screen state on each key press; nothing is remembered in between.
//!
//! # Architecture
//!
//! The pure core:
//!
//! * [`partition`]: the partition catalog and frame calculator.
//! * [`migration`]: the screen-migration planner.
//! * [`feedback`]: compass and partition labels, alert placement.
//! * [`binding`]: key chords, the binding table and registry.
//!
//! The seams, in [`traits`]:
//!
//! * [`traits::Host`]: window and screen queries and mutations.
//! * [`traits::KeyRegistrar`]: installing key chords with the host.
//! * [`traits::CommandSource`]: the transport that delivers fired chords.
//!
//! [`tiler::Tiler`] ties them together.  Concrete implementations live in
//! [`hyprland`] (Hyprland IPC) and [`ipc`] (Unix-socket command listener).

pub mod binding;
pub mod command;
pub mod config;
pub mod feedback;
pub mod geometry;
pub mod hyprland;
pub mod ipc;
pub mod migration;
pub mod partition;
pub mod tiler;
pub mod traits;
