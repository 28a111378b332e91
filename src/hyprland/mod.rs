//! Hyprland-specific implementations.
//!
//! This module provides concrete backends for the
//! [`Host`](crate::traits::Host) and
//! [`KeyRegistrar`](crate::traits::KeyRegistrar) traits, powered by
//! Hyprland's IPC command socket.
//!
//! Nothing outside this module should reference Hyprland directly.

pub mod host;
