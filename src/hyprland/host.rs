//! [`Host`] and [`KeyRegistrar`] implementations backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! avoiding any shell command invocation.

use crate::binding::{Chord, Key, Modifier};
use crate::command::WindowInfo;
use crate::feedback::Alert;
use crate::geometry::{Frame, Point, Screen};
use crate::traits::{Host, KeyRegistrar};
use log::debug;
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Hyprland-backed host.
///
/// All communication happens over Hyprland's IPC socket.  No connection is
/// held open; every query is a short-lived request, so nothing is cached
/// between actions.
pub struct HyprlandHost;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandHostError(String);

impl Default for HyprlandHost {
    fn default() -> Self {
        Self
    }
}

impl HyprlandHost {
    pub fn new() -> Self {
        Self
    }
}

//  IPC

/// One request/response exchange on Hyprland's command socket.
///
/// Data queries are prefixed `j/` and answer JSON; commands are prefixed
/// `/` and answer `ok` or an error message.
fn hyprctl(request: &str) -> Result<String, HyprlandHostError> {
    let runtime = std::env::var_os("XDG_RUNTIME_DIR")
        .ok_or_else(|| HyprlandHostError("XDG_RUNTIME_DIR not set".into()))?;
    let instance = std::env::var_os("HYPRLAND_INSTANCE_SIGNATURE")
        .ok_or_else(|| HyprlandHostError("not running under Hyprland".into()))?;
    let socket = PathBuf::from(runtime).join("hypr").join(instance).join(".socket.sock");

    let io = |what: &str, e: std::io::Error| HyprlandHostError(format!("{} {}: {}", what, socket.display(), e));
    let mut stream = UnixStream::connect(&socket).map_err(|e| io("connect", e))?;
    stream.write_all(request.as_bytes()).map_err(|e| io("write", e))?;
    let mut reply = String::new();
    stream.read_to_string(&mut reply).map_err(|e| io("read", e))?;
    Ok(reply)
}

fn ipc_json(query: &str) -> Result<String, HyprlandHostError> {
    hyprctl(&format!("j/{}", query))
}

/// Run a command and require an `ok` reply.
fn ipc_ok(command: &str) -> Result<(), HyprlandHostError> {
    debug!("hyprctl {}", command);
    let reply = hyprctl(&format!("/{}", command))?;
    match reply.trim() {
        "ok" => Ok(()),
        other => Err(HyprlandHostError(format!("{}: {}", command, other))),
    }
}

fn parse<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, HyprlandHostError> {
    serde_json::from_str(json).map_err(|e| HyprlandHostError(format!("parse: {}", e)))
}

//  Minimal serde structs for the JSON we care about

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Debug, Deserialize)]
struct MonitorJson {
    id: i64,
    name: String,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    #[serde(default = "unit_scale")]
    scale: f64,
    #[serde(default)]
    transform: u8,
    /// Space claimed by bars and panels: `[left, top, right, bottom]`.
    #[serde(default)]
    reserved: [f64; 4],
}

fn unit_scale() -> f64 {
    1.0
}

/// Subset of the JSON object returned by `j/activewindow`.
#[derive(Debug, Deserialize)]
struct ActiveWindowJson {
    address: String,
    #[serde(default)]
    title: String,
    at: [f64; 2],
    size: [f64; 2],
    monitor: i64,
}

/// The JSON object returned by `j/cursorpos`.
#[derive(Debug, Deserialize)]
struct CursorJson {
    x: f64,
    y: f64,
}

/// Layout-space screen for a monitor.
///
/// Hyprland reports physical pixels; windows are placed in logical units,
/// so the size is divided by the scale (and swapped for rotated outputs).
fn screen_from_monitor(m: &MonitorJson) -> Screen {
    let scale = if m.scale > 0.0 { m.scale } else { 1.0 };
    let (mut w, mut h) = (m.width as f64 / scale, m.height as f64 / scale);
    if m.transform % 2 == 1 {
        std::mem::swap(&mut w, &mut h);
    }
    let frame = Frame::new(m.x as f64, m.y as f64, w, h);
    let [left, top, right, bottom] = m.reserved;
    let visible = Frame::new(
        frame.x + left,
        frame.y + top,
        frame.width - left - right,
        frame.height - top - bottom,
    );
    Screen::new(m.name.clone(), frame, visible)
}

fn monitors_from_json(json: &str) -> Result<Vec<MonitorJson>, HyprlandHostError> {
    parse(json)
}

/// Parse `j/activewindow`; Hyprland answers `{}` when nothing has focus.
fn window_from_json(
    json: &str,
    monitors: &[MonitorJson],
) -> Result<Option<WindowInfo>, HyprlandHostError> {
    if json.trim() == "{}" || json.trim().is_empty() {
        return Ok(None);
    }
    let w: ActiveWindowJson = parse(json)?;
    let screen = monitors
        .iter()
        .find(|m| m.id == w.monitor)
        .map(|m| m.name.clone())
        .ok_or_else(|| HyprlandHostError(format!("unknown monitor id: {}", w.monitor)))?;
    Ok(Some(WindowInfo {
        address: w.address,
        title: w.title,
        frame: Frame::new(w.at[0], w.at[1], w.size[0], w.size[1]),
        screen,
    }))
}

//  Host implementation

impl Host for HyprlandHost {
    type Error = HyprlandHostError;

    fn focused_window(&self) -> Result<Option<WindowInfo>, Self::Error> {
        let window = ipc_json("activewindow")?;
        let monitors = monitors_from_json(&ipc_json("monitors")?)?;
        window_from_json(&window, &monitors)
    }

    fn screens(&self) -> Result<Vec<Screen>, Self::Error> {
        let monitors = monitors_from_json(&ipc_json("monitors")?)?;
        Ok(monitors.iter().map(screen_from_monitor).collect())
    }

    fn set_frame(&self, window: &WindowInfo, frame: Frame) -> Result<(), Self::Error> {
        for command in frame_commands(window, frame) {
            ipc_ok(&command)?;
        }
        Ok(())
    }

    fn maximize(&self, window: &WindowInfo, screen: &Screen) -> Result<(), Self::Error> {
        // `fullscreen 1` toggles, which would un-maximize on a second press.
        self.set_frame(window, screen.visible_frame)
    }

    fn pointer_location(&self) -> Result<Point, Self::Error> {
        let c: CursorJson = parse(&ipc_json("cursorpos")?)?;
        Ok(Point::new(c.x, c.y))
    }

    fn show_alert(&self, alert: &Alert) -> Result<(), Self::Error> {
        // Hyprland places notifications itself; the origin is advisory.
        ipc_ok(&notify_command(alert))
    }
}

/// Dispatches that place `window` at `frame`, in order. Tiled windows
/// ignore explicit geometry, so the window is floated first.
fn frame_commands(window: &WindowInfo, frame: Frame) -> [String; 3] {
    let target = format!("address:{}", window.address);
    let px = |v: f64| v.round() as i64;
    [
        format!("dispatch setfloating {}", target),
        format!(
            "dispatch resizewindowpixel exact {} {},{}",
            px(frame.width),
            px(frame.height),
            target
        ),
        format!(
            "dispatch movewindowpixel exact {} {},{}",
            px(frame.x),
            px(frame.y),
            target
        ),
    ]
}

fn notify_command(alert: &Alert) -> String {
    // icon -1 (none), colour 0 (theme default)
    format!(
        "notify -1 {} 0 {}",
        alert.duration.as_millis(),
        alert.text.replace('\n', " ")
    )
}

//  Key registration

/// Registers chords as Hyprland `exec` binds that run `fire_command`.
pub struct HyprlandKeys {
    fire_command: String,
}

/// A live Hyprland bind, identified the way `keyword unbind` expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyprlandBind {
    mods: String,
    key: String,
}

impl HyprlandKeys {
    /// `fire_command` is run with the chord's text form as its argument.
    pub fn new(fire_command: impl Into<String>) -> Self {
        Self {
            fire_command: fire_command.into(),
        }
    }
}

fn hypr_mods(chord: &Chord) -> String {
    chord
        .modifiers
        .iter()
        .map(|m| match m {
            Modifier::Control => "CTRL",
            Modifier::Alt => "ALT",
            Modifier::Command => "SUPER",
            Modifier::Shift => "SHIFT",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn hypr_key(key: Key) -> String {
    match key {
        Key::Left => "left".into(),
        Key::Right => "right".into(),
        Key::Up => "up".into(),
        Key::Down => "down".into(),
        Key::Return => "Return".into(),
        Key::Letter(c) => c.to_ascii_lowercase().to_string(),
        Key::Keypad(d) => format!("KP_{}", d),
        Key::KeypadEnter => "KP_Enter".into(),
    }
}

fn bind_command(bind: &HyprlandBind, fire_command: &str, chord: &Chord) -> String {
    format!(
        "keyword bind {},{},exec,{} {}",
        bind.mods, bind.key, fire_command, chord
    )
}

fn unbind_command(bind: &HyprlandBind) -> String {
    format!("keyword unbind {},{}", bind.mods, bind.key)
}

/// Replace whatever is bound to the key with our `exec` bind.
///
/// Hyprland runs every bind on a key, so binds left behind by a daemon that
/// was killed would otherwise fire alongside the new one.
fn install<F>(bind: &HyprlandBind, fire_command: &str, chord: &Chord, mut send: F) -> Result<(), HyprlandHostError>
where
    F: FnMut(&str) -> Result<(), HyprlandHostError>,
{
    if let Err(e) = send(&unbind_command(bind)) {
        debug!("nothing to clear for {}: {}", chord, e);
    }
    send(&bind_command(bind, fire_command, chord))
}

impl KeyRegistrar for HyprlandKeys {
    type Error = HyprlandHostError;
    type Handle = HyprlandBind;

    fn register(&mut self, chord: &Chord) -> Result<HyprlandBind, Self::Error> {
        let bind = HyprlandBind {
            mods: hypr_mods(chord),
            key: hypr_key(chord.key),
        };
        install(&bind, &self.fire_command, chord, ipc_ok)?;
        Ok(bind)
    }

    fn unregister(&mut self, bind: HyprlandBind) -> Result<(), Self::Error> {
        ipc_ok(&unbind_command(&bind))
    }
}
