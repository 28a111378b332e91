//! Entry point for the **tilebind** daemon.
//!
//! Loads the configuration, builds the binding table, installs the key
//! bindings with Hyprland, and then handles incoming commands one at a time
//! on the main thread until every command source has closed.

use log::{error, info};
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tilebind::binding::{BindingRegistry, BindingTable};
use tilebind::command::Command;
use tilebind::config::Config;
use tilebind::hyprland::host::{HyprlandHost, HyprlandKeys};
use tilebind::ipc::default_socket_path;
use tilebind::ipc::listener::UnixSocketListener;
use tilebind::tiler::Tiler;
use tilebind::traits::{CommandSource, Host};

/// Resolve the config directory (`$XDG_CONFIG_HOME/tilebind`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("tilebind")
}

/// Try to load the config from `$XDG_CONFIG_HOME/tilebind/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no usable config file ({}), using defaults", e);
            Config::default()
        }
    }
}

/// How often the dispatch loop checks for a termination signal.
const SIGNAL_POLL: Duration = Duration::from_millis(200);

//  Main

fn main() {
    env_logger::init();

    let config = load_config();
    let table = match BindingTable::build(config.keymap) {
        Ok(t) => t,
        Err(e) => {
            error!("invalid {:?} keymap: {}", config.keymap, e);
            std::process::exit(1);
        }
    };

    if std::env::args().any(|a| a == "--print-bindings") {
        print_bindings(&table);
        return;
    }

    run_daemon(config, table);
}

/// Normal daemon mode.
fn run_daemon(config: Config, table: BindingTable) {
    let host = HyprlandHost::new();
    match host.screens() {
        Ok(s) => info!("found {} screen(s)", s.len()),
        Err(e) => {
            error!("failed to query screens: {}", e);
            std::process::exit(1);
        }
    }

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    let stop = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        if let Err(e) = signal_hook::flag::register(signal, Arc::clone(&stop)) {
            error!("cannot watch signal {}: {}", signal, e);
        }
    }

    let mut registry = BindingRegistry::new(HyprlandKeys::new(config.fire_command.clone()), &table);
    if let Err(e) = registry.start() {
        error!("failed to install key bindings: {}", e);
        std::process::exit(1);
    }

    let tiler = Tiler::new(host, table, &config);
    info!("tilebind running ({:?} keymap)", config.keymap);
    while !stop.load(Ordering::Relaxed) {
        match cmd_rx.recv_timeout(SIGNAL_POLL) {
            Ok(cmd) => {
                tiler.dispatch(cmd);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                info!("all command sources closed");
                break;
            }
        }
    }
    info!("removing key bindings and exiting");
    registry.stop();
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}

fn print_bindings(table: &BindingTable) {
    for (action, chords) in table.bindings() {
        let chords: Vec<String> = chords.iter().map(|c| c.to_string()).collect();
        println!("{:<32} {}", action.to_string(), chords.join(", "));
    }
}
