//! `tilebind-fire`: hand one command to a running tilebind daemon.
//!
//! Host key bindings exec this with the chord that fired:
//!
//!     tilebind-fire ctrl+alt+left
//!
//! It also accepts direct requests, handy from scripts:
//!
//!     tilebind-fire move leftThird
//!     tilebind-fire maximize
//!     tilebind-fire next-screen [--keep-maximized]

use log::error;
use tilebind::binding::Chord;
use tilebind::command::Command;
use tilebind::ipc::{default_socket_path, send_command};

const USAGE: &str = "usage: tilebind-fire <chord> | move <partition> | maximize | next-screen [--keep-maximized]";

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args {
        [verb, name] if verb == "move" => Ok(Command::Move(name.clone())),
        [verb] if verb == "maximize" => Ok(Command::Maximize),
        [verb, rest @ ..] if verb == "next-screen" => match rest {
            [] => Ok(Command::NextScreen { keep_maximized: false }),
            [flag] if flag == "--keep-maximized" => Ok(Command::NextScreen { keep_maximized: true }),
            _ => Err(USAGE.to_string()),
        },
        [chord] => chord
            .parse::<Chord>()
            .map(Command::Chord)
            .map_err(|e| format!("{}\n{}", e, USAGE)),
        _ => Err(USAGE.to_string()),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = match parse_args(&args) {
        Ok(cmd) => cmd,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };

    let path = default_socket_path();
    if let Err(e) = send_command(&path, &cmd) {
        error!("could not reach tilebind at {}: {}", path.display(), e);
        std::process::exit(1);
    }
}
