//! Open a file with the platform's default viewer.

use std::path::Path;
use std::process::{Child, Command};

use tracing::{debug, info};

use crate::error::ConsoleError;

/// Program and leading arguments used to open a file on `os`
/// (one of the values of [`std::env::consts::OS`]).
pub fn opener_for(os: &str) -> (&'static str, &'static [&'static str]) {
    // `start` is a cmd builtin; the empty string is the window title
    const WINDOWS_ARGS: &[&str] = &["/C", "start", ""];
    const NO_ARGS: &[&str] = &[];

    match os {
        "windows" => ("cmd", WINDOWS_ARGS),
        "macos" => ("open", NO_ARGS),
        _ => ("xdg-open", NO_ARGS),
    }
}

pub fn opener_command(path: &Path) -> Command {
    let (program, args) = opener_for(std::env::consts::OS);
    let mut command = Command::new(program);
    command.args(args).arg(path);
    command
}

/// Spawn the platform viewer for `path` without waiting for it.
pub fn open_multi_platform(path: &Path) -> Result<Child, ConsoleError> {
    info!("Opening `{}` ...", path.display());
    let mut command = opener_command(path);
    debug!("spawning {:?}", command);

    command
        .spawn()
        .map_err(|source| ConsoleError::OpenerUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_for_platforms() {
        assert_eq!(opener_for("windows"), ("cmd", &["/C", "start", ""][..]));
        assert_eq!(opener_for("macos"), ("open", &[][..]));
        assert_eq!(opener_for("linux"), ("xdg-open", &[][..]));
        assert_eq!(opener_for("freebsd"), ("xdg-open", &[][..]));
    }

    #[test]
    fn test_opener_command_passes_path_last() {
        let command = opener_command(Path::new("/tmp/report.html"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().copied(), Some(std::ffi::OsStr::new("/tmp/report.html")));
    }
}
