//! The post page's "copy link" control and the clipboards it writes to.

use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

pub const COPY_LABEL: &str = "Copy link";
pub const COPIED_LABEL: &str = "Copied";

/// How long the control reads [`COPIED_LABEL`] after a successful copy.
pub const COPIED_FEEDBACK: Duration = Duration::from_millis(1200);

/// Somewhere a link can be copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardDenied>;
}

/// The clipboard refused the write, or there is no clipboard to write to.
#[derive(Debug)]
pub struct ClipboardDenied(pub String);

impl fmt::Display for ClipboardDenied {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "clipboard unavailable: {}", self.0)
    }
}

impl std::error::Error for ClipboardDenied {}

/// Copies by piping text into an external program such as `wl-copy`,
/// `xclip -selection clipboard`, or `pbcopy`.
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: String, args: Vec<String>) -> CommandClipboard {
        CommandClipboard { program, args }
    }

    /// Picks the first clipboard program found on `PATH`.
    pub fn detect() -> Option<CommandClipboard> {
        const CANDIDATES: &[(&str, &str)] = &[
            ("wl-copy", ""),
            ("xclip", "-selection clipboard"),
            ("pbcopy", ""),
            ("clip.exe", ""),
        ];
        CANDIDATES
            .iter()
            .find(|(program, _)| which::which(program).is_ok())
            .map(|(program, args)| {
                CommandClipboard::new(
                    program.to_string(),
                    args.split_whitespace().map(str::to_owned).collect(),
                )
            })
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardDenied> {
        let deny = |e: std::io::Error| ClipboardDenied(format!("`{}`: {}", self.program, e));
        let path = which::which(&self.program)
            .map_err(|e| ClipboardDenied(format!("`{}`: {}", self.program, e)))?;
        let mut child = Command::new(path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(deny)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(deny)?;
        }
        let status = child.wait().map_err(deny)?;
        match status.success() {
            true => Ok(()),
            false => Err(ClipboardDenied(format!("`{}` exited with {}", self.program, status))),
        }
    }
}

/// A clipboard that always refuses, for hosts without one.
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardDenied> {
        Err(ClipboardDenied(String::from("no clipboard configured")))
    }
}

/// The "copy link" control. A successful copy switches the label to
/// [`COPIED_LABEL`] until [`COPIED_FEEDBACK`] has elapsed; a failed copy
/// changes nothing.
#[derive(Clone, Debug, Default)]
pub struct CopyLink {
    revert_at: Option<Instant>,
}

impl CopyLink {
    /// Copies `url` and returns whether the copy succeeded. Clipboard errors
    /// are logged and otherwise swallowed.
    pub fn click<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C, url: &str, now: Instant) -> bool {
        match clipboard.write_text(url) {
            Ok(()) => {
                self.revert_at = Some(now + COPIED_FEEDBACK);
                true
            }
            Err(err) => {
                log::debug!("copy link: {}", err);
                false
            }
        }
    }

    /// The control's label at `now`.
    pub fn label(&self, now: Instant) -> &'static str {
        match self.revert_at {
            Some(revert_at) if now < revert_at => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Records what was copied.
    #[derive(Default)]
    pub struct MemoryClipboard {
        pub contents: Option<String>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardDenied> {
            self.contents = Some(text.to_owned());
            Ok(())
        }
    }
}
