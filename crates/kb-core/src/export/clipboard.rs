//! Clipboard backends

use crate::error::ClipboardError;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A text clipboard; last writer wins
pub trait Clipboard {
    /// Replace the clipboard contents with `text`
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Backend name for logs and status lines
    fn name(&self) -> &str;
}

/// In-process clipboard
///
/// Clones share one buffer, so a caller can keep a handle and inspect what a
/// viewer wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    buffer: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written text, if any
    pub fn contents(&self) -> Option<String> {
        self.buffer.lock().ok().and_then(|b| b.clone())
    }

    pub fn clear(&self) {
        if let Ok(mut b) = self.buffer.lock() {
            *b = None;
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| ClipboardError::Unavailable("memory clipboard poisoned".to_string()))?;
        *buffer = Some(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// A command that reads clipboard text from stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ClipboardCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Parse a whitespace-separated command line, e.g. `"xclip -selection clipboard"`
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?.to_string();
        Some(Self {
            program,
            args: parts.map(str::to_string).collect(),
        })
    }

    /// Known platform commands in probe order
    pub fn candidates() -> Vec<Self> {
        vec![
            Self::new("pbcopy", &[]),
            Self::new("wl-copy", &[]),
            Self::new("xclip", &["-selection", "clipboard"]),
            Self::new("xsel", &["--clipboard", "--input"]),
            Self::new("clip", &[]),
        ]
    }

    /// Whether the program can be found on `PATH`
    pub fn is_available(&self) -> bool {
        let Some(paths) = std::env::var_os("PATH") else {
            return false;
        };
        std::env::split_paths(&paths).any(|dir| {
            let candidate = dir.join(&self.program);
            candidate.is_file() || candidate.with_extension("exe").is_file()
        })
    }

    fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Clipboard that pipes text into a platform command
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    command: ClipboardCommand,
}

impl CommandClipboard {
    pub fn new(command: ClipboardCommand) -> Self {
        Self { command }
    }

    /// First available platform command
    pub fn detect() -> Result<Self, ClipboardError> {
        ClipboardCommand::candidates()
            .into_iter()
            .find(ClipboardCommand::is_available)
            .map(Self::new)
            .ok_or_else(|| {
                ClipboardError::Unavailable(
                    "none of pbcopy, wl-copy, xclip, xsel or clip found on PATH".to_string(),
                )
            })
    }

    pub fn command(&self) -> &ClipboardCommand {
        &self.command
    }

    fn failure(&self, message: impl Into<String>) -> ClipboardError {
        ClipboardError::Command {
            command: self.command.display(),
            message: message.into(),
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        debug!(
            "Writing {} bytes to clipboard via {}",
            text.len(),
            self.command.program
        );

        // xclip, xsel and wl-copy fork a process that keeps serving the
        // selection; it must not hold any pipe we wait on.
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.failure(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.failure(format!("Failed to write to stdin: {}", e)));
            }
        }

        let status = child.wait().map_err(|e| self.failure(e.to_string()))?;
        if !status.success() {
            return Err(self.failure(format!("exited with {}", status)));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.command.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_clipboard_last_writer_wins() {
        let handle = MemoryClipboard::new();
        let mut clipboard = handle.clone();
        assert_eq!(handle.contents(), None);

        clipboard.write_text("first").unwrap();
        clipboard.write_text("second").unwrap();
        assert_eq!(handle.contents().as_deref(), Some("second"));

        handle.clear();
        assert_eq!(handle.contents(), None);
    }

    #[test]
    fn test_parse_command_line() {
        let cmd = ClipboardCommand::parse("xclip -selection clipboard").unwrap();
        assert_eq!(cmd, ClipboardCommand::new("xclip", &["-selection", "clipboard"]));
        assert_eq!(cmd.display(), "xclip -selection clipboard");
        assert!(ClipboardCommand::parse("   ").is_none());
    }

    #[test]
    fn test_candidate_order() {
        let names: Vec<_> = ClipboardCommand::candidates()
            .into_iter()
            .map(|c| c.program)
            .collect();
        assert_eq!(names, vec!["pbcopy", "wl-copy", "xclip", "xsel", "clip"]);
    }

    #[test]
    fn test_missing_program_fails() {
        let mut clipboard =
            CommandClipboard::new(ClipboardCommand::new("kbase-no-such-clipboard-tool", &[]));
        let err = clipboard.write_text("x").unwrap_err();
        assert!(matches!(err, ClipboardError::Command { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_pipes_into_command() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        let script = format!("cat > '{}'", target.display());
        let mut clipboard = CommandClipboard::new(ClipboardCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script],
        });
        clipboard.write_text("piped text").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "piped text");
    }

    #[cfg(unix)]
    #[test]
    fn test_forking_command_returns_promptly() {
        // Same shape as xclip: read stdin, leave a background child, exit.
        let mut clipboard = CommandClipboard::new(ClipboardCommand {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "cat >/dev/null; (sleep 5) & exit 0".to_string(),
            ],
        });
        let started = std::time::Instant::now();
        clipboard.write_text("text").unwrap();
        assert!(
            started.elapsed() < std::time::Duration::from_secs(3),
            "write_text blocked for {:?}",
            started.elapsed()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_reports_status() {
        let mut clipboard = CommandClipboard::new(ClipboardCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "cat >/dev/null; exit 3".to_string()],
        });
        let err = clipboard.write_text("text").unwrap_err();
        assert!(err.to_string().contains("exited with"), "{}", err);
    }

    #[cfg(unix)]
    #[test]
    fn test_closed_stdin_fails_promptly() {
        // Exits without reading; a large write hits a broken pipe.
        let mut clipboard = CommandClipboard::new(ClipboardCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "exec 0<&-; exit 0".to_string()],
        });
        let text = "x".repeat(1 << 20);
        let started = std::time::Instant::now();
        let _ = clipboard.write_text(&text);
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
    }
}
