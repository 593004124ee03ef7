//! Plain-text transcripts.
//!
//! Each message becomes one paragraph, `ROLE: content`, followed by a blank
//! line.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::observability::{TRANSCRIPT_WRITE_ERRORS, TRANSCRIPT_WRITES};
use crate::types::Message;

/// Renders messages in transcript format.
pub fn render_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(&message.role.as_str().to_uppercase());
        out.push_str(": ");
        out.push_str(&message.content);
        out.push_str("\n\n");
    }
    out
}

/// Writes messages to `path`, replacing any existing file.
///
/// Missing parent directories are created.
pub fn write_transcript<P: AsRef<Path>>(path: P, messages: &[Message]) -> Result<()> {
    let result = write_transcript_inner(path.as_ref(), messages);
    match result {
        Ok(()) => TRANSCRIPT_WRITES.click(),
        Err(_) => TRANSCRIPT_WRITE_ERRORS.click(),
    }
    result
}

fn write_transcript_inner(path: &Path, messages: &[Message]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            Error::io(
                format!("failed to create directory {}", parent.display()),
                err,
            )
        })?;
    }
    let file = File::create(path).map_err(|err| {
        Error::io(
            format!("failed to create transcript file {}", path.display()),
            err,
        )
    })?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render_transcript(messages).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|err| {
            Error::io(
                format!("failed to write transcript file {}", path.display()),
                err,
            )
        })
}
