//! Logging of chat completion exchanges.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to
//! capture every exchange passing through the [`ChatClient`](crate::ChatClient),
//! and [`JsonLinesLogger`], which appends one JSON object per event to a file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{Error, Result};
use crate::types::{ChatCompletion, ChatCompletionParams};

/// A trait for logging chat client operations.
///
/// Implement this trait to capture the request sent for each turn and the
/// outcome that came back.
pub trait ClientLogger: Send + Sync {
    /// Log the request body just before it is sent.
    fn log_request(&self, params: &ChatCompletionParams);

    /// Log a successfully parsed completion.
    fn log_response(&self, completion: &ChatCompletion);

    /// Log a failed exchange.
    fn log_error(&self, error: &Error);
}

/// A [`ClientLogger`] that appends JSON lines to a file.
///
/// Write failures are ignored.
pub struct JsonLinesLogger {
    file: Mutex<File>,
}

impl JsonLinesLogger {
    /// Opens `path` for appending, creating it if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| {
                Error::io(format!("failed to open request log {}", path.display()), err)
            })?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn write_entry(&self, event: &str, body: Value) {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let entry = json!({
            "timestamp": timestamp,
            "event": event,
            "body": body,
        });
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{entry}");
        }
    }
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, params: &ChatCompletionParams) {
        self.write_entry("request", serde_json::to_value(params).unwrap_or(Value::Null));
    }

    fn log_response(&self, completion: &ChatCompletion) {
        self.write_entry(
            "response",
            serde_json::to_value(completion).unwrap_or(Value::Null),
        );
    }

    fn log_error(&self, error: &Error) {
        self.write_entry(
            "error",
            json!({
                "message": error.to_string(),
                "status_code": error.status_code(),
            }),
        );
    }
}
