//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] becomes one JSON line stamped with `type`
//! and `timestamp`. The file is opened in append mode, so repeated
//! one-shot invocations pointed at the same transcript accumulate into
//! a single conversation log.

use majordomo_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Conversation transcript writer, one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<_>>`; every line is flushed as it is
/// written, and `Drop` flushes once more.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<std::fs::File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent
    /// directories as needed. An unwritable path is reported with a
    /// warning and yields `None`; the caller runs without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(error) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                error
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(error) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    error
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Location of the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record_for(event: ConversationEvent) -> serde_json::Value {
        let mut record = serde_json::Map::new();
        record.insert(
            "type".to_string(),
            serde_json::Value::String(event.event_type.to_string()),
        );
        record.insert(
            "timestamp".to_string(),
            serde_json::Value::String(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
        );
        match event.payload {
            // Object payloads merge into the line; the stamps above win
            // only when a payload field collides with them.
            serde_json::Value::Object(fields) => {
                for (key, value) in fields {
                    record.entry(key).or_insert(value);
                }
            }
            serde_json::Value::Null => {}
            other => {
                record.insert("data".to_string(), other);
            }
        }
        serde_json::Value::Object(record)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let record = Self::record_for(event);
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if serde_json::to_writer(&mut *writer, &record).is_ok() {
            let _ = writer.write_all(b"\n");
        }
        // A line either lands on disk now or not at all
        let _ = writer.flush();
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Read;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        let mut content = String::new();
        File::open(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
            .trim()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.conversation.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "turn_received",
            serde_json::json!({
                "session_id": "s-1",
                "query": "find me a stir-fry recipe"
            }),
        ));
        logger.log(ConversationEvent::new(
            "delegation",
            serde_json::json!({
                "session_id": "s-1",
                "specialist": "recipe"
            }),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert!(line.get("type").is_some());
            assert!(line.get("timestamp").is_some());
        }

        assert_eq!(lines[0]["type"], "turn_received");
        assert_eq!(lines[0]["session_id"], "s-1");
        assert_eq!(lines[0]["query"], "find me a stir-fry recipe");
        assert_eq!(lines[1]["type"], "delegation");
        assert_eq!(lines[1]["specialist"], "recipe");
    }

    #[test]
    fn test_jsonl_logger_appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.conversation.jsonl");

        let first = JsonlConversationLogger::new(&path).unwrap();
        first.log(ConversationEvent::new(
            "turn_received",
            serde_json::json!({ "session_id": "s-1", "query": "hello" }),
        ));
        drop(first);

        let second = JsonlConversationLogger::new(&path).unwrap();
        second.log(ConversationEvent::new(
            "reply",
            serde_json::json!({ "session_id": "s-1", "text": "Hello!" }),
        ));
        drop(second);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "turn_received");
        assert_eq!(lines[1]["type"], "reply");
    }

    #[test]
    fn test_jsonl_logger_handles_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test2.conversation.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "simple_event",
            serde_json::json!("just a string"),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "simple_event");
        assert_eq!(lines[0]["data"], "just a string");
    }

    #[test]
    fn test_jsonl_logger_returns_none_for_invalid_path() {
        // /dev/null is not a directory, so neither mkdir nor open can succeed
        let result = JsonlConversationLogger::new("/dev/null/file.jsonl");
        assert!(result.is_none());
    }
}
