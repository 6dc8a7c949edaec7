//! JSONL audit hook.
//!
//! Appends one JSON line per invocation to an audit file. Register it in
//! the POST phase so it records the final outcome, after any result
//! rewrites by higher-priority hooks.

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use toolgate_domain::hook::traits::{HookDecision, HookError, ToolHook};
use toolgate_domain::tool::value_objects::{ArgumentMap, InvocationOutcome};
use tracing::warn;

/// Audit hook that appends invocation records to a JSONL file.
pub struct JsonlAuditHook {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditHook {
    /// Open the audit file in append mode, creating parent directories
    /// as needed.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &serde_json::Value) {
        // Audit writes must never fail the invocation they describe.
        if let Ok(mut writer) = self.writer.lock() {
            if let Err(error) = writeln!(writer, "{record}") {
                warn!("Failed to append audit record: {}", error);
                return;
            }
            if let Err(error) = writer.flush() {
                warn!("Failed to flush audit log: {}", error);
            }
        }
    }
}

impl ToolHook for JsonlAuditHook {
    fn after_invoke(
        &self,
        tool: &str,
        arguments: &ArgumentMap,
        outcome: &InvocationOutcome,
    ) -> Result<HookDecision, HookError> {
        let mut record = json!({
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "tool": tool,
            "argumentCount": arguments.len(),
            "success": outcome.is_success(),
        });
        if let Some(error) = outcome.error() {
            record["error"] = json!(error.to_string());
        }
        self.append(&record);
        Ok(HookDecision::Allow)
    }
}

impl Drop for JsonlAuditHook {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
