use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{env_utils::ENV_LOG_JSON_PATH, session::FloppyError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Serialize)]
struct Event<'a> {
    ts_ms: u64,
    level: Level,
    msg: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_text: Option<&'static str>,
}

/// Console output of one floppyctl run. With `FLOPPYCTL_LOG_JSON_PATH` set,
/// every line is also appended as JSON, tagged with the device command in
/// flight and, for device errors, the decoded result code.
pub struct Logger {
    json_file: Option<File>,
    command: Option<String>,
}

impl Logger {
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(ENV_LOG_JSON_PATH).ok();
        Self::new(path.map(PathBuf::from))
    }

    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let json_file = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("failed to open log file {}", path.display()))?;
                Some(file)
            }
            None => None,
        };
        Ok(Self {
            json_file,
            command: None,
        })
    }

    /// Tags the following events with `command` (the line sent to the device).
    pub fn begin_command(&mut self, command: &str) {
        self.command = Some(command.to_string());
        self.record(Level::Info, "send", None);
    }

    pub fn output(&mut self, line: impl AsRef<str>) {
        println!("{}", line.as_ref());
        self.record(Level::Info, line.as_ref(), None);
    }

    pub fn notice(&mut self, message: impl AsRef<str>) {
        eprintln!("{}", message.as_ref());
        self.record(Level::Warn, message.as_ref(), None);
    }

    pub fn failure(&mut self, err: &anyhow::Error) {
        match err.downcast_ref::<FloppyError>() {
            Some(device) => {
                let message = device.to_string();
                eprintln!("{message}");
                self.record(Level::Error, &message, Some(device));
            }
            None => {
                let message = format!("error: {err:?}");
                eprintln!("{message}");
                self.record(Level::Error, &message, None);
            }
        }
    }

    fn record(&mut self, level: Level, msg: &str, device: Option<&FloppyError>) {
        let Some(file) = &mut self.json_file else {
            return;
        };

        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let event = Event {
            ts_ms,
            level,
            msg,
            command: self.command.as_deref(),
            code: device.map(|err| err.code.raw()),
            code_text: device.map(|err| err.code.describe()),
        };

        if let Ok(line) = serde_json::to_string(&event) {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floppy_console::ResultCode;
    use serde_json::Value;

    fn read_events(path: &std::path::Path) -> Result<Vec<Value>> {
        let text = fs::read_to_string(path)?;
        let events = text
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<Vec<Value>, _>>()?;
        Ok(events)
    }

    #[test]
    fn events_carry_the_command_in_flight() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("logs/floppyctl.jsonl");

        let mut logger = Logger::new(Some(path.clone()))?;
        logger.record(Level::Info, "before any command", None);
        logger.begin_command("dir 0:/games");
        logger.record(Level::Info, "DOOM     EXE  99", None);
        drop(logger);

        let events = read_events(&path)?;
        assert_eq!(events.len(), 3);
        assert!(events[0].get("command").is_none());
        assert_eq!(events[1]["msg"], "send");
        assert_eq!(events[1]["command"], "dir 0:/games");
        assert_eq!(events[2]["level"], "info");
        assert_eq!(events[2]["command"], "dir 0:/games");
        Ok(())
    }

    #[test]
    fn device_errors_record_decoded_result_code() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("floppyctl.jsonl");

        let mut logger = Logger::new(Some(path.clone()))?;
        logger.begin_command("status X.TXT");
        let err: anyhow::Error = FloppyError {
            code: ResultCode::NoFile,
            text: "File not found".into(),
        }
        .into();
        logger.failure(&err);
        logger.failure(&anyhow::anyhow!("serial port vanished"));
        drop(logger);

        let events = read_events(&path)?;
        let device = &events[1];
        assert_eq!(device["level"], "error");
        assert_eq!(device["command"], "status X.TXT");
        assert_eq!(device["code"], 4);
        assert_eq!(device["code_text"], "File not found");

        let host = &events[2];
        assert!(host.get("code").is_none());
        assert!(host["msg"].as_str().unwrap_or("").contains("serial port vanished"));
        Ok(())
    }

    #[test]
    fn without_path_nothing_is_written() -> Result<()> {
        let mut logger = Logger::new(None)?;
        logger.notice("ignored");
        assert!(logger.json_file.is_none());
        Ok(())
    }
}
