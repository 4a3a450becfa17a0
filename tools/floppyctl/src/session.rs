use std::{
    fmt,
    io::{self, Read, Write},
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use floppy_console::ResultCode;
use regex::Regex;
use serialport::SerialPort;

const RX_BUF_MAX: usize = 16 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloppyError {
    pub code: ResultCode,
    pub text: String,
}

impl fmt::Display for FloppyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device error #{}: {}", self.code.raw(), self.text)
    }
}

impl std::error::Error for FloppyError {}

pub struct FloppySession<S> {
    stream: S,
    rx_buf: Vec<u8>,
    timeout: Duration,
    prompt_re: Regex,
    error_re: Regex,
}

impl FloppySession<Box<dyn SerialPort>> {
    pub fn open(port: &str, baud: u32, timeout: Duration) -> Result<Self> {
        let mut serial = serialport::new(port, baud)
            .timeout(Duration::from_millis(50))
            .open()
            .with_context(|| format!("failed to open serial port {port} @ {baud}"))?;

        // Keep lines low so attaching does not reset the board.
        let _ = serial.write_data_terminal_ready(false);
        let _ = serial.write_request_to_send(false);

        Self::new(serial, timeout)
    }
}

impl<S: Read + Write> FloppySession<S> {
    pub fn new(stream: S, timeout: Duration) -> Result<Self> {
        Ok(Self {
            stream,
            rx_buf: Vec::with_capacity(1024),
            timeout,
            prompt_re: Regex::new(r"^[AB]:>")?,
            error_re: Regex::new(r"^Error #([0-9]+): (.*)$")?,
        })
    }

    /// Sends `command` and returns the response lines. A device error line
    /// fails the call with a [`FloppyError`] once the response is complete.
    pub fn send_command(&mut self, command: &str) -> Result<Vec<String>> {
        let mut payload = command.trim_end_matches(['\r', '\n']).to_string();
        payload.push('\n');
        self.stream
            .write_all(payload.as_bytes())
            .with_context(|| format!("failed to write command: {command}"))?;
        self.stream.flush()?;

        let deadline = Instant::now() + self.timeout;
        let mut got_prompt = false;
        let mut error: Option<FloppyError> = None;
        let mut output = Vec::new();

        loop {
            let Some(line) = self.next_line(deadline)? else {
                return Err(anyhow!(
                    "timed out after {:?} waiting for response to `{}`",
                    self.timeout,
                    command.trim()
                ));
            };

            if self.prompt_re.is_match(&line) {
                got_prompt = true;
            } else if !got_prompt {
                continue;
            } else if line.is_empty() {
                break;
            } else if let Some(caps) = self.error_re.captures(&line) {
                if error.is_none() {
                    let raw = caps[1].parse::<u8>().unwrap_or(u8::MAX);
                    error = Some(FloppyError {
                        code: ResultCode::from_raw(raw),
                        text: caps[2].to_string(),
                    });
                }
            } else {
                output.push(line);
            }
        }

        match error {
            Some(err) => Err(err.into()),
            None => Ok(output),
        }
    }

    fn next_line(&mut self, deadline: Instant) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self.rx_buf.iter().position(|b| *b == b'\n') {
                let raw = self.rx_buf.drain(..=pos).collect::<Vec<u8>>();
                let line = String::from_utf8_lossy(&raw).trim_end().to_string();
                return Ok(Some(line));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            self.poll_once()?;
        }
    }

    fn poll_once(&mut self) -> Result<()> {
        let mut chunk = [0u8; 1024];
        match self.stream.read(&mut chunk) {
            Ok(n) => {
                self.rx_buf.extend_from_slice(&chunk[..n]);
                if self.rx_buf.len() > RX_BUF_MAX {
                    let excess = self.rx_buf.len() - RX_BUF_MAX;
                    self.rx_buf.drain(..excess);
                }
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::TimedOut => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(()),
            Err(err) => Err(err).context("failed reading serial stream"),
        }
    }

    #[cfg(test)]
    pub fn stream(&self) -> &S {
        &self.stream
    }
}
