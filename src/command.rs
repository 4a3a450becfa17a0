use heapless::String;

use crate::PATH_MAX;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Dir { path: Option<String<PATH_MAX>> },
    FullDir { path: Option<String<PATH_MAX>> },
    Status { path: String<PATH_MAX> },
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Dir { .. } => "dir",
            Command::FullDir { .. } => "fulldir",
            Command::Status { .. } => "status",
        }
    }
}

pub fn parse_command(line: &[u8]) -> Option<Command> {
    let trimmed = trim_ascii_whitespace(line);
    let verb_end = trimmed
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(trimmed.len());
    let verb = &trimmed[..verb_end];
    let rest = trim_ascii_whitespace(&trimmed[verb_end..]);

    if verb.eq_ignore_ascii_case(b"dir") {
        Some(Command::Dir {
            path: parse_optional_path(rest)?,
        })
    } else if verb.eq_ignore_ascii_case(b"fulldir") {
        Some(Command::FullDir {
            path: parse_optional_path(rest)?,
        })
    } else if verb.eq_ignore_ascii_case(b"status") {
        Some(Command::Status {
            path: parse_optional_path(rest)??,
        })
    } else {
        None
    }
}

fn parse_optional_path(rest: &[u8]) -> Option<Option<String<PATH_MAX>>> {
    if rest.is_empty() {
        return Some(None);
    }
    let text = core::str::from_utf8(rest).ok()?;
    let path = String::try_from(text).ok()?;
    Some(Some(path))
}

pub(crate) fn trim_ascii_whitespace(line: &[u8]) -> &[u8] {
    let mut start = 0usize;
    let mut end = line.len();
    while start < end && line[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && line[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &line[start..end]
}
