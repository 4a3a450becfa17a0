use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub entries: Vec<ListingEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_bytes: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VolumeInfo {
    pub total_size: u64,
    pub free_size: u64,
    pub used_size: u64,
    pub volume_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub size: u64,
    pub modified: String,
    pub attributes: Vec<String>,
}

// Device listing columns: base from 0, extension from 9, value from 14.
// Parts longer than 8.3 are printed in full and push the value further right.
const BASE_COLUMN: usize = 9;
const VALUE_COLUMN: usize = 14;
const DIR_MARKER: &str = "<DIR>";

pub struct ListingParser {
    used_re: Regex,
    free_re: Regex,
}

impl ListingParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            used_re: Regex::new(r"^([0-9]+) bytes used, ([0-9]+) files\.$")?,
            free_re: Regex::new(r"^([0-9]+) bytes free\.?$")?,
        })
    }

    pub fn parse(&self, lines: &[String]) -> Result<Listing> {
        let mut listing = Listing::default();
        for line in lines {
            let line = line.trim_end();
            if line.is_empty() || line == "No files." {
                continue;
            }
            if let Some(caps) = self.used_re.captures(line) {
                listing.used_bytes = Some(parse_u64(&caps[1], line)?);
                listing.file_count = Some(parse_u64(&caps[2], line)?);
            } else if let Some(caps) = self.free_re.captures(line) {
                listing.free_bytes = Some(parse_u64(&caps[1], line)?);
            } else {
                listing.entries.push(parse_entry(line)?);
            }
        }
        Ok(listing)
    }
}

/// Splits one rendered entry line back into name and size.
///
/// A base of nine or more characters runs straight into the extension, so
/// such names come back without their dot. A name that reaches column 14
/// and ends in a digit cannot be told apart from the size and is rejected.
pub fn parse_entry(line: &str) -> Result<ListingEntry> {
    if !line.is_ascii() || line.len() <= VALUE_COLUMN {
        return Err(anyhow!("unrecognized listing line: {line}"));
    }

    let (columns, is_dir, size) = if let Some(columns) = line.strip_suffix(DIR_MARKER) {
        (columns, true, None)
    } else {
        let digits_start = line
            .rfind(|c: char| !c.is_ascii_digit())
            .map_or(0, |idx| idx + 1);
        if digits_start == line.len() {
            return Err(anyhow!("unrecognized listing line: {line}"));
        }
        if digits_start < VALUE_COLUMN {
            return Err(anyhow!("name overflows size column: {line}"));
        }
        let columns = &line[..digits_start];
        (columns, false, Some(parse_u64(&line[digits_start..], line)?))
    };
    if columns.len() < VALUE_COLUMN {
        return Err(anyhow!("unrecognized listing line: {line}"));
    }

    let name = if columns.as_bytes()[BASE_COLUMN - 1] == b' ' {
        let base = columns[..BASE_COLUMN].trim_end();
        let ext = columns[BASE_COLUMN..].trim_end();
        if ext.is_empty() {
            base.to_string()
        } else {
            format!("{base}.{ext}")
        }
    } else {
        columns.trim_end().to_string()
    };
    if name.is_empty() || name.starts_with(' ') {
        return Err(anyhow!("unrecognized listing line: {line}"));
    }

    Ok(ListingEntry { name, is_dir, size })
}

pub fn volume_info(listing: &Listing) -> Result<VolumeInfo> {
    match (listing.used_bytes, listing.free_bytes) {
        (Some(used), Some(free)) => Ok(VolumeInfo {
            total_size: used + free,
            free_size: free,
            used_size: used,
            volume_label: String::new(),
        }),
        _ => Err(anyhow!("failed to parse used/free bytes")),
    }
}

pub fn parse_status(lines: &[String]) -> Result<StatusReport> {
    let mut size = None;
    let mut modified = None;
    let mut attributes = None;
    for line in lines {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Size:") {
            size = Some(parse_u64(rest.trim(), line)?);
        } else if let Some(rest) = line.strip_prefix("Last modified:") {
            modified = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Attributes:") {
            attributes = Some(rest.split_whitespace().map(str::to_string).collect());
        }
    }
    Ok(StatusReport {
        size: size.ok_or_else(|| anyhow!("status response has no Size line"))?,
        modified: modified.ok_or_else(|| anyhow!("status response has no Last modified line"))?,
        attributes: attributes.unwrap_or_default(),
    })
}

fn parse_u64(raw: &str, line: &str) -> Result<u64> {
    raw.parse::<u64>()
        .with_context(|| format!("invalid number `{raw}` in line: {line}"))
}
