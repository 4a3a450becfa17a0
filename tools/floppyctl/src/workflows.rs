use std::io::{Read, Write};

use anyhow::{anyhow, Result};

use crate::{
    listing::{self, Listing, ListingParser, StatusReport, VolumeInfo},
    session::FloppySession,
};

pub fn build_command(verb: &str, path: Option<&str>) -> String {
    match path.map(str::trim).filter(|path| !path.is_empty()) {
        Some(path) => format!("{verb} {path}"),
        None => verb.to_string(),
    }
}

pub fn run_listing<S: Read + Write>(
    session: &mut FloppySession<S>,
    full: bool,
    path: Option<&str>,
) -> Result<Vec<String>> {
    let verb = if full { "fulldir" } else { "dir" };
    session.send_command(&build_command(verb, path))
}

pub fn run_ls<S: Read + Write>(
    session: &mut FloppySession<S>,
    full: bool,
    path: Option<&str>,
) -> Result<Listing> {
    let lines = run_listing(session, full, path)?;
    ListingParser::new()?.parse(&lines)
}

pub fn run_status<S: Read + Write>(
    session: &mut FloppySession<S>,
    path: &str,
) -> Result<StatusReport> {
    if path.trim().is_empty() {
        return Err(anyhow!("status needs a path"));
    }
    let lines = session.send_command(&build_command("status", Some(path)))?;
    listing::parse_status(&lines)
}

pub fn run_volume_info<S: Read + Write>(session: &mut FloppySession<S>) -> Result<VolumeInfo> {
    let listing = run_ls(session, true, None)?;
    listing::volume_info(&listing)
}

pub fn format_table(listing: &Listing) -> String {
    let mut out = String::new();
    for entry in &listing.entries {
        let size = match entry.size {
            Some(size) => size.to_string(),
            None => "<DIR>".to_string(),
        };
        out.push_str(&format!("{:<12}  {:>10}\n", entry.name, size));
    }
    if let (Some(used), Some(files)) = (listing.used_bytes, listing.file_count) {
        out.push_str(&format!("{files} files, {used} bytes used\n"));
    }
    if let Some(free) = listing.free_bytes {
        out.push_str(&format!("{free} bytes free\n"));
    }
    out
}
