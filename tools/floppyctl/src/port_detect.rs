use glob::glob;

const PATTERNS: &[&str] = &[
    "/dev/cu.usbserial*",
    "/dev/cu.usbmodem*",
    "/dev/cu.wchusbserial*",
    "/dev/tty.usbserial*",
    "/dev/tty.usbmodem*",
    "/dev/ttyUSB*",
    "/dev/ttyACM*",
];

fn collect_candidates() -> Vec<String> {
    let mut out = Vec::new();
    for pattern in PATTERNS {
        let Ok(entries) = glob(pattern) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.display().to_string();
            if !out.iter().any(|existing| existing == &path) {
                out.push(path);
            }
        }
    }
    out
}

pub fn pick_port(mut candidates: Vec<String>, hint: Option<&str>) -> Option<String> {
    if let Some(hint) = hint.filter(|hint| !hint.trim().is_empty()) {
        candidates.retain(|c| c.contains(hint));
    }

    let groups: [fn(&str) -> bool; 3] = [
        |c| c.starts_with("/dev/cu."),
        |c| c.starts_with("/dev/ttyUSB") || c.starts_with("/dev/ttyACM"),
        |c| c.starts_with("/dev/tty."),
    ];
    for matches in groups {
        let group: Vec<_> = candidates.iter().filter(|c| matches(c)).cloned().collect();
        if group.len() == 1 {
            return group.into_iter().next();
        }
    }

    if candidates.len() == 1 {
        return candidates.into_iter().next();
    }
    None
}

pub fn detect_port(hint: Option<&str>) -> Option<String> {
    pick_port(collect_candidates(), hint)
}

pub fn list_candidates() -> Vec<String> {
    collect_candidates()
}
