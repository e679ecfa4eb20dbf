//! `server.properties` parsing
//!
//! MSK stores configuration revisions as the raw text of a Kafka
//! `server.properties` file. This handles the subset MSK accepts: one
//! `key=value` (or `key: value`) pair per line, `#` and `!` comments, blank
//! lines, and trailing-backslash line continuations.

use std::collections::BTreeMap;

/// Parse properties text into an ordered map. Later keys override earlier ones.
pub fn parse_server_properties(raw: &[u8]) -> BTreeMap<String, String> {
    let text = String::from_utf8_lossy(raw);
    let mut properties = BTreeMap::new();
    let mut pending = String::new();

    for line in text.lines() {
        let trimmed = line.trim_start();

        if pending.is_empty() && (trimmed.is_empty() || is_comment(trimmed)) {
            continue;
        }

        if let Some(continued) = trimmed.strip_suffix('\\') {
            pending.push_str(continued);
            continue;
        }

        pending.push_str(trimmed);
        let entry = std::mem::take(&mut pending);
        if let Some((key, value)) = split_entry(&entry) {
            properties.insert(key, value);
        }
    }

    // Dangling continuation on the last line
    if let Some((key, value)) = split_entry(&pending) {
        properties.insert(key, value);
    }

    properties
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('!')
}

fn split_entry(entry: &str) -> Option<(String, String)> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }

    match entry.find(['=', ':']) {
        Some(idx) => Some((
            entry[..idx].trim().to_string(),
            entry[idx + 1..].trim().to_string(),
        )),
        None => Some((entry.to_string(), String::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_typical_msk_revision() {
        let raw = b"auto.create.topics.enable=true\n\
                    default.replication.factor=3\n\
                    # comment\n\
                    \n\
                    num.partitions = 6\n\
                    log.retention.hours: 168\n";

        let props = parse_server_properties(raw);
        assert_eq!(props.len(), 4);
        assert_eq!(props["auto.create.topics.enable"], "true");
        assert_eq!(props["default.replication.factor"], "3");
        assert_eq!(props["num.partitions"], "6");
        assert_eq!(props["log.retention.hours"], "168");
    }

    #[test]
    fn test_comments_and_crlf() {
        let raw = b"! legacy comment\r\n# another\r\nmin.insync.replicas=2\r\n";
        let props = parse_server_properties(raw);
        assert_eq!(props.len(), 1);
        assert_eq!(props["min.insync.replicas"], "2");
    }

    #[test]
    fn test_line_continuation() {
        let raw = b"listener.security.protocol.map=CLIENT:PLAINTEXT,\\\n    REPLICATION:SSL\n";
        let props = parse_server_properties(raw);
        assert_eq!(
            props["listener.security.protocol.map"],
            "CLIENT:PLAINTEXT,REPLICATION:SSL"
        );
    }

    #[test]
    fn test_later_keys_override_and_bare_keys() {
        let raw = b"num.partitions=1\nnum.partitions=12\nflag.only\n";
        let props = parse_server_properties(raw);
        assert_eq!(props["num.partitions"], "12");
        assert_eq!(props["flag.only"], "");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_server_properties(b"").is_empty());
    }
}
