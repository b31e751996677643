//! Flat key/value `.properties` files (UTF-8).
//!
//! Only the subset of the Java format that Liferay checkouts use is
//! interpreted: `#`/`!` comments, `=`/`:`/whitespace separators, backslash
//! line continuations, and the usual escapes including `\uXXXX`.
use crate::error::{Result, TarchiaError};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

pub type PropertyMap = BTreeMap<String, String>;

/// Read `key` from `path`. A missing file is `NotFound`; an absent or blank
/// value is `MissingKey`.
pub fn read_property(path: &Path, key: &str) -> Result<String> {
    let Some(entries) = load_properties(path)? else {
        return Err(TarchiaError::not_found(format!(
            "properties file {} does not exist",
            path.display()
        )));
    };
    entries
        .get(key)
        .filter(|value| !value.trim().is_empty())
        .cloned()
        .ok_or_else(|| TarchiaError::MissingKey {
            path: path.to_path_buf(),
            key: key.to_string(),
        })
}

/// Like [`read_property`] but absence of the file, the key, or a value is
/// `Ok(None)`.
pub fn lookup_property(path: &Path, key: &str) -> Result<Option<String>> {
    let Some(entries) = load_properties(path)? else {
        return Ok(None);
    };
    Ok(entries
        .get(key)
        .filter(|value| !value.trim().is_empty())
        .cloned())
}

/// Replace the contents of `path` with the single pair `key=value`.
pub fn write_property(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut entries = PropertyMap::new();
    entries.insert(key.to_string(), value.to_string());
    fs::write(path, render_properties(&entries).as_bytes())
        .map_err(|err| TarchiaError::io(err, "write", path))
}

/// True only when the marker at `marker_file` records exactly `tag`.
/// Unreadable markers count as "nothing built yet".
pub fn is_tag_built(tag: &str, marker_file: &Path) -> bool {
    match lookup_property(marker_file, crate::paths::BUILD_MARKER_KEY) {
        Ok(Some(built)) => built == tag,
        Ok(None) => false,
        Err(err) => {
            tracing::warn!(
                path = %marker_file.display(),
                error = %err,
                "build marker unreadable; treating tag as not built"
            );
            false
        }
    }
}

fn load_properties(path: &Path) -> Result<Option<PropertyMap>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(parse_properties(&text))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(TarchiaError::io(err, "read", path)),
    }
}

pub fn parse_properties(text: &str) -> PropertyMap {
    let mut entries = PropertyMap::new();
    for line in logical_lines(text) {
        let (key, value) = split_entry(&line);
        entries.insert(unescape(key), unescape(value));
    }
    entries
}

pub fn render_properties(entries: &PropertyMap) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

/// Join continuation lines and drop blanks and comments. Leading whitespace
/// of each physical line is not part of the entry.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;
    for raw in text.lines() {
        let trimmed = raw.trim_start();
        let mut current = match pending.take() {
            Some(mut joined) => {
                joined.push_str(trimmed);
                joined
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };
        if ends_with_continuation(&current) {
            current.pop();
            pending = Some(current);
        } else {
            lines.push(current);
        }
    }
    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|ch| *ch == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }
    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\x0c']);
    }
    (key, rest)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn escape(raw: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for (idx, ch) in raw.chars().enumerate() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(ch);
            }
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_separators_comments_and_continuations() {
        let text = "# comment\n! other comment\n\napp.server.parent.dir=/opt/liferay\nliferay.home : /srv/home\nspaced value\nlong=first \\\n    second\n";
        let entries = parse_properties(text);
        assert_eq!(entries["app.server.parent.dir"], "/opt/liferay");
        assert_eq!(entries["liferay.home"], "/srv/home");
        assert_eq!(entries["spaced"], "value");
        assert_eq!(entries["long"], "first second");
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn parses_escapes_and_unicode() {
        let entries = parse_properties("key\\ with\\=sep=caf\\u00e9\\tend\nraw=ñandú\n");
        assert_eq!(entries["key with=sep"], "café\tend");
        assert_eq!(entries["raw"], "ñandú");
    }

    #[test]
    fn later_entries_win() {
        let entries = parse_properties("tag=a\ntag=b\n");
        assert_eq!(entries["tag"], "b");
    }

    #[test]
    fn write_then_read_returns_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.server.version.properties");
        for value in ["7.4.3.81-ga81", "  leading", "ünïcödé 版本", "C:\\bundles"] {
            write_property(&path, "app.server.version.tag", value).expect("write");
            assert_eq!(
                read_property(&path, "app.server.version.tag").expect("read"),
                value
            );
        }
    }

    #[test]
    fn write_replaces_previous_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("marker.properties");
        fs::write(&path, "other=1\n").expect("seed");
        write_property(&path, "app.server.version.tag", "7.4.3.81-ga81").expect("write");
        assert_eq!(
            fs::read_to_string(&path).expect("read back"),
            "app.server.version.tag=7.4.3.81-ga81\n"
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_property(&dir.path().join("absent.properties"), "key").expect_err("absent");
        assert!(matches!(err, TarchiaError::NotFound(_)));
    }

    #[test]
    fn missing_or_empty_key_is_missing_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.server.me.properties");
        fs::write(&path, "app.server.parent.dir=\nother=x\n").expect("seed");
        let err = read_property(&path, "app.server.parent.dir").expect_err("empty");
        assert!(matches!(err, TarchiaError::MissingKey { .. }));
        let err = read_property(&path, "absent").expect_err("absent");
        assert!(matches!(err, TarchiaError::MissingKey { .. }));
        assert_eq!(lookup_property(&path, "app.server.parent.dir").expect("lookup"), None);
    }

    #[test]
    fn tag_built_only_on_exact_match() {
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("app.server.version.properties");
        assert!(!is_tag_built("7.4.3.81-ga81", &marker));

        write_property(&marker, "app.server.version.tag", "7.4.3.81-ga81").expect("write");
        assert!(is_tag_built("7.4.3.81-ga81", &marker));
        assert!(!is_tag_built("7.4.3.81-GA81", &marker));
        assert!(!is_tag_built("7.4.3.82-ga82", &marker));
    }

    #[test]
    fn unreadable_marker_is_not_built() {
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("app.server.version.properties");
        fs::write(&marker, b"\xff\xfe\x00").expect("seed invalid utf-8");
        assert!(!is_tag_built("7.4.3.81-ga81", &marker));

        fs::create_dir_all(dir.path().join("as-dir")).expect("mkdir");
        assert!(!is_tag_built("7.4.3.81-ga81", &dir.path().join("as-dir")));
    }
}
