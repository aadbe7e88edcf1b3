//! JSON file helpers shared by the configuration and content stores.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{Result, SimulatorError};
use crate::utils::paths::ensure_dir;

pub const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";

/// Writes `value` as pretty JSON to a `.tmp` sibling, then renames it into place.
pub fn save_json_atomic<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| {
        SimulatorError::StorageError(format!("`{}` is not valid: {}", path.display(), err))
    })
}

pub fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// `<prefix>_<YYYYMMDD_HHMM>[_<note>].json`
pub fn backup_file_name(prefix: &str, note: Option<&str>, now: DateTime<Utc>) -> String {
    compose_backup_name(prefix, note, now, None)
}

/// Like [`backup_file_name`], but ordered after every backup already taken in
/// `dir` during the same minute: later ones get `HHMM-2`, `HHMM-3`, ...
pub fn unique_backup_name(
    dir: &Path,
    prefix: &str,
    note: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String> {
    let name = backup_file_name(prefix, note, now);
    let minute = parse_backup_timestamp(prefix, &name);
    let latest = list_backups(dir, prefix)?
        .iter()
        .filter_map(|existing| parse_backup_key(prefix, existing))
        .filter(|(timestamp, _)| Some(*timestamp) == minute)
        .map(|(_, sequence)| sequence)
        .max();
    Ok(match latest {
        Some(sequence) => compose_backup_name(prefix, note, now, Some(sequence + 1)),
        None => name,
    })
}

fn compose_backup_name(
    prefix: &str,
    note: Option<&str>,
    now: DateTime<Utc>,
    sequence: Option<u32>,
) -> String {
    let mut name = format!("{}_{}", prefix, now.format(BACKUP_TIMESTAMP_FORMAT));
    if let Some(sequence) = sequence {
        name.push_str(&format!("-{sequence}"));
    }
    if let Some(label) = sanitize_note(note) {
        name.push('_');
        name.push_str(&label);
    }
    name.push('.');
    name.push_str(BACKUP_EXTENSION);
    name
}

/// Lowercase ASCII words joined by single dashes.
pub fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads the timestamp back out of a backup file name, ignoring any note.
pub fn parse_backup_timestamp(prefix: &str, name: &str) -> Option<DateTime<Utc>> {
    parse_backup_key(prefix, name).map(|(timestamp, _)| timestamp)
}

/// Timestamp and same-minute sequence (1 when absent) of a backup file name.
fn parse_backup_key(prefix: &str, name: &str) -> Option<(DateTime<Utc>, u32)> {
    let stem = name
        .strip_suffix(BACKUP_EXTENSION)?
        .strip_suffix('.')?
        .strip_prefix(prefix)?
        .strip_prefix('_')?;
    let mut segments = stem.splitn(3, '_');
    let date_part = segments.next()?;
    let time_segment = segments.next()?;
    let (time_part, sequence) = match time_segment.split_once('-') {
        Some((time, sequence)) => (time, sequence.parse().ok()?),
        None => (time_segment, 1),
    };
    if date_part.len() != 8 || time_part.len() != 4 {
        return None;
    }
    let timestamp = NaiveDateTime::parse_from_str(&format!("{date_part}{time_part}"), "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))?;
    Some((timestamp, sequence))
}

/// Backup file names in `dir` carrying `prefix`, newest first.
pub fn list_backups(dir: &Path, prefix: &str) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            if parse_backup_key(prefix, name).is_some() {
                entries.push(name.to_string());
            }
        }
    }
    entries.sort_by(|a, b| {
        parse_backup_key(prefix, b)
            .cmp(&parse_backup_key(prefix, a))
            .then_with(|| b.cmp(a))
    });
    Ok(entries)
}

/// Deletes all but the `retention` newest backups.
pub fn prune_backups(dir: &Path, prefix: &str, retention: usize) -> Result<Vec<String>> {
    let backups = list_backups(dir, prefix)?;
    let mut removed = Vec::new();
    for name in backups.into_iter().skip(retention) {
        fs::remove_file(dir.join(&name))?;
        removed.push(name);
    }
    Ok(removed)
}

/// Rejects names that would escape the backups directory.
pub fn backup_path(dir: &Path, name: &str) -> Result<PathBuf> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(SimulatorError::InvalidInput(format!(
            "`{name}` is not a backup name"
        )));
    }
    let path = dir.join(name);
    if !path.exists() {
        return Err(SimulatorError::StorageError(format!(
            "backup `{name}` not found"
        )));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn notes_are_slugged() {
        assert_eq!(
            sanitize_note(Some("  Before Price Update! ")),
            Some("before-price-update".into())
        );
        assert_eq!(sanitize_note(Some("???")), None);
        assert_eq!(sanitize_note(None), None);
    }

    #[test]
    fn backup_names_round_trip_their_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let name = backup_file_name("content", Some("harga baru"), now);
        assert_eq!(name, "content_20240309_1405_harga-baru.json");
        assert_eq!(parse_backup_timestamp("content", &name), Some(now));
        assert_eq!(parse_backup_timestamp("config", &name), None);
        assert_eq!(
            parse_backup_timestamp("content", "content_20240309_1405.json"),
            Some(now)
        );
    }

    #[test]
    fn same_minute_backups_get_a_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let mut created = Vec::new();
        for note in [Some("auto"), Some("auto"), None] {
            let name = unique_backup_name(dir.path(), "content", note, now).unwrap();
            write_file(&dir.path().join(&name), "{}").unwrap();
            created.push(name);
        }
        assert_eq!(
            created,
            [
                "content_20240309_1405_auto.json",
                "content_20240309_1405-2_auto.json",
                "content_20240309_1405-3.json",
            ]
        );
        assert_eq!(parse_backup_timestamp("content", &created[1]), Some(now));
        assert_eq!(parse_backup_timestamp("content", "content_20240309_1405-x.json"), None);

        let listed = list_backups(dir.path(), "content").unwrap();
        let newest_first: Vec<String> = created.into_iter().rev().collect();
        assert_eq!(listed, newest_first);
    }

    #[test]
    fn pruning_keeps_the_newest() {
        let dir = tempfile::tempdir().unwrap();
        for minute in 0..5 {
            let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, minute, 0).unwrap();
            write_file(&dir.path().join(backup_file_name("config", None, at)), "{}").unwrap();
        }
        let removed = prune_backups(dir.path(), "config", 3).unwrap();
        assert_eq!(
            removed,
            ["config_20240309_1401.json", "config_20240309_1400.json"]
        );
        assert_eq!(
            list_backups(dir.path(), "config").unwrap(),
            [
                "config_20240309_1404.json",
                "config_20240309_1403.json",
                "config_20240309_1402.json",
            ]
        );
    }

    #[test]
    fn backup_path_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            backup_path(dir.path(), "../config.json"),
            Err(SimulatorError::InvalidInput(_))
        ));
        assert!(matches!(
            backup_path(dir.path(), "content_20240101_0000.json"),
            Err(SimulatorError::StorageError(_))
        ));
    }
}
