use crate::config::atomic_rename;
use crate::model::{MoodLog, LOG_VERSION, MAX_LOG_ENTRIES};
use anyhow::{Context, Result};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// A missing log is a first run. A corrupt one is moved aside to
/// `<name>.corrupt` so the next save cannot overwrite it.
pub(crate) fn load_log(path: &Path) -> MoodLog {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return MoodLog::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "mood log unreadable, starting empty");
            return MoodLog::default();
        }
    };
    match serde_json::from_slice::<MoodLog>(&bytes) {
        Ok(mut log) => {
            if log.version != LOG_VERSION {
                tracing::info!(found = log.version, "upgrading mood log version");
                log.version = LOG_VERSION;
            }
            if log.entries.len() > MAX_LOG_ENTRIES {
                let excess = log.entries.len() - MAX_LOG_ENTRIES;
                log.entries.drain(..excess);
            }
            for e in &mut log.entries {
                e.motivation = e.motivation.min(100);
                e.focus = e.focus.min(100);
                e.stress = e.stress.min(100);
            }
            tracing::info!(entries = log.entries.len(), "mood log loaded");
            log
        }
        Err(e) => {
            let backup = corrupt_backup_path(path);
            match fs::rename(path, &backup) {
                Ok(()) => tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "mood log is corrupt, moved aside and starting empty"
                ),
                Err(re) => tracing::error!(
                    path = %path.display(),
                    error = %e,
                    rename_error = %re,
                    "mood log is corrupt and could not be moved aside"
                ),
            }
            MoodLog::default()
        }
    }
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".corrupt");
    path.with_file_name(name)
}

pub(crate) fn save_log_atomic(path: &Path, log: &MoodLog) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(log)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryEntry, MoodState};
    use chrono::{TimeZone, Utc};

    #[test]
    fn log_survives_a_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        let mut log = MoodLog::default();
        let ts = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).single().expect("ts");
        log.push(HistoryEntry::new(MoodState::new(10, 20, 30), "tired but ok", ts));
        save_log_atomic(&path, &log).expect("save");

        let back = load_log(&path);
        assert_eq!(back.version, LOG_VERSION);
        assert_eq!(back.entries, log.entries);

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("2026-03-04T05:06:07Z"), "timestamps are RFC 3339: {raw}");
    }

    #[test]
    fn missing_log_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_log(&dir.path().join("nope.json")).entries.is_empty());
    }

    #[test]
    fn corrupt_log_is_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        fs::write(&path, b"[1, 2, oops").expect("write");
        assert!(load_log(&path).entries.is_empty());
    }

    #[test]
    fn corrupt_log_is_kept_aside_from_the_next_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        let junk = b"{\"version\": 1, \"entries\": [\xff";
        fs::write(&path, junk).expect("write");

        let mut log = load_log(&path);
        assert!(log.entries.is_empty());
        assert!(!path.exists());
        let backup = dir.path().join("history.json.corrupt");
        assert_eq!(corrupt_backup_path(&path), backup);

        let ts = Utc.timestamp_opt(0, 0).single().expect("ts");
        log.push(HistoryEntry::new(MoodState::default(), "fresh", ts));
        save_log_atomic(&path, &log).expect("save");
        assert_eq!(fs::read(&backup).expect("backup"), junk);
        assert_eq!(load_log(&path).entries.len(), 1);
    }

    #[test]
    fn oversized_log_is_trimmed_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        let ts = Utc.timestamp_opt(0, 0).single().expect("ts");
        let mut log = MoodLog::default();
        log.entries = (0..130)
            .map(|i| HistoryEntry::new(MoodState::default(), format!("{i}"), ts))
            .collect();
        save_log_atomic(&path, &log).expect("save");

        let back = load_log(&path);
        assert_eq!(back.entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(back.entries[0].note, "10");
    }

    #[test]
    fn out_of_range_values_clamp_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        let json = r#"{"version": 1, "entries": [
            {"motivation": 200, "focus": 5, "stress": 255, "note": "", "timestamp": "2026-01-01T00:00:00Z"}
        ]}"#;
        fs::write(&path, json).expect("write");
        let e = &load_log(&path).entries[0];
        assert_eq!((e.motivation, e.focus, e.stress), (100, 5, 100));
    }
}
