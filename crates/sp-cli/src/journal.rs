//! Append-only JSONL session logs.
//!
//! Each user's focus and pomodoro sessions live in flat files under
//! `<data_dir>/users/<user_id>/`. Writers hold an exclusive lock on a `.lock`
//! file in that directory while appending or rewriting.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A directory of session logs belonging to one user.
#[derive(Debug, Clone)]
pub struct Journal {
    dir: PathBuf,
}

impl Journal {
    /// Journal for `user_id` under the configured data directory.
    pub fn for_user(data_dir: &Path, user_id: i64) -> Self {
        Self {
            dir: data_dir.join("users").join(user_id.to_string()),
        }
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Acquires the journal lock, creating the directory if needed.
    ///
    /// The lock is released when the returned file is dropped.
    fn lock(&self) -> Result<File> {
        fs::create_dir_all(&self.dir).context("failed to create journal directory")?;
        let lock_file =
            File::create(self.dir.join(".lock")).context("failed to create lock file")?;
        lock_file
            .lock_exclusive()
            .context("failed to acquire lock")?;
        Ok(lock_file)
    }

    /// Appends one record as a JSON line.
    pub fn append<T: Serialize>(&self, file_name: &str, record: &T) -> Result<()> {
        let _lock = self.lock()?;
        let path = self.path(file_name);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let json = serde_json::to_string(record).context("failed to serialize record")?;
        writeln!(file, "{json}").context("failed to write record")?;
        tracing::debug!(path = %path.display(), "appended journal record");
        Ok(())
    }

    /// Reads every record of a JSONL file; a missing file reads as empty.
    pub fn read_all<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.path(file_name);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to open {}", path.display()));
            }
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.context("failed to read line")?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).with_context(|| {
                format!("failed to parse {} line {}", path.display(), index + 1)
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Reads a whole-file JSON document, or `T::default()` if missing.
    pub fn read_document<T: DeserializeOwned + Default>(&self, file_name: &str) -> Result<T> {
        let path = self.path(file_name);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Replaces a whole-file JSON document under the journal lock.
    pub fn update_document<T, F>(&self, file_name: &str, update: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T),
    {
        let _lock = self.lock()?;
        let mut document: T = self.read_document(file_name)?;
        update(&mut document);

        let path = self.path(file_name);
        let json = serde_json::to_string(&document).context("failed to serialize document")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[test]
    fn append_then_read_preserves_order() {
        let temp = tempfile::tempdir().unwrap();
        let journal = Journal::for_user(temp.path(), 1);

        for text in ["first", "second"] {
            journal
                .append(
                    "notes.jsonl",
                    &Note {
                        text: text.to_string(),
                    },
                )
                .unwrap();
        }

        let notes: Vec<Note> = journal.read_all("notes.jsonl").unwrap();
        let texts: Vec<&str> = notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(temp.path().join("users/1/notes.jsonl").exists());
    }

    #[test]
    fn missing_files_read_as_empty() {
        let temp = tempfile::tempdir().unwrap();
        let journal = Journal::for_user(temp.path(), 7);

        let notes: Vec<Note> = journal.read_all("notes.jsonl").unwrap();
        assert!(notes.is_empty());
        let sites: Vec<String> = journal.read_document("sites.json").unwrap();
        assert!(sites.is_empty());
    }

    #[test]
    fn users_have_separate_journals() {
        let temp = tempfile::tempdir().unwrap();
        let ada = Journal::for_user(temp.path(), 1);
        let grace = Journal::for_user(temp.path(), 2);

        ada.append("notes.jsonl", &Note { text: "a".to_string() })
            .unwrap();

        let notes: Vec<Note> = grace.read_all("notes.jsonl").unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn corrupt_line_reports_line_number() {
        let temp = tempfile::tempdir().unwrap();
        let journal = Journal::for_user(temp.path(), 1);
        journal
            .append("notes.jsonl", &Note { text: "ok".to_string() })
            .unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(journal.path("notes.jsonl"))
            .unwrap();
        writeln!(file, "{{not json").unwrap();

        let err = journal.read_all::<Note>("notes.jsonl").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn update_document_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let journal = Journal::for_user(temp.path(), 1);

        let sites: Vec<String> = journal
            .update_document("sites.json", |sites: &mut Vec<String>| {
                sites.push("example.com".to_string());
            })
            .unwrap();
        assert_eq!(sites, vec!["example.com"]);

        let stored: Vec<String> = journal.read_document("sites.json").unwrap();
        assert_eq!(stored, vec!["example.com"]);
    }
}
