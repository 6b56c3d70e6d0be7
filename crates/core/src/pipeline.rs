//! Pipeline for processing edit logs into conversations and writing them out.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::conversation::{build_conversations, Conversation};
use crate::error::{DatasetError, Result};
use crate::history::{load_log_file, order_entries};
use crate::output::OutputFormat;

/// Configuration for the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub format: OutputFormat,
    /// Overrides the format's default file name.
    pub output_path: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| self.format.default_file_name().to_path_buf())
    }
}

/// Discover all JSON edit logs below a directory, sorted by path.
pub fn discover_log_files(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Process a single edit log into its conversations.
pub fn process_log_file(path: &Path) -> Result<Vec<Conversation>> {
    let log = load_log_file(path)?;
    let entries = order_entries(&log)?;
    debug!(path = ?path, entries = entries.len(), "ordered eligible entries");
    Ok(build_conversations(&entries, &log))
}

/// Process a log file, or every log below a directory.
///
/// Directory logs are processed in parallel; conversations are returned in
/// path order and the first failing log aborts the run.
pub fn process_input(path: &Path) -> Result<Vec<Conversation>> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return process_log_file(path);
    }

    let log_files = discover_log_files(path);
    info!(root = ?path, logs = log_files.len(), "processing edit log directory");

    let per_file: Vec<Vec<Conversation>> = log_files
        .par_iter()
        .map(|log_path| process_log_file(log_path))
        .collect::<Result<_>>()?;

    Ok(per_file.into_iter().flatten().collect())
}

/// Render conversations in the configured format and write them to disk.
///
/// Returns the path that was written.
pub fn write_output(conversations: &[Conversation], config: &PipelineConfig) -> Result<PathBuf> {
    let path = config.output_path();
    let rendered = config.format.render(conversations)?;
    std::fs::write(&path, rendered).map_err(|source| DatasetError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(path = ?path, conversations = conversations.len(), "wrote output");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use tempfile::TempDir;

    fn log_json(file: &str, timestamps: &[u64]) -> String {
        let entries: Vec<String> = timestamps
            .iter()
            .map(|ts| {
                format!(
                    r#"{{"fileName":"{file}","timestamp":{ts},"hunks":[{{"old_start":1,"new_start":1,"lines":[{{"op":"insert","text":"t{ts}"}}]}}]}}"#
                )
            })
            .collect();
        format!(r#"{{"history":[{}]}}"#, entries.join(","))
    }

    #[test]
    fn test_discover_log_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("subdir")).unwrap();
        std::fs::write(temp.path().join("b.json"), "{}").unwrap();
        std::fs::write(temp.path().join("subdir/a.json"), "{}").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();

        let files = discover_log_files(temp.path());
        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_process_log_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("log.json");
        std::fs::write(&path, log_json("a.rs", &[2, 1, 3])).unwrap();

        let conversations = process_log_file(&path).unwrap();
        assert_eq!(conversations.len(), 1);
        let messages = &conversations[0].messages;
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "+   1: t3\n");
        let user = &messages[1].content;
        assert!(user.find("t1").unwrap() < user.find("t2").unwrap());
    }

    #[test]
    fn test_process_input_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("1.json"), log_json("one.rs", &[1, 2])).unwrap();
        std::fs::write(temp.path().join("2.json"), log_json("two.rs", &[5])).unwrap();
        std::fs::write(temp.path().join("3.json"), r#"{"history":[]}"#).unwrap();

        let conversations = process_input(temp.path()).unwrap();
        assert_eq!(conversations.len(), 2);
        assert!(conversations[0].messages[0].content.contains("`one.rs`"));
        assert!(conversations[1].messages[0].content.contains("`two.rs`"));
    }

    #[test]
    fn test_process_input_directory_fails_on_bad_log() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("good.json"), log_json("a.rs", &[1])).unwrap();
        std::fs::write(temp.path().join("bad.json"), "[1, 2").unwrap();

        assert!(matches!(
            process_input(temp.path()),
            Err(DatasetError::Parse { .. })
        ));
    }

    #[test]
    fn test_process_input_missing_path() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            process_input(&temp.path().join("nope.json")),
            Err(DatasetError::NotFound(_))
        ));
    }

    #[test]
    fn test_write_output_empty_json() {
        let temp = TempDir::new().unwrap();
        let config = PipelineConfig {
            format: OutputFormat::Json,
            output_path: Some(temp.path().join("out.json")),
        };
        let written = write_output(&[], &config).unwrap();
        assert_eq!(std::fs::read_to_string(written).unwrap(), "[]");
    }

    #[test]
    fn test_write_output_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("log.json");
        std::fs::write(&path, log_json("a.rs", &[1])).unwrap();
        let conversations = process_log_file(&path).unwrap();

        let config = PipelineConfig {
            format: OutputFormat::Toml,
            output_path: Some(temp.path().join("out.toml")),
        };
        let written = write_output(&conversations, &config).unwrap();
        let text = std::fs::read_to_string(written).unwrap();
        assert!(text.starts_with("[[conversations]]\n\n[[conversations.messages]]\nrole = \"system\"\n"));
        assert!(text.contains("role = \"assistant\"\ncontent = \"\"\"\n+   1: t1\n\"\"\"\n"));
    }

    #[test]
    fn test_default_output_path() {
        let config = PipelineConfig {
            format: OutputFormat::Readable,
            output_path: None,
        };
        assert_eq!(config.output_path(), PathBuf::from("output.txt"));
    }
}
