//! Line loading with a per-instance cache keyed on modification time.
//!
//! The cache is rebuilt on the first load and whenever the file's observed
//! modification time, its path, or the CSV column changes. Content edits that
//! keep the same timestamp (coarse filesystem granularity) are not detected
//! and the cached lines are served until the timestamp moves.

use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::core::wrap::wrap_line_index;
use crate::io::error::LoadError;
use crate::io::formats::{FileFormat, SplitOptions, read_lines};

/// Lines of one file as of its last observed modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderCache {
    pub file_path: PathBuf,
    pub modified: SystemTime,
    pub csv_column: String,
    pub lines: Vec<String>,
}

/// One `load` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest<'a> {
    pub file_path: &'a str,
    /// 1-based, wrapped into range.
    pub line_index: i64,
    pub csv_column: &'a str,
    pub strip_whitespace: bool,
}

impl<'a> LoadRequest<'a> {
    pub fn new(file_path: &'a str, line_index: i64) -> Self {
        Self {
            file_path,
            line_index,
            csv_column: "",
            strip_whitespace: true,
        }
    }
}

/// Result of one `load` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedLine {
    pub prompt: String,
    pub line_index: i64,
    pub total_lines: i64,
    /// True when `line_index == total_lines`.
    pub done: bool,
}

/// Per-instance loader owning its cache.
#[derive(Debug, Clone)]
pub struct LineLoader {
    csv_separator: String,
    cache: Option<LoaderCache>,
}

impl Default for LineLoader {
    fn default() -> Self {
        Self::new(&SplitOptions::default().csv_separator)
    }
}

impl LineLoader {
    pub fn new(csv_separator: &str) -> Self {
        Self {
            csv_separator: csv_separator.to_string(),
            cache: None,
        }
    }

    /// Resolve, refresh if stale, and return the wrapped line.
    pub fn load(&mut self, request: &LoadRequest<'_>) -> Result<LoadedLine, LoadError> {
        let (cache, _) = self.refresh_cache(request.file_path, request.csv_column)?;
        let total_lines = cache.lines.len();
        let slot = wrap_line_index(request.line_index, total_lines).ok_or_else(|| {
            LoadError::EmptyFile {
                path: cache.file_path.clone(),
            }
        })?;
        let line = &cache.lines[slot.offset];
        let prompt = if request.strip_whitespace {
            line.trim().to_string()
        } else {
            line.clone()
        };
        debug!(
            requested = request.line_index,
            line_index = slot.line_index,
            total_lines,
            "selected line"
        );
        Ok(LoadedLine {
            prompt,
            line_index: slot.line_index,
            total_lines: total_lines as i64,
            done: slot.is_last,
        })
    }

    /// Make the cache current for `file_path`.
    ///
    /// Returns `true` when the file was (re)read. Fails with
    /// [`LoadError::EmptyFile`] when the file yields no lines.
    pub fn refresh(&mut self, file_path: &str, csv_column: &str) -> Result<bool, LoadError> {
        let (_, reloaded) = self.refresh_cache(file_path, csv_column)?;
        Ok(reloaded)
    }

    /// Cached lines from the last successful refresh.
    pub fn lines(&self) -> &[String] {
        self.cache
            .as_ref()
            .map(|cache| cache.lines.as_slice())
            .unwrap_or_default()
    }

    fn refresh_cache(
        &mut self,
        file_path: &str,
        csv_column: &str,
    ) -> Result<(&LoaderCache, bool), LoadError> {
        let (path, metadata) = resolve_path(file_path)?;
        let format = FileFormat::from_path(&path)?;
        let modified = metadata
            .modified()
            .map_err(|source| LoadError::Unreadable {
                path: path.clone(),
                source,
            })?;

        let current = self.cache.as_ref().is_some_and(|cache| {
            cache.file_path == path && cache.modified == modified && cache.csv_column == csv_column
        });
        if !current {
            let options = SplitOptions {
                csv_column: csv_column.to_string(),
                csv_separator: self.csv_separator.clone(),
            };
            let lines = read_lines(&path, format, &options)?;
            if lines.is_empty() {
                self.cache = None;
                return Err(LoadError::EmptyFile { path });
            }
            info!(path = %path.display(), lines = lines.len(), "loaded prompt file");
            let cache: &LoaderCache = self.cache.insert(LoaderCache {
                file_path: path,
                modified,
                csv_column: csv_column.to_string(),
                lines,
            });
            return Ok((cache, true));
        }

        match &self.cache {
            Some(cache) => {
                debug!(path = %path.display(), lines = cache.lines.len(), "line cache hit");
                Ok((cache, false))
            }
            None => Err(LoadError::EmptyFile { path }),
        }
    }
}

/// Expand `~/` and check that the path names an existing regular file.
///
/// Returns the metadata read for the check alongside the path.
pub fn resolve_path(file_path: &str) -> Result<(PathBuf, Metadata), LoadError> {
    if file_path.trim().is_empty() {
        return Err(LoadError::EmptyPath);
    }
    let path = expand_home(file_path);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => Ok((path, meta)),
        Ok(_) => Err(LoadError::NotFound { path }),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(LoadError::NotFound { path }),
        Err(source) => Err(LoadError::Unreadable { path, source }),
    }
}

fn expand_home(file_path: &str) -> PathBuf {
    if let Some(rest) = file_path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return Path::new(&home).join(rest);
    }
    PathBuf::from(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::test_support::Fixtures;

    fn load(loader: &mut LineLoader, path: &Path, line_index: i64) -> LoadedLine {
        let file_path = path.to_str().expect("utf-8 path");
        loader
            .load(&LoadRequest::new(file_path, line_index))
            .expect("load")
    }

    fn summary(line: LoadedLine) -> (String, i64, i64, bool) {
        (line.prompt, line.line_index, line.total_lines, line.done)
    }

    #[test]
    fn three_line_scenario_wraps() {
        let fixtures = Fixtures::new().expect("fixtures");
        let path = fixtures.write_lines("abc.txt", &["a", "b", "c"]).expect("write");
        let mut loader = LineLoader::default();

        assert_eq!(summary(load(&mut loader, &path, 1)), ("a".into(), 1, 3, false));
        assert_eq!(summary(load(&mut loader, &path, 3)), ("c".into(), 3, 3, true));
        assert_eq!(summary(load(&mut loader, &path, 4)), ("a".into(), 1, 3, false));
        assert_eq!(summary(load(&mut loader, &path, 0)), ("c".into(), 3, 3, true));
    }

    #[test]
    fn strip_whitespace_only_affects_the_prompt() {
        let fixtures = Fixtures::new().expect("fixtures");
        let path = fixtures.write("p.md", "  padded  \n\n").expect("write");
        let file_path = path.to_str().expect("utf-8 path");
        let mut loader = LineLoader::default();

        let stripped = loader.load(&LoadRequest::new(file_path, 1)).expect("load");
        assert_eq!(stripped.prompt, "padded");
        assert_eq!(stripped.total_lines, 2);

        let raw = loader
            .load(&LoadRequest {
                strip_whitespace: false,
                ..LoadRequest::new(file_path, 1)
            })
            .expect("load");
        assert_eq!(raw.prompt, "  padded  ");

        let blank = loader.load(&LoadRequest::new(file_path, 2)).expect("load");
        assert_eq!((blank.prompt.as_str(), blank.done), ("", true));
    }

    #[test]
    fn same_mtime_serves_stale_lines() {
        let fixtures = Fixtures::new().expect("fixtures");
        let path = fixtures.write_lines("p.txt", &["old"]).expect("write");
        let pinned = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        fixtures.set_modified(&path, pinned).expect("mtime");
        let mut loader = LineLoader::default();
        assert_eq!(load(&mut loader, &path, 1).prompt, "old");

        fs::write(&path, "new\n").expect("rewrite");
        fixtures.set_modified(&path, pinned).expect("mtime");
        assert_eq!(load(&mut loader, &path, 1).prompt, "old");

        fixtures
            .set_modified(&path, pinned + Duration::from_secs(5))
            .expect("mtime");
        assert_eq!(load(&mut loader, &path, 1).prompt, "new");
    }

    #[test]
    fn refresh_reports_reloads() {
        let fixtures = Fixtures::new().expect("fixtures");
        let path = fixtures.write_lines("p.csv", &["a,b", "1,2"]).expect("write");
        let file_path = path.to_str().expect("utf-8 path");
        let mut loader = LineLoader::new(", ");

        assert!(loader.refresh(file_path, "").expect("first"));
        assert!(!loader.refresh(file_path, "").expect("cached"));
        assert_eq!(loader.lines(), ["a, b", "1, 2"]);

        assert!(loader.refresh(file_path, "b").expect("column change"));
        assert_eq!(loader.lines(), ["2"]);
    }

    #[test]
    fn switching_files_reloads() {
        let fixtures = Fixtures::new().expect("fixtures");
        let first = fixtures.write_lines("one.txt", &["one"]).expect("write");
        let second = fixtures.write_lines("two.txt", &["two"]).expect("write");
        let mut loader = LineLoader::default();
        assert_eq!(load(&mut loader, &first, 1).prompt, "one");
        assert_eq!(load(&mut loader, &second, 1).prompt, "two");
    }

    #[test]
    fn missing_unsupported_and_empty_files_fail() {
        let fixtures = Fixtures::new().expect("fixtures");
        let mut loader = LineLoader::default();

        let err = loader.load(&LoadRequest::new("", 1)).expect_err("empty path");
        assert!(matches!(err, LoadError::EmptyPath));

        let missing = fixtures.path().join("missing.txt");
        let err = loader
            .load(&LoadRequest::new(missing.to_str().expect("utf-8"), 1))
            .expect_err("missing");
        assert!(err.is_not_found());

        let dir = fixtures.path().to_str().expect("utf-8");
        let err = loader.load(&LoadRequest::new(dir, 1)).expect_err("directory");
        assert!(matches!(err, LoadError::NotFound { .. }));

        let png = fixtures.write("image.png", "x").expect("write");
        let err = loader
            .load(&LoadRequest::new(png.to_str().expect("utf-8"), 1))
            .expect_err("unsupported");
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));

        let empty = fixtures.write("empty.txt", "").expect("write");
        let err = loader
            .load(&LoadRequest::new(empty.to_str().expect("utf-8"), 1))
            .expect_err("empty");
        assert!(matches!(err, LoadError::EmptyFile { .. }));
    }

    #[test]
    fn emptied_file_fails_instead_of_serving_old_cache() {
        let fixtures = Fixtures::new().expect("fixtures");
        let path = fixtures.write_lines("p.txt", &["a"]).expect("write");
        let mut loader = LineLoader::default();
        load(&mut loader, &path, 1);

        fs::write(&path, "").expect("truncate");
        fixtures
            .set_modified(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(42))
            .expect("mtime");
        let err = loader
            .load(&LoadRequest::new(path.to_str().expect("utf-8"), 1))
            .expect_err("empty");
        assert!(matches!(err, LoadError::EmptyFile { .. }));
        assert!(loader.lines().is_empty());
    }

    #[test]
    fn resolve_path_returns_file_metadata() {
        let fixtures = Fixtures::new().expect("fixtures");
        let path = fixtures.write("p.txt", "abc\n").expect("write");
        let pinned = SystemTime::UNIX_EPOCH + Duration::from_secs(1_650_000_000);
        fixtures.set_modified(&path, pinned).expect("mtime");

        let (resolved, metadata) = resolve_path(path.to_str().expect("utf-8")).expect("resolve");
        assert_eq!(resolved, path);
        assert_eq!(metadata.len(), 4);
        assert_eq!(metadata.modified().expect("modified"), pinned);
    }

    #[test]
    fn expands_home_prefix() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        assert_eq!(expand_home("~/prompts.txt"), Path::new(&home).join("prompts.txt"));
        assert_eq!(expand_home("/abs/~/x.txt"), PathBuf::from("/abs/~/x.txt"));
    }
}
