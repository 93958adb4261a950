//! Test-only helpers for writing prompt fixture files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A temporary directory holding fixture files; removed on drop.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("create fixture dir")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` verbatim.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write one line per entry, each terminated by `\n`.
    pub fn write_lines(&self, name: &str, lines: &[&str]) -> Result<PathBuf> {
        let mut contents = String::new();
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }
        self.write(name, &contents)
    }

    /// Write a minimal `.docx` with one paragraph per entry (empty entries
    /// become empty paragraphs).
    pub fn write_docx(&self, name: &str, paragraphs: &[&str]) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        let file = fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut archive = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        archive
            .start_file("word/document.xml", options)
            .context("start document.xml")?;
        archive
            .write_all(document_xml(paragraphs).as_bytes())
            .context("write document.xml")?;
        archive.finish().context("finish docx")?;
        Ok(path)
    }

    /// Pin the modification time of a fixture file.
    pub fn set_modified(&self, path: &Path, modified: SystemTime) -> Result<()> {
        let file = fs::File::options()
            .write(true)
            .open(path)
            .with_context(|| format!("open {}", path.display()))?;
        file.set_modified(modified)
            .with_context(|| format!("set mtime {}", path.display()))
    }
}

fn document_xml(paragraphs: &[&str]) -> String {
    let mut body = String::new();
    for paragraph in paragraphs {
        if paragraph.is_empty() {
            body.push_str("<w:p/>");
        } else {
            let escaped = paragraph
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;");
            body.push_str(&format!(
                r#"<w:p><w:r><w:t xml:space="preserve">{escaped}</w:t></w:r></w:p>"#
            ));
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
}
