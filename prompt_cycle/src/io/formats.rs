//! File format detection and line splitting.
//!
//! Splitting policy, shared by all formats: every line, row or paragraph is
//! kept, including blank ones, so that indices line up with what a user sees
//! in an editor. Trimming is the caller's choice and never changes counts.

use std::fs;
use std::io::Read;
use std::path::Path;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::debug;

use crate::io::error::LoadError;

const DOCUMENT_XML: &str = "word/document.xml";

/// Supported prompt file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.txt` and `.log`: newline-delimited.
    Text,
    /// `.md`/`.markdown`: newline-delimited, no markup processing.
    Markdown,
    /// `.csv`: one record per line.
    Csv,
    /// `.docx`: one paragraph per line.
    Docx,
}

impl FileFormat {
    /// Detect the format from the extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "txt" | "log" => Ok(FileFormat::Text),
            "md" | "markdown" => Ok(FileFormat::Markdown),
            "csv" => Ok(FileFormat::Csv),
            "docx" => Ok(FileFormat::Docx),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Options that change how rows are flattened into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// CSV header to select; empty joins whole records.
    pub csv_column: String,
    /// Joiner for whole CSV records.
    pub csv_separator: String,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            csv_column: String::new(),
            csv_separator: ", ".to_string(),
        }
    }
}

/// Read `path` and split it into lines according to `format`.
pub fn read_lines(
    path: &Path,
    format: FileFormat,
    options: &SplitOptions,
) -> Result<Vec<String>, LoadError> {
    let lines = match format {
        FileFormat::Text | FileFormat::Markdown => read_text(path)?,
        FileFormat::Csv => read_csv(path, options)?,
        FileFormat::Docx => read_docx(path)?,
    };
    debug!(path = %path.display(), ?format, lines = lines.len(), "split file into lines");
    Ok(lines)
}

fn unreadable(path: &Path) -> impl FnOnce(std::io::Error) -> LoadError + '_ {
    move |source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    }
}

fn read_text(path: &Path) -> Result<Vec<String>, LoadError> {
    let contents = fs::read_to_string(path).map_err(unreadable(path))?;
    Ok(split_text(&contents))
}

/// `\n` or `\r\n` separated; a trailing newline does not add a line.
pub fn split_text(contents: &str) -> Vec<String> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    contents.lines().map(str::to_string).collect()
}

fn read_csv(path: &Path, options: &SplitOptions) -> Result<Vec<String>, LoadError> {
    let file = fs::File::open(path).map_err(unreadable(path))?;
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let by_column = !options.csv_column.is_empty();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(by_column)
        .flexible(true)
        .from_reader(file);

    let mut lines = Vec::new();
    if by_column {
        let headers = reader.headers().map_err(csv_error)?.clone();
        let position = headers
            .iter()
            .position(|header| header.trim() == options.csv_column)
            .ok_or_else(|| LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: options.csv_column.clone(),
                available: headers.iter().collect::<Vec<_>>().join(", "),
            })?;
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            lines.push(record.get(position).unwrap_or_default().to_string());
        }
    } else {
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            lines.push(
                record
                    .iter()
                    .collect::<Vec<_>>()
                    .join(options.csv_separator.as_str()),
            );
        }
    }
    Ok(lines)
}

fn read_docx(path: &Path) -> Result<Vec<String>, LoadError> {
    let document_error = |message: String| LoadError::Document {
        path: path.to_path_buf(),
        message,
    };
    let file = fs::File::open(path).map_err(unreadable(path))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|err| document_error(err.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|err| document_error(format!("{DOCUMENT_XML}: {err}")))?
        .read_to_string(&mut xml)
        .map_err(|err| document_error(format!("{DOCUMENT_XML}: {err}")))?;
    document_paragraphs(&xml).map_err(document_error)
}

/// A `w:p` being read, with the number of `w:r` runs currently open in it.
#[derive(Default)]
struct OpenParagraph {
    text: String,
    runs: usize,
}

/// Extract the text of each `w:p` paragraph from WordprocessingML.
///
/// Runs are concatenated, `w:tab` becomes a tab, `w:br`/`w:cr` a space. Only
/// elements inside a run count as text, so tab stops declared in `w:pPr` are
/// ignored. Paragraphs nested in text boxes become their own lines, listed
/// before the paragraph that anchors them.
pub fn document_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut open: Vec<OpenParagraph> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|err| err.to_string())? {
            Event::Start(tag) => match tag.name().as_ref() {
                b"w:p" => open.push(OpenParagraph::default()),
                b"w:r" => {
                    if let Some(paragraph) = open.last_mut() {
                        paragraph.runs += 1;
                    }
                }
                b"w:t" => in_text = open.last().is_some_and(|paragraph| paragraph.runs > 0),
                _ => {}
            },
            Event::End(tag) => match tag.name().as_ref() {
                b"w:p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph.text);
                    }
                    in_text = false;
                }
                b"w:r" => {
                    if let Some(paragraph) = open.last_mut() {
                        paragraph.runs = paragraph.runs.saturating_sub(1);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(tag) => match (tag.name().as_ref(), open.last_mut()) {
                (b"w:p", _) => paragraphs.push(String::new()),
                (b"w:tab", Some(paragraph)) if paragraph.runs > 0 => paragraph.text.push('\t'),
                (b"w:br" | b"w:cr", Some(paragraph)) if paragraph.runs > 0 => {
                    paragraph.text.push(' ');
                }
                _ => {}
            },
            Event::Text(text) if in_text => {
                if let Some(paragraph) = open.last_mut() {
                    let raw = String::from_utf8_lossy(&text);
                    paragraph
                        .text
                        .push_str(&unescape(&raw).map_err(|err| err.to_string())?);
                }
            }
            Event::GeneralRef(reference) if in_text => {
                if let Some(paragraph) = open.last_mut() {
                    match reference.resolve_char_ref().map_err(|err| err.to_string())? {
                        Some(ch) => paragraph.text.push(ch),
                        None => {
                            let name = String::from_utf8_lossy(&reference);
                            let resolved = resolve_predefined_entity(&name)
                                .ok_or_else(|| format!("unknown entity &{name};"))?;
                            paragraph.text.push_str(resolved);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}
