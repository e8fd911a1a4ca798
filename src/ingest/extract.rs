//! Text extraction per file type.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};
use zip::ZipArchive;

use super::error::ExtractError;
use crate::constants::DEFAULT_PDFTOTEXT_BIN;

/// Supported upload types, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Pdf,
    Docx,
    PlainText,
    Markdown,
}

impl FileKind {
    /// Case-insensitive extension lookup. `None` for unsupported files.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "txt" | "text" => Some(FileKind::PlainText),
            "md" | "markdown" => Some(FileKind::Markdown),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            FileKind::PlainText => "text/plain",
            FileKind::Markdown => "text/markdown",
        }
    }
}

#[async_trait]
/// Turns uploaded bytes into plain text.
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// UTF-8 text and markdown; invalid sequences are replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let text = String::from_utf8_lossy(bytes);
        Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
    }
}

/// PDF extraction through poppler's `pdftotext`, reading the document from
/// stdin and the text from stdout.
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    binary: PathBuf,
}

impl PdfTextExtractor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PDFTOTEXT_BIN)
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let tool = self.binary.display().to_string();

        let mut child = Command::new(&self.binary)
            .args(["-layout", "-enc", "UTF-8", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExtractError::ToolUnavailable {
                tool: tool.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExtractError::Failed {
                tool: tool.clone(),
                message: "stdin not captured".to_string(),
            })?;
        let input = bytes.to_vec();
        let feeder = tokio::spawn(async move {
            // pdftotext may exit before reading everything; its status decides
            let _ = stdin.write_all(&input).await;
        });

        let output = child.wait_with_output().await?;
        if let Err(err) = feeder.await {
            warn!(tool = %tool, error = %err, "PDF stdin writer did not finish");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(tool = %tool, status = %output.status, "PDF extraction failed");
            return Err(ExtractError::Failed {
                tool,
                message: stderr,
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!(chars = text.chars().count(), "PDF text extracted");
        Ok(text)
    }
}

/// Word documents: the paragraph text of `word/document.xml`.
///
/// Each paragraph becomes one line. Title and heading paragraphs are preceded
/// by a blank line so they chunk together with the section they open.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxTextExtractor;

const DOCX_BODY: &str = "word/document.xml";

#[async_trait]
impl TextExtractor for DocxTextExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let bytes = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || docx_text(&bytes))
            .await
            .map_err(malformed_docx)??;
        debug!(chars = text.chars().count(), "DOCX text extracted");
        Ok(text)
    }
}

fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(malformed_docx)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(malformed_docx)?
        .read_to_string(&mut xml)?;
    document_text(&xml)
}

fn document_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut paragraph = String::new();
    let mut heading = false;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(malformed_docx)? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::Start(e) if e.name().as_ref() == b"w:r" => in_run = true,
            Event::Empty(e) | Event::Start(e) => match e.name().as_ref() {
                // tab stops in paragraph properties are not content
                b"w:tab" if in_run => paragraph.push('\t'),
                b"w:br" | b"w:cr" if in_run => paragraph.push('\n'),
                b"w:pStyle" => heading = is_heading_style(&e)?,
                _ => {}
            },
            Event::Text(t) if in_text => {
                paragraph.push_str(&t.unescape().map_err(malformed_docx)?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => in_run = false,
                b"w:p" => {
                    if heading && !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(paragraph.trim());
                    text.push('\n');
                    paragraph.clear();
                    heading = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn is_heading_style(element: &BytesStart<'_>) -> Result<bool, ExtractError> {
    let Some(style) = element
        .try_get_attribute("w:val")
        .map_err(malformed_docx)?
    else {
        return Ok(false);
    };
    let style = style.unescape_value().map_err(malformed_docx)?;
    Ok(style == "Title" || style.starts_with("Heading"))
}

fn malformed_docx(err: impl std::fmt::Display) -> ExtractError {
    ExtractError::Malformed {
        format: "docx",
        message: err.to_string(),
    }
}
