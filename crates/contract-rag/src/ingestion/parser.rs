//! PDF and DOCX text extraction

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::FileType;

/// Byte offset at which a page begins in the extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Offset of the page's first byte in the full text
    pub start: usize,
}

/// Extracted document text with page positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Full text, pages joined by newlines
    pub text: String,
    /// Page starts in ascending order
    pub pages: Vec<PageSpan>,
}

impl ExtractedText {
    /// Text with no page structure; everything is page 1
    pub fn single_page(text: String) -> Self {
        Self {
            text,
            pages: vec![PageSpan { page_number: 1, start: 0 }],
        }
    }

    /// Join page texts with newlines, remembering where each page starts
    pub fn from_pages(pages: impl IntoIterator<Item = (u32, String)>) -> Self {
        let mut text = String::new();
        let mut spans = Vec::new();

        for (i, (page_number, page_text)) in pages.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            spans.push(PageSpan {
                page_number,
                start: text.len(),
            });
            text.push_str(&page_text);
        }

        if spans.is_empty() {
            return Self::single_page(text);
        }
        Self { text, pages: spans }
    }

    /// Page containing the byte at `offset`
    pub fn page_at(&self, offset: usize) -> u32 {
        self.pages
            .iter()
            .take_while(|p| p.start <= offset)
            .last()
            .map(|p| p.page_number)
            .unwrap_or(1)
    }

    /// Whether there is any non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// SHA-256 of the text, hex encoded
    pub fn content_hash(&self) -> String {
        hash_content(&self.text)
    }
}

/// Extracts text from uploaded documents
pub struct FileParser;

impl FileParser {
    /// Extract text according to the declared file type
    pub fn extract(filename: &str, file_type: FileType, data: &[u8]) -> Result<ExtractedText> {
        let extracted = match file_type {
            FileType::Pdf => Self::parse_pdf(filename, data)?,
            FileType::Docx => Self::parse_docx(filename, data)?,
        };

        tracing::debug!(
            "Extracted {} chars over {} page(s) from {}",
            extracted.text.chars().count(),
            extracted.pages.len(),
            filename
        );
        Ok(extracted)
    }

    /// Extract text from a filename's extension
    pub fn extract_by_name(filename: &str, data: &[u8]) -> Result<ExtractedText> {
        let file_type = FileType::from_filename(filename)
            .ok_or_else(|| Error::UnsupportedFileType(filename.to_string()))?;
        Self::extract(filename, file_type, data)
    }

    /// Parse PDF page by page, falling back to whole-document extraction
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ExtractedText> {
        match Self::extract_pdf_pages(data) {
            Ok(pages) if pages.iter().any(|(_, text)| !text.trim().is_empty()) => {
                return Ok(ExtractedText::from_pages(pages));
            }
            Ok(_) => tracing::debug!("lopdf found no text in {}, trying pdf-extract", filename),
            Err(e) => tracing::warn!("lopdf failed on {}: {}, trying pdf-extract", filename, e),
        }

        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;
        Ok(ExtractedText::single_page(cleanup_pdf_text(&text)))
    }

    fn extract_pdf_pages(data: &[u8]) -> std::result::Result<Vec<(u32, String)>, lopdf::Error> {
        let doc = lopdf::Document::load_mem(data)?;
        let mut pages = Vec::new();

        for page_number in doc.get_pages().into_keys() {
            let text = match doc.extract_text(&[page_number]) {
                Ok(text) => cleanup_pdf_text(&text),
                Err(e) => {
                    tracing::debug!("Could not extract page {}: {}", page_number, e);
                    String::new()
                }
            };
            pages.push((page_number, text));
        }

        Ok(pages)
    }

    /// Parse DOCX paragraphs; the whole document is page 1
    fn parse_docx(filename: &str, data: &[u8]) -> Result<ExtractedText> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut paragraph = String::new();
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                paragraph.push_str(&t.text);
                            }
                        }
                    }
                }
                paragraphs.push(paragraph);
            }
        }

        Ok(ExtractedText::single_page(paragraphs.join("\n")))
    }
}

/// Normalise characters PDF fonts commonly produce
fn cleanup_pdf_text(text: &str) -> String {
    let text = text
        .replace('\0', "")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// SHA-256 of a string, hex encoded
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
