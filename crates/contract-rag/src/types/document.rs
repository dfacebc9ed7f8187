//! Document and chunk types with owner/tag provenance

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported upload formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
}

impl FileType {
    /// Detect file type from extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Detect file type from a filename's final extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
        }
    }
}

/// A document submitted for ingestion or conflict checking
#[derive(Debug, Clone)]
pub struct Document {
    /// Sanitised filename, the document's identifier
    pub filename: String,
    /// Username of the submitter
    pub owner: String,
    /// Free-form classification label
    pub tag: Option<String>,
    /// File type the text was extracted from
    pub file_type: FileType,
    /// Full extracted text
    pub text: String,
    /// SHA-256 of the extracted text
    pub content_hash: String,
}

/// A stored chunk of a document's text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub text: String,
    /// 1-based position of the chunk within its document
    pub paragraph_number: u32,
    /// Page the chunk starts on (always 1 for DOCX)
    pub page_number: u32,
    /// Filename of the parent document
    pub filename: String,
    /// Owner of the parent document
    pub owner: String,
    /// Tag of the parent document
    pub tag: Option<String>,
    /// Content hash of the parent document
    pub content_hash: String,
    /// Embedding vector
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a chunk of `doc` without an embedding
    pub fn new(doc: &Document, text: String, paragraph_number: u32, page_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            paragraph_number,
            page_number,
            filename: doc.filename.clone(),
            owner: doc.owner.clone(),
            tag: doc.tag.clone(),
            content_hash: doc.content_hash.clone(),
            embedding: Vec::new(),
        }
    }

    /// Attach an embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// A previously stored chunk returned by similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedMatch {
    /// Chunk text
    pub chunk: String,
    /// Tag of the source document
    pub tag_name: Option<String>,
    /// Filename of the source document
    pub filename: String,
    /// Page marker
    pub page_number: u32,
    /// 1-based chunk position within the source document
    pub paragraph_number: u32,
    /// Owner of the source document
    pub owner: String,
    /// Cosine similarity to the query (higher is closer)
    pub similarity: f32,
}

/// Filters for deleting stored chunks; all present fields must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkFilter {
    pub filename: Option<String>,
    pub tag: Option<String>,
    pub owner: String,
}
