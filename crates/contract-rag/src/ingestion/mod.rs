//! Document ingestion: upload validation, text extraction and chunking

pub mod chunker;
pub mod parser;
mod processor;
pub mod upload;

pub use chunker::{chunk, ChunkSpan, TextChunker};
pub use parser::{ExtractedText, FileParser, PageSpan};
pub use processor::{extract_text, DocumentIngestor, IngestOutcome, IngestPipeline};
pub use upload::{sanitize_filename, Upload};
