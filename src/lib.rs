pub mod chunk_splitter;
pub mod config;
pub mod document;
pub mod error;
pub mod html_normalizer;
pub mod pipeline;
pub mod utils;

pub use chunk_splitter::{Chunk, split_markdown, split_to_chunks, split_to_chunks_value};
pub use config::{ChunkingConfig, NormalizerConfig};
pub use document::{ChunkRecord, MarkdownDocument, SourceDocument};
pub use error::{ChunkerError, ChunkerResult};
pub use html_normalizer::{convert_html_to_md, convert_html_to_md_text, convert_html_to_md_value};
pub use pipeline::{process_document, process_documents, process_json_documents};
pub use utils::token_length;
