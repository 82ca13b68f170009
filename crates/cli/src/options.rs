use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use docseg_chunker::{ChunkOptions, ChunkerError};

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub(crate) struct OptionOverrides {
    pub mime_type: Option<String>,
    pub language: Option<String>,
    pub max_chunk_size: Option<usize>,
    pub max_tokens: Option<usize>,
    pub overlap: Option<usize>,
    pub flat: bool,
}

pub(crate) fn parse_options(text: &str) -> Result<ChunkOptions> {
    toml::from_str(text).context("Invalid chunking config")
}

pub(crate) fn resolve_options(
    config: Option<&Path>,
    overrides: OptionOverrides,
) -> Result<ChunkOptions> {
    let mut options = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            parse_options(&text)?
        }
        None => ChunkOptions::default(),
    };

    if let Some(mime_type) = overrides.mime_type {
        options.mime_type = mime_type;
    }
    if let Some(language) = overrides.language {
        options.language = language;
    }
    if let Some(max_chunk_size) = overrides.max_chunk_size {
        options.max_chunk_size = max_chunk_size;
    }
    if let Some(max_tokens) = overrides.max_tokens {
        options.max_tokens = max_tokens;
    }
    if let Some(overlap) = overrides.overlap {
        options.overlap = overlap;
    }
    if overrides.flat {
        options.preserve_structure = false;
    }

    options
        .validate()
        .map_err(ChunkerError::invalid_config)?;
    Ok(options)
}
