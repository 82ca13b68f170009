use crate::builder::Section;
use crate::cascade::CascadeSplitter;
use crate::config::ChunkOptions;
use crate::context::ChunkContext;
use crate::error::Result;
use crate::estimate::count_words;
use crate::types::{Chunk, ChunkKind, ChunkMetadata, DocumentMetadata, MetadataDetails};

/// Convert built sections into indexed chunks.
///
/// A section within the size bound becomes one chunk. A larger one is split
/// on paragraph boundaries only, without overlap, and every piece keeps the
/// section's heading metadata.
pub fn assemble_chunks(
    sections: &[Section],
    options: &ChunkOptions,
    kind: ChunkKind,
    ctx: &ChunkContext<'_>,
) -> Result<Vec<Chunk>> {
    let max_size = options.effective_max_chunk_size();
    let splitter = CascadeSplitter::paragraphs();
    let mut chunks = Vec::with_capacity(sections.len());

    for section in sections {
        ctx.cancel.check()?;

        if section.text.len() <= max_size {
            chunks.push(section_chunk(
                chunks.len(),
                section,
                &section.text,
                section.start_offset,
                section.end_offset,
                kind,
                ctx,
            ));
            continue;
        }

        let pieces = splitter.split(&section.text, max_size, 0, ctx.cancel)?;
        log::debug!(
            "Section '{}' ({} bytes) re-split into {} pieces",
            section.heading,
            section.text.len(),
            pieces.len()
        );
        for piece in pieces {
            chunks.push(section_chunk(
                chunks.len(),
                section,
                piece.text,
                section.start_offset + piece.start,
                section.start_offset + piece.end,
                kind,
                ctx,
            ));
        }
    }

    Ok(chunks)
}

fn section_chunk(
    index: usize,
    section: &Section,
    content: &str,
    start_offset: usize,
    end_offset: usize,
    kind: ChunkKind,
    ctx: &ChunkContext<'_>,
) -> Chunk {
    let details = MetadataDetails::Document(DocumentMetadata {
        heading: section.heading.clone(),
        heading_level: section.level,
        section_path: section.section_path.clone(),
        short_title: section.short_title.clone(),
        anchor: section.anchor.clone(),
        has_code_block: section.has_opaque_region,
        word_count: count_words(content),
        ..Default::default()
    });
    let metadata = ChunkMetadata::new(kind, ctx.estimator.estimate(content), details);
    Chunk::new(index, content.to_string(), start_offset, end_offset, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_sections;
    use crate::cancel::CancellationToken;
    use crate::estimate::CharRatioEstimator;
    use crate::levels::LevelMode;
    use crate::token::{Boundary, MarkerIdentity, Token};
    use pretty_assertions::assert_eq;

    fn sections_for(body: &str) -> (String, Vec<Section>) {
        let tokens = vec![
            Token::Boundary(Boundary::new(MarkerIdentity::Depth(1), "Big", "# Big\n")),
            Token::text(body),
        ];
        let source: String = tokens.iter().map(Token::raw).collect();
        let sections =
            build_sections(tokens, LevelMode::Fixed { base: 0 }, &CancellationToken::new())
                .unwrap();
        (source, sections)
    }

    #[test]
    fn oversized_section_keeps_heading_on_every_piece() {
        let body = format!("\n{}\n\n{}\n\n{}\n", "a".repeat(30), "b".repeat(30), "c".repeat(30));
        let (source, sections) = sections_for(&body);
        let cancel = CancellationToken::new();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);
        let options = ChunkOptions::default().with_max_chunk_size(40).with_overlap(0);

        let chunks = assemble_chunks(&sections, &options, ChunkKind::Markdown, &ctx).unwrap();

        assert_eq!(chunks.len(), 3);
        for (index, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, index);
            assert_eq!(chunk.heading(), "Big");
            assert_eq!(chunk.content, &source[chunk.start_offset..chunk.end_offset]);
            assert!(chunk.content.len() <= 40);
            assert_eq!(chunk.metadata.kind, ChunkKind::Markdown);
        }
        assert!(chunks[0].content.starts_with("# Big\n"));
    }

    #[test]
    fn small_section_is_one_chunk_with_estimate() {
        let (_, sections) = sections_for("short body\n");
        let cancel = CancellationToken::new();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);

        let chunks =
            assemble_chunks(&sections, &ChunkOptions::default(), ChunkKind::Prose, &ctx).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "# Big\nshort body\n");
        assert_eq!(chunks[0].metadata.token_estimate, 5);
        let MetadataDetails::Document(doc) = &chunks[0].metadata.details else {
            panic!("expected document metadata");
        };
        assert_eq!(doc.heading_level, 1);
        assert_eq!(doc.section_path, "Big");
        assert_eq!(doc.word_count, 3);
    }

    #[test]
    fn seeded_heading_offsets_cover_the_seeded_content() {
        let sections = build_sections(
            vec![
                Token::Boundary(Boundary::new(MarkerIdentity::Depth(1), "Extracted", "")),
                Token::text("body\n"),
            ],
            LevelMode::Fixed { base: 0 },
            &CancellationToken::new(),
        )
        .unwrap();
        let cancel = CancellationToken::new();
        let estimator = CharRatioEstimator::default();
        let ctx = ChunkContext::new(&cancel, &estimator);

        let chunks =
            assemble_chunks(&sections, &ChunkOptions::default(), ChunkKind::Prose, &ctx).unwrap();

        assert_eq!(chunks[0].content, "Extracted\n\nbody\n");
        assert_eq!(chunks[0].end_offset - chunks[0].start_offset, chunks[0].content.len());
    }
}
