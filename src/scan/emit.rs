//! Verbatim re-emission
//!
//! Writes the document back out unchanged except at token spans, where the
//! rendered format is put instead. Gaps between replacements are copied
//! byte for byte; the epilogue slot flushes whatever follows the last token.

use crate::core::entities::escape_into;
use crate::document::{Document, Span, Token, TokenSequence, WordSource};
use crate::error::{ScanError, ScanResult};
use crate::format::{Field, FormatTree, OutputContext};

/// What goes in place of a span
#[derive(Debug, Clone, Copy)]
enum Fill {
    Format,
    LemmaClass,
}

#[derive(Debug, Clone, Copy)]
struct Replacement {
    span: Span,
    fill: Fill,
    /// The span is an attribute value
    escape: bool,
}

pub struct Reemitter<'a> {
    input: &'a [u8],
    tokens: &'a TokenSequence,
}

impl<'a> Reemitter<'a> {
    pub fn new(doc: &'a Document, tokens: &'a TokenSequence) -> Self {
        Reemitter {
            input: doc.bytes(),
            tokens,
        }
    }

    /// Spans to replace for one token, in buffer order
    fn plan(token: &Token) -> [Option<Replacement>; 2] {
        let main = if !token.lemma.is_empty() {
            Replacement {
                span: token.lemma,
                fill: Fill::Format,
                escape: true,
            }
        } else {
            Replacement {
                span: token.extent,
                fill: Fill::Format,
                escape: token.source == WordSource::Attribute,
            }
        };
        let class = token.lemma_class.non_empty().map(|span| Replacement {
            span,
            fill: Fill::LemmaClass,
            escape: true,
        });
        match class {
            Some(class) if class.span.start() < main.span.start() => [Some(class), Some(main)],
            class => [Some(main), class],
        }
    }

    /// Write the document, rendering `format` against `outputs[i]` for the
    /// i-th token. Tokens whose output is `None` are copied unchanged.
    pub fn write<C: OutputContext>(
        &self,
        format: &FormatTree,
        outputs: &[Option<C>],
        out: &mut Vec<u8>,
    ) -> ScanResult<()> {
        let tokens = self.tokens.tokens();
        if outputs.len() != tokens.len() {
            return Err(ScanError::OutputCount {
                tokens: tokens.len(),
                outputs: outputs.len(),
            });
        }

        out.reserve(self.input.len());
        let mut cursor = 0;
        let mut rendered = Vec::new();
        for (token, output) in tokens.iter().zip(outputs) {
            let Some(ctx) = output else {
                continue;
            };
            for replacement in Self::plan(token).iter().flatten() {
                let span = replacement.span;
                // Overlapping spans are left alone
                if span.start() < cursor {
                    continue;
                }
                out.extend_from_slice(&self.input[cursor..span.start()]);

                rendered.clear();
                match replacement.fill {
                    Fill::Format => format.render(ctx, &mut rendered),
                    Fill::LemmaClass => ctx.write_field(Field::LemmaClass, &mut rendered),
                }
                if replacement.escape {
                    escape_into(&rendered, out);
                } else {
                    out.extend_from_slice(&rendered);
                }
                cursor = span.end();
            }
        }

        let end = self.tokens.epilogue().extent.start().max(cursor);
        out.extend_from_slice(&self.input[cursor..end]);
        Ok(())
    }

    /// Write the document with every token copied unchanged
    pub fn write_verbatim(&self, out: &mut Vec<u8>) {
        let end = self.tokens.epilogue().extent.start();
        out.extend_from_slice(&self.input[..end]);
    }
}
