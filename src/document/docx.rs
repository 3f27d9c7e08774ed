use super::TextExtractor;
use crate::{Error, Result};
use async_trait::async_trait;
use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};

/// Extracts plain text from DOCX bytes using the `docx-rs` reader.
///
/// Paragraph and table-cell text only; formatting, headers, and embedded
/// objects are dropped.
pub struct DocxTextExtractor;

impl DocxTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        paragraph
            .children
            .iter()
            .filter_map(|child| match child {
                ParagraphChild::Run(run) => Some(
                    run.children
                        .iter()
                        .filter_map(|rc| match rc {
                            RunChild::Text(text) => Some(text.text.clone()),
                            _ => None,
                        })
                        .collect::<String>(),
                ),
                _ => None,
            })
            .collect()
    }
}

impl Default for DocxTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for DocxTextExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| Error::DocumentRead(e.to_string()))?;

        let mut lines = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => {
                    lines.push(Self::paragraph_text(paragraph));
                }
                DocumentChild::Table(table) => {
                    for TableChild::TableRow(row) in &table.rows {
                        for TableRowChild::TableCell(cell) in &row.cells {
                            for content in &cell.children {
                                if let TableCellContent::Paragraph(paragraph) = content {
                                    lines.push(Self::paragraph_text(paragraph));
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(lines.join("\n"))
    }
}
