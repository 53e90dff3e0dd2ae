//! Text extraction from uploaded PDF resumes.
//!
//! Pages are extracted one at a time with `lopdf` so a single unreadable page does
//! not lose the rest of the document. When `lopdf` cannot load the file at all,
//! `pdf-extract` gets a try on the whole document.
//! CPU-bound work: callers go through `extract_blocking`, which runs the extractor
//! inside `tokio::task::spawn_blocking`.

use std::sync::Arc;

use bytes::Bytes;
use lopdf::Document;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::upload::UploadedFile;

/// Returned in place of resume text when nothing could be read.
pub const NO_TEXT_SENTINEL: &str = "No text could be extracted from the PDF files.";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not read PDF: {0}")]
    Load(String),

    #[error("PDF extraction aborted unexpectedly: {0}")]
    Panicked(String),
}

/// Text pulled out of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub pages_total: usize,
    /// 1-indexed numbers of pages that failed and were skipped.
    pub pages_skipped: Vec<u32>,
}

impl ExtractedText {
    /// True when no page produced a non-whitespace character.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError>;
}

/// Production extractor: per-page `lopdf`, whole-document `pdf-extract` fallback.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let doc = match Document::load_mem(bytes) {
            Ok(doc) => doc,
            Err(lopdf_err) => {
                warn!("lopdf could not load document ({lopdf_err}); trying pdf-extract");
                return extract_whole_document(bytes)
                    .map_err(|e| ExtractionError::Load(format!("{lopdf_err}; {e}")));
            }
        };

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let pages_total = page_numbers.len();
        let mut page_texts = Vec::with_capacity(pages_total);
        let mut pages_skipped = Vec::new();

        for page_number in page_numbers {
            match doc.extract_text(&[page_number]) {
                Ok(text) => {
                    if !text.trim().is_empty() {
                        page_texts.push(text);
                    }
                }
                Err(e) => {
                    warn!("Could not extract text from page {page_number}: {e}");
                    pages_skipped.push(page_number);
                }
            }
        }

        Ok(ExtractedText {
            text: page_texts.join("\n"),
            pages_total,
            pages_skipped,
        })
    }
}

fn extract_whole_document(bytes: &[u8]) -> Result<ExtractedText, String> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())?;
    Ok(ExtractedText {
        text,
        pages_total: 0,
        pages_skipped: Vec::new(),
    })
}

/// Runs the extractor on the blocking pool. A panic inside the PDF library is
/// reported as `ExtractionError::Panicked`.
pub async fn extract_blocking(
    extractor: Arc<dyn TextExtractor>,
    bytes: Bytes,
) -> Result<ExtractedText, ExtractionError> {
    tokio::task::spawn_blocking(move || extractor.extract(&bytes))
        .await
        .map_err(|e| ExtractionError::Panicked(e.to_string()))?
}

/// Combined text of several uploads, as used by the single-candidate flows.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedText {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Extracts every file in order and concatenates the text. Unreadable files are
/// skipped with a warning. Yields `NO_TEXT_SENTINEL` when nothing was read.
pub async fn extract_combined(
    extractor: Arc<dyn TextExtractor>,
    files: &[UploadedFile],
) -> CombinedText {
    let mut text = String::new();
    let mut warnings = Vec::new();

    for file in files {
        match extract_blocking(extractor.clone(), file.bytes.clone()).await {
            Ok(extracted) if extracted.is_empty() => {
                warnings.push(format!("{}: no readable text", file.file_name));
            }
            Ok(extracted) => {
                if !extracted.pages_skipped.is_empty() {
                    warnings.push(format!(
                        "{}: skipped unreadable pages {:?}",
                        file.file_name, extracted.pages_skipped
                    ));
                }
                text.push_str(&extracted.text);
                text.push('\n');
            }
            Err(e) => {
                warn!("Error reading {}: {e}", file.file_name);
                warnings.push(format!("Error reading {}: {e}", file.file_name));
            }
        }
    }

    if text.trim().is_empty() {
        info!("No text extracted from {} file(s)", files.len());
        text = NO_TEXT_SENTINEL.to_string();
    }

    CombinedText { text, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Utf8Extractor;

    impl TextExtractor for Utf8Extractor {
        fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| ExtractionError::Load(e.to_string()))?;
            if text == "panic" {
                panic!("malformed xref table");
            }
            Ok(ExtractedText {
                text: text.to_string(),
                pages_total: 1,
                pages_skipped: Vec::new(),
            })
        }
    }

    fn upload(name: &str, body: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            bytes: Bytes::from_static(body),
        }
    }

    // ── In-memory PDFs ──────────────────────────────────────────────────────

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, ObjectId, Stream};

    enum TestPage {
        Text(&'static str),
        /// `Contents` points at an object that does not exist.
        BrokenContents,
    }

    fn build_pdf(pages: &[TestPage]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let contents: ObjectId = match page {
                TestPage::Text(text) => {
                    let content = Content {
                        operations: vec![
                            Operation::new("BT", vec![]),
                            Operation::new("Tf", vec!["F1".into(), 12.into()]),
                            Operation::new("Td", vec![72.into(), 720.into()]),
                            Operation::new("Tj", vec![Object::string_literal(*text)]),
                            Operation::new("ET", vec![]),
                        ],
                    };
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
                }
                TestPage::BrokenContents => (9999, 0),
            };
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => contents,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pages_are_extracted_and_joined() {
        let pdf = build_pdf(&[TestPage::Text("Page one text"), TestPage::Text("Page two text")]);
        let extracted = PdfTextExtractor.extract(&pdf).unwrap();

        assert_eq!(extracted.pages_total, 2);
        assert!(extracted.pages_skipped.is_empty());
        let one = extracted.text.find("Page one text").unwrap();
        let two = extracted.text.find("Page two text").unwrap();
        assert!(one < two);
    }

    #[test]
    fn test_unreadable_page_does_not_abort_the_rest() {
        let pdf = build_pdf(&[TestPage::BrokenContents, TestPage::Text("Page two text")]);
        let extracted = PdfTextExtractor.extract(&pdf).unwrap();

        assert_eq!(extracted.pages_total, 2);
        assert!(extracted.text.contains("Page two text"));
        assert!(!extracted.is_empty());
    }

    #[test]
    fn test_pdf_without_text_is_empty() {
        let pdf = build_pdf(&[TestPage::Text("")]);
        let extracted = PdfTextExtractor.extract(&pdf).unwrap();

        assert_eq!(extracted.pages_total, 1);
        assert!(extracted.is_empty());
    }

    #[test]
    fn test_garbage_bytes_are_a_load_error() {
        let result = PdfTextExtractor.extract(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractionError::Load(_))));
    }

    #[test]
    fn test_whitespace_only_text_is_empty() {
        let extracted = ExtractedText {
            text: " \n\t".to_string(),
            pages_total: 2,
            pages_skipped: vec![],
        };
        assert!(extracted.is_empty());
    }

    #[tokio::test]
    async fn test_extract_blocking_catches_panics() {
        let result = extract_blocking(Arc::new(Utf8Extractor), Bytes::from_static(b"panic")).await;
        assert!(matches!(result, Err(ExtractionError::Panicked(_))));
    }

    #[tokio::test]
    async fn test_extract_combined_skips_bad_files() {
        let files = vec![
            upload("a.pdf", b"first resume"),
            upload("b.pdf", &[0xff, 0xfe]),
            upload("c.pdf", b"second resume"),
        ];
        let combined = extract_combined(Arc::new(Utf8Extractor), &files).await;
        assert_eq!(combined.text, "first resume\nsecond resume\n");
        assert_eq!(combined.warnings.len(), 1);
        assert!(combined.warnings[0].contains("b.pdf"));
    }

    #[tokio::test]
    async fn test_extract_combined_returns_sentinel_when_nothing_read() {
        let files = vec![upload("blank.pdf", b"   "), upload("bad.pdf", &[0xff])];
        let combined = extract_combined(Arc::new(Utf8Extractor), &files).await;
        assert_eq!(combined.text, NO_TEXT_SENTINEL);
        assert_eq!(combined.warnings.len(), 2);
    }
}
