//! Common test utilities for integration tests
//!
//! Provides shared fixtures, helpers, and test utilities used across
//! multiple integration test files.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use ragchat::domain::models::config::EmbeddingProviderKind;
use ragchat::Config;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Configuration for tests: offline embeddings, no frontend, fast retries
#[allow(dead_code)]
pub fn test_config(index_dir: &Path) -> Config {
    let mut config = Config::default();
    config.server.static_dir = None;
    config.auth.enabled = true;
    config.auth.api_key = Some("local-secret".to_string());
    config.openai.api_key = Some("sk-test-key".to_string());
    config.embedding.provider = EmbeddingProviderKind::Hashing;
    config.embedding.dimension = 256;
    config.rag.index_path = index_dir.display().to_string();
    config.llm.base_delay_ms = 10;
    config
}

/// A successful chat-completion body
#[allow(dead_code)]
pub fn chat_response(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
    })
}

/// Write a PDF with one page per entry, one text object per line
#[allow(dead_code)]
pub fn write_text_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let mut operations = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let y = 800 - 12 * i64::try_from(i).unwrap();
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![50.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ]);
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("Failed to write test PDF");
}

/// Page one of the sample manual: refunds, long enough for several chunks
#[allow(dead_code)]
pub fn refund_page() -> String {
    let paragraph = "Refund requests are accepted within fourteen days of purchase \
when the game has been played for less than two hours.\n\
Refunds for in-game items are only possible when the developer allows them.\n\
Approved refunds return the money to the original payment method within seven days.\n";
    paragraph.repeat(8)
}

/// Page two of the sample manual: hardware
#[allow(dead_code)]
pub fn hardware_page() -> String {
    "The handheld console ships with a charging brick and a carrying case.\n\
Battery life ranges between two and eight hours depending on the workload.\n\
Docking stations connect external monitors through the usb-c port.\n"
        .repeat(3)
}
