//! Integration tests for the contract differ

use contract_differ::diff;
use contract_differ::error::{ContractDifferError, Side};
use contract_differ::extract::ExtractionOptions;
use contract_differ::input::manager::InputManager;
use contract_differ::pipeline::Comparer;
use contract_differ::present::{ComparisonReport, SegmentKind};
use contract_differ::Config;
use std::io::Write;
use std::path::{Path, PathBuf};

fn comparer() -> Comparer {
    Comparer::new(&Config::default())
}

fn write_docx(dir: &Path, name: &str, paragraphs: &[&str]) -> PathBuf {
    let mut docx = docx_rs::Docx::new();
    for p in paragraphs {
        docx = docx.add_paragraph(
            docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(*p)),
        );
    }
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    docx.build().pack(file).unwrap();
    path
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new(ExtractionOptions::default());
    let path = Path::new("tests/fixtures/original_contract.txt");

    let result = manager.extract_from_path(path).await;
    assert!(result.is_ok());

    let extracted = result.unwrap();
    assert!(extracted.text.contains("SERVICE AGREEMENT"));
    assert!(extracted.text.contains("Acme Corporation"));
    assert!(extracted.warnings.is_empty());
    assert!(extracted.word_count > 0);
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new(ExtractionOptions::default());
    let path = Path::new("tests/fixtures/notes.md");

    let result = manager.extract_from_path(path).await;
    assert!(result.is_ok());

    let extracted = result.unwrap();
    assert!(extracted.text.contains("fee increase"));
    assert!(extracted.text.contains("Payment terms"));
    // Should not contain markdown formatting
    assert!(!extracted.text.contains("**"));
    assert!(!extracted.text.contains('#'));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new(ExtractionOptions::default());
    let path = Path::new("tests/fixtures/original_contract.txt");

    // First extraction
    let first = manager.extract_from_path(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    // Second extraction should use cache
    let second = manager.extract_from_path(path).await.unwrap();
    assert_eq!(first.text, second.text);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new(ExtractionOptions::default());
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_from_path(path).await;
    assert!(matches!(
        result,
        Err(ContractDifferError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new(ExtractionOptions::default());
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_from_path(path).await;
    assert!(matches!(result, Err(ContractDifferError::InvalidInput(_))));
}

#[tokio::test]
async fn test_end_to_end_text_comparison() {
    let original = Path::new("tests/fixtures/original_contract.txt");
    let revised = Path::new("tests/fixtures/revised_contract.txt");

    let comparison = comparer().compare(original, revised).await.unwrap();

    // The script must reproduce both sides exactly.
    assert_eq!(
        diff::restore_before(&comparison.ops),
        comparison.original.text
    );
    assert_eq!(diff::restore_after(&comparison.ops), comparison.target.text);

    let report = ComparisonReport::new(&comparison, 0);
    assert!(!report.is_identical());
    assert!(report.stats.inserted_chars > 0);
    assert!(report.stats.similarity > 0.5);

    // The fee change and the new clause must both surface as changes.
    let inserted: String = report
        .segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Inserted)
        .map(|s| s.text.as_str())
        .collect();
    assert!(inserted.contains("12,500") || inserted.contains("2,5"));
    assert!(inserted.contains("Liability"));
}

#[tokio::test]
async fn test_end_to_end_docx_comparison() {
    let dir = tempfile::tempdir().unwrap();
    let original = write_docx(
        dir.path(),
        "old.docx",
        &["Payment is due within 30 days.", "Governing law: England."],
    );
    let revised = write_docx(
        dir.path(),
        "new.docx",
        &["Payment is due within 45 days.", "Governing law: England."],
    );

    let comparison = comparer().compare(&original, &revised).await.unwrap();

    assert_eq!(
        diff::restore_before(&comparison.ops),
        comparison.original.text
    );
    assert_eq!(diff::restore_after(&comparison.ops), comparison.target.text);

    let report = ComparisonReport::new(&comparison, 0);
    let deleted: String = report
        .segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Deleted)
        .map(|s| s.text.as_str())
        .collect();
    let inserted: String = report
        .segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Inserted)
        .map(|s| s.text.as_str())
        .collect();
    assert!(deleted.contains('3'));
    assert!(inserted.contains('4'));
}

#[tokio::test]
async fn test_identical_docx_files() {
    let dir = tempfile::tempdir().unwrap();
    let original = write_docx(dir.path(), "a.docx", &["Same clause text."]);
    let revised = write_docx(dir.path(), "b.docx", &["Same clause text."]);

    let comparison = comparer().compare(&original, &revised).await.unwrap();
    let report = ComparisonReport::new(&comparison, 0);

    assert!(report.is_identical());
    assert_eq!(comparison.ops.len(), 1);
    assert!(comparison.ops[0].is_equal());
}

#[tokio::test]
async fn test_corrupt_docx_aborts_comparison() {
    let dir = tempfile::tempdir().unwrap();
    let original = write_docx(dir.path(), "good.docx", &["Intact content."]);

    // Truncate a valid document so the archive is unreadable.
    let bytes = std::fs::read(&original).unwrap();
    let corrupt_path = dir.path().join("corrupt.docx");
    let mut file = std::fs::File::create(&corrupt_path).unwrap();
    file.write_all(&bytes[..bytes.len() / 2]).unwrap();

    let err = comparer().compare(&original, &corrupt_path).await.unwrap_err();
    match err {
        ContractDifferError::ExtractionFailed { side, .. } => assert_eq!(side, Side::Target),
        other => panic!("expected side-attributed extraction failure, got {}", other),
    }
}

#[tokio::test]
async fn test_mixed_format_comparison() {
    let dir = tempfile::tempdir().unwrap();
    let docx = write_docx(dir.path(), "contract.docx", &["The fee is 10,000 USD."]);

    let txt = dir.path().join("contract.txt");
    std::fs::write(&txt, "The fee is 10,000 USD.").unwrap();

    let comparison = comparer().compare(&docx, &txt).await.unwrap();
    let report = ComparisonReport::new(&comparison, 0);
    assert!(report.is_identical());
}
