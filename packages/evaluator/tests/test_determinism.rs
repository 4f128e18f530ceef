/// Determinism tests - ingestion is a pure function of the stylesheet text
/// apart from element ids, which must be fresh on every parse.
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use stylebridge_canvas::{CanvasElement, ElementType};
use stylebridge_common::RealFileSystem;
use stylebridge_evaluator::{parse_file, parse_source, IngestError};

const SHEET: &str = r#"
:root {
  --brand-primary: #3366ff;
  --font-body: "Inter", sans-serif;
}

.card {
  display: flex;
  flex-direction: column;
  gap: 12px;
  background: #ffffff;
  border: 1px solid #e5e5e5;
  box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
}

.card .title { font-size: 20px; font-weight: 700; color: #111; }
.avatar { width: 48px; height: 48px; border-radius: 50%; background: #ccc; }
.cta { background: var(--brand-primary); color: white; padding: 8px 16px; }
"#;

/// Fields derived from CSS, without the id
fn derived(elements: &[CanvasElement]) -> Vec<(String, ElementType, String)> {
    elements
        .iter()
        .map(|e| {
            (
                e.css_selector.clone(),
                e.element_type,
                format!("{:?}|{:?}|{:?}|{:?}", e.size, e.style, e.layout, e.content),
            )
        })
        .collect()
}

#[test]
fn test_ingestion_is_deterministic_except_ids() {
    let runs: Vec<_> = (0..10)
        .map(|_| parse_source(SHEET, Path::new("app.css")).expect("ingestion failed"))
        .collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(
            derived(&runs[0].elements),
            derived(&run.elements),
            "Run {} differs from run 0",
            i
        );
        assert_eq!(runs[0].tokens, run.tokens);
    }

    let ids: HashSet<&str> = runs
        .iter()
        .flat_map(|r| r.elements.iter().map(|e| e.id.as_str()))
        .collect();
    assert_eq!(ids.len(), runs.len() * runs[0].elements.len());
}

#[test]
fn test_element_types_from_realistic_sheet() {
    let file = parse_source(SHEET, Path::new("app.css")).unwrap();
    let types: Vec<(&str, ElementType)> = file
        .elements
        .iter()
        .map(|e| (e.css_selector.as_str(), e.element_type))
        .collect();

    assert_eq!(
        types,
        vec![
            (".card", ElementType::Group),
            (".card .title", ElementType::Text),
            (".avatar", ElementType::Circle),
            (".cta", ElementType::Rectangle),
        ]
    );

    let card = &file.elements[0];
    assert_eq!(card.style.get("stroke").map(String::as_str), Some("#e5e5e5"));
    assert_eq!(
        card.style.get("shadow").map(String::as_str),
        Some("0 2px 4px rgba(0, 0, 0, 0.1)")
    );

    let avatar = &file.elements[2];
    assert_eq!(avatar.size.width, 48.0);
    assert_eq!(avatar.size.height, 48.0);

    assert_eq!(file.tokens.colors.get("brand-primary").map(String::as_str), Some("#3366ff"));
    assert!(file.tokens.typography.contains_key("font-body"));
}

#[test]
fn test_parse_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.css");
    fs::write(&path, SHEET).unwrap();

    let file = parse_file(&RealFileSystem, &path).unwrap();
    assert_eq!(file.path, path.to_string_lossy());
    assert!(file.elements.iter().all(|e| e.is_from(&file.path)));
}

#[test]
fn test_parse_error_keeps_source_for_reporting() {
    let err = parse_source(".a { color: red; } }", Path::new("bad.css")).unwrap_err();
    match err {
        IngestError::Parse { source_text, .. } => assert!(source_text.contains(".a")),
        other => panic!("expected parse error, got {:?}", other),
    }
}
