use std::fs;
use stylebridge_canvas::{
    CanvasDocument, CanvasElement, ColorPaletteEntry, ColorUsage, ElementType, FlexDirection,
    LayoutSpec, TokenCategory,
};
use stylebridge_common::RealFileSystem;
use stylebridge_compiler_css::{
    generate, write_stylesheets, GenerateOptions, COMPONENTS_CSS, LAYOUTS_CSS, TOKENS_CSS,
    UTILITIES_CSS,
};

fn design() -> CanvasDocument {
    let mut doc = CanvasDocument::new();
    doc.design_tokens
        .insert(TokenCategory::Colors, "brand", "#3366ff");
    doc.design_tokens
        .insert(TokenCategory::Spacing, "space-md", "16px");
    doc.color_palette
        .push(ColorPaletteEntry::new("brand", "#3366ff", ColorUsage::Token));

    doc.elements.push(
        CanvasElement::new("card", ElementType::Group, ".card")
            .with_size(320.0, 200.0)
            .with_layout(LayoutSpec::flexbox(FlexDirection::Column))
            .with_style("fill", "#eee")
            .with_position(40.0, 40.0),
    );
    doc.elements.push(
        CanvasElement::new("title", ElementType::Text, ".card .title")
            .with_content("Title")
            .with_style("fontSize", "20px")
            .with_style("fontWeight", "600")
            .with_position(56.0, 56.0),
    );
    doc.elements.push(
        CanvasElement::new("cta", ElementType::Rectangle, ".card .cta")
            .with_content("Go")
            .with_style("fill", "#3366ff")
            .with_position(56.0, 100.0),
    );
    doc.assign_to_layer("title", "layer-1").unwrap();
    doc.assign_to_layer("cta", "layer-1").unwrap();
    doc
}

#[test]
fn test_generation_is_idempotent() {
    let doc = design();
    let first = generate(&doc, &GenerateOptions::default()).unwrap();
    let second = generate(&doc, &GenerateOptions::default()).unwrap();
    assert_eq!(first, second);

    // A persisted and reloaded document regenerates the same bytes
    let reloaded = CanvasDocument::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(generate(&reloaded, &GenerateOptions::default()).unwrap(), first);
}

#[test]
fn test_generated_content() {
    let sheets = generate(&design(), &GenerateOptions::default()).unwrap();

    let tokens = sheets.get(TOKENS_CSS).unwrap();
    assert!(tokens.contains("--color-brand: #3366ff;"));
    assert!(tokens.contains("--spacing-space-md: 16px;"));

    let components = sheets.get(COMPONENTS_CSS).unwrap();
    assert!(components.contains(".card {\n  display: flex;\n  flex-direction: column;"));
    assert!(components.contains(".card .cta:hover {"));
    assert!(components.contains(".card .title {\n  font-size: 20px;\n  font-weight: 600;\n}\n"));

    let layouts = sheets.get(LAYOUTS_CSS).unwrap();
    assert!(layouts.contains(".card {\n  display: flex;\n  flex-direction: column;\n}\n"));
    // title and cta share x, so the layer stacks as a column
    assert!(layouts.contains(".layer-layer-1 {\n  display: flex;\n  flex-direction: column;\n  gap: 8px;\n}\n"));
    assert!(layouts.contains("@media (max-width: 768px)"));
    assert!(layouts.contains("@media (max-width: 1024px)"));

    let utilities = sheets.get(UTILITIES_CSS).unwrap();
    assert!(utilities.contains(".bg-brand {"));
    assert!(utilities.contains(".font-size-20px {"));
    assert!(utilities.contains(".font-weight-600 {"));
}

#[test]
fn test_write_to_disk_twice_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("src").join("styles");
    let sheets = generate(&design(), &GenerateOptions::default()).unwrap();

    let written = write_stylesheets(&RealFileSystem, &out, &sheets).unwrap();
    assert_eq!(written.len(), sheets.len());
    let before: Vec<String> = written
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();

    write_stylesheets(&RealFileSystem, &out, &sheets).unwrap();
    let after: Vec<String> = written
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    assert_eq!(before, after);
    assert!(!out.join("components.css.tmp").exists());
}
