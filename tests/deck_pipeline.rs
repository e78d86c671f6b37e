use std::io::{Cursor, Write};
use std::sync::Arc;

use autodeck::classifier::KeywordClassifier;
use autodeck::config::{Config, OutputFormat};
use autodeck::extraction::LeadSentenceSummarizer;
use autodeck::pipeline::DeckGenerator;
use autodeck::render::{renderer_for, write_deck};
use autodeck::types::{AutodeckError, SlideKind};

const TRANSCRIPT: &str = "\
Hello everyone, my name is Dana Whitfield and I run operations at Acme.

Our goal is to improve visibility into orders. We want to grow online sales.

The biggest problem is that reporting is slow and manual, and errors creep in.

Next step: set up database schema - orders and customers; Build REST API: order endpoints; Deploy to cloud; Train support staff
";

fn generator(config: Config) -> DeckGenerator {
    DeckGenerator::new(config, Arc::new(KeywordClassifier::new()), Arc::new(LeadSentenceSummarizer))
}

fn test_config(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.output_dir = dir.join("decks");
    config.log_dir = dir.join("logs");
    config.planner.phase_count = 3;
    config
}

#[tokio::test]
async fn test_generate_deck_from_text() {
    let dir = tempfile::tempdir().unwrap();
    let deck = generator(test_config(dir.path())).generate_from_text(TRANSCRIPT).await.unwrap();

    assert_eq!(deck.client_name, "Dana Whitfield and I run operations at Acme");
    assert_eq!(deck.phases.len(), 3);

    let kinds: Vec<_> = deck.slides.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![
        SlideKind::Cover,
        SlideKind::Objectives,
        SlideKind::PainPoints,
        SlideKind::PhasesOverview,
        SlideKind::Phase,
        SlideKind::Phase,
        SlideKind::Phase,
        SlideKind::ExpectedOutcomes,
        SlideKind::NextSteps,
    ]);

    let objectives = &deck.slides[1];
    assert_eq!(objectives.bullets, vec!["Our goal is to improve visibility into orders", "We want to grow online sales"]);

    let pain_points = &deck.slides[2];
    assert_eq!(pain_points.bullets.len(), 1);
    assert!(pain_points.bullets[0].starts_with("The biggest problem"));

    let overview = &deck.slides[3];
    assert_eq!(overview.bullets.len(), 3);
    assert!(overview.bullets[0].starts_with("Phase 1: Next step"));

    let next_steps = deck.slides.last().unwrap();
    assert_eq!(next_steps.bullets, vec!["Contact sales team", "Schedule follow-up meeting"]);
}

#[tokio::test]
async fn test_transcript_without_next_steps_has_no_phase_slides() {
    let dir = tempfile::tempdir().unwrap();
    let deck = generator(test_config(dir.path()))
        .generate_from_text("This is Globex.\n\nReporting is slow.")
        .await
        .unwrap();

    assert_eq!(deck.client_name, "Globex");
    assert!(deck.phases.is_empty());
    assert!(deck.slides.iter().all(|s| s.kind != SlideKind::Phase));
    assert!(deck.slides[3].bullets.is_empty());
}

#[tokio::test]
async fn test_generate_from_file_and_write_json() {
    let dir = tempfile::tempdir().unwrap();
    let transcript_path = dir.path().join("meeting.txt");
    std::fs::write(&transcript_path, TRANSCRIPT).unwrap();

    let mut config = test_config(dir.path());
    config.output_format = OutputFormat::Json;
    let generator = generator(config);

    let deck = generator.generate(&transcript_path).await.unwrap();
    let config = generator.config();
    assert_eq!(config.planner.phase_count, 3);
    let output = config.get_output_file(&deck.client_name);
    write_deck(renderer_for(config.output_format).as_ref(), &deck, &output).await.unwrap();

    assert_eq!(output.extension().and_then(|e| e.to_str()), Some("json"));
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["phases"].as_array().unwrap().len(), 3);
    assert_eq!(written["slides"][0]["kind"], "cover");
}

/// Minimal .docx container holding only `word/document.xml`.
fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs.iter()
        .map(|p| if p.is_empty() {
            r#"<w:p w:rsidR="00A1" w:rsidRDefault="00B2"/>"#.to_string()
        } else {
            format!(r#"<w:p w:rsidR="00C3"><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, p)
        })
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        writer.start_file("word/document.xml", zip::write::FileOptions::default()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    buffer.into_inner()
}

#[tokio::test]
async fn test_generate_deck_from_docx_with_empty_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meeting.docx");
    std::fs::write(&path, docx_bytes(&[
        "Hello, my name is Dana Whitfield.",
        "",
        "Our reporting is slow and manual.",
        "",
        "Our goal is to improve visibility into orders.",
        "",
        "Next step: deploy the dashboard; Train support staff",
    ])).unwrap();

    let deck = generator(test_config(dir.path())).generate(&path).await.unwrap();

    assert_eq!(deck.client_name, "Dana Whitfield");

    let pain_points = &deck.slides[2];
    assert_eq!(pain_points.kind, SlideKind::PainPoints);
    assert_eq!(pain_points.bullets.len(), 1);
    assert!(pain_points.bullets[0].starts_with("Our reporting is slow"));

    let objectives = &deck.slides[1];
    assert_eq!(objectives.bullets, vec!["Our goal is to improve visibility into orders"]);

    // a step without a description keeps its bare title
    let descriptions: Vec<_> = deck.phases.iter().map(|p| p.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Next step. deploy the dashboard", "Train support staff"]);
}

#[tokio::test]
async fn test_unsupported_transcript_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meeting.pdf");
    std::fs::write(&path, "irrelevant").unwrap();

    let result = generator(test_config(dir.path())).generate(&path).await;
    assert!(matches!(result, Err(AutodeckError::UnsupportedFileType(ext)) if ext == ".pdf"));
}

#[tokio::test]
async fn test_generation_is_deterministic_apart_from_identity() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(test_config(dir.path()));
    let first = generator.generate_from_text(TRANSCRIPT).await.unwrap();
    let second = generator.generate_from_text(TRANSCRIPT).await.unwrap();
    assert_eq!(first.phases, second.phases);
    assert_eq!(first.slides, second.slides);
    assert_ne!(first.id, second.id);
}
