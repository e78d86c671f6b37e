/*
 * Autodeck CLI - Rust Edition
 * Copyright (c) 2024 Autodeck Contributors
 *
 * This work is licensed under the Creative Commons Attribution-NonCommercial 4.0 International License.
 * To view a copy of this license, visit http://creativecommons.org/licenses/by-nc/4.0/
 *
 * You are free to share and adapt this work for non-commercial purposes with attribution.
 * Commercial use is prohibited without explicit written permission.
 *
 * For commercial licensing inquiries, please contact the project maintainers.
 */

//! Reads meeting transcripts from `.txt` and `.docx` files.

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::types::{AutodeckError, AutodeckResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    PlainText,
    Docx,
}

impl TranscriptFormat {
    /// Format by file extension, case-insensitive.
    pub fn from_name(name: &str) -> AutodeckResult<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => Ok(TranscriptFormat::PlainText),
            "docx" => Ok(TranscriptFormat::Docx),
            _ => Err(AutodeckError::UnsupportedFileType(if ext.is_empty() { ext } else { format!(".{}", ext) })),
        }
    }
}

pub async fn ingest_transcript(path: &Path) -> AutodeckResult<String> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(AutodeckError::FileNotFound(path.to_path_buf()));
    }
    let format = TranscriptFormat::from_name(&path.to_string_lossy())?;
    let bytes = tokio::fs::read(path).await?;
    tracing::info!("Read {} bytes of transcript from {}", bytes.len(), path.display());
    decode(format, bytes)
}

/// Same dispatch for uploads already held in memory.
pub fn ingest_bytes(file_name: &str, bytes: Vec<u8>) -> AutodeckResult<String> {
    let format = TranscriptFormat::from_name(file_name)?;
    decode(format, bytes)
}

fn decode(format: TranscriptFormat, bytes: Vec<u8>) -> AutodeckResult<String> {
    match format {
        TranscriptFormat::PlainText => String::from_utf8(bytes)
            .map_err(|e| AutodeckError::MalformedDocument(format!("transcript is not valid UTF-8: {}", e))),
        TranscriptFormat::Docx => read_docx(&bytes),
    }
}

/// Paragraph text of `word/document.xml`, one paragraph per line.
pub fn read_docx(bytes: &[u8]) -> AutodeckResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AutodeckError::MalformedDocument(format!("not a .docx archive: {}", e)))?;
    let mut document = archive.by_name("word/document.xml")
        .map_err(|e| AutodeckError::MalformedDocument(format!("missing word/document.xml: {}", e)))?;

    let mut xml = String::new();
    document.read_to_string(&mut xml)?;
    document_xml_to_text(&xml)
}

/// Text of every `<w:p>` in document order, joined by `\n`. Runs inside
/// `<w:t>` are concatenated, `<w:tab/>` becomes a tab and `<w:br/>` a newline.
pub fn document_xml_to_text(xml: &str) -> AutodeckResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        let event = reader.read_event()
            .map_err(|e| AutodeckError::MalformedDocument(format!("invalid document.xml: {}", e)))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_run(&mut current, "\t"),
                b"w:br" => push_run(&mut current, "\n"),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape()
                    .map_err(|e| AutodeckError::MalformedDocument(format!("bad text run: {}", e)))?;
                push_run(&mut current, &text);
            }
            Event::CData(c) if in_text => push_run(&mut current, &String::from_utf8_lossy(&c)),
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.extend(current.take()),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!("Extracted {} paragraphs from document.xml", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

fn push_run(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}
