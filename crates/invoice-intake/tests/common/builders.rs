//! Test documents and fake collaborators.

#![allow(dead_code)]

use std::io;
use std::path::Path;
use std::sync::Mutex;

use invoice_intake::error::{ExtractError, SinkError};
use invoice_intake::{
    FileMover, IntakeRecord, ProgressEvent, ProgressReporter, RecordSink, Stage, TextBackend,
};

/// Text of a complete invoice: number, US-style date and total, no vendor.
pub const REFERENCE_INVOICE_TEXT: &str =
    "Invoice Number: INV-55 Invoice Date: 02/13/2026 Total: $123.45";

/// Builds a one-page PDF with each line of `text` as a separate text run.
pub fn text_pdf(text: &str) -> Vec<u8> {
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.new_object_id();
    let resources_id = doc.new_object_id();
    let content_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    doc.objects.insert(
        font_id,
        Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        }),
    );

    doc.objects.insert(
        resources_id,
        Object::Dictionary(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        }),
    );

    let content_stream = Stream::new(dictionary! {}, content_for(text).into_bytes());
    doc.objects.insert(content_id, Object::Stream(content_stream));

    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        }),
    );

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to serialize test PDF");
    buffer
}

fn content_for(text: &str) -> String {
    let mut content = String::from("BT\n/F1 10 Tf\n50 742 Td\n12 TL\n");
    for line in text.lines() {
        let escaped: String = line
            .chars()
            .map(|c| match c {
                '(' => "\\(".to_string(),
                ')' => "\\)".to_string(),
                '\\' => "\\\\".to_string(),
                c => c.to_string(),
            })
            .collect();
        content.push_str(&format!("({}) Tj T*\n", escaped));
    }
    content.push_str("ET\n");
    content
}

/// Backend that ignores the bytes and returns fixed text.
pub struct StaticTextBackend(pub &'static str);

impl TextBackend for StaticTextBackend {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(self.0.to_string())
    }
}

/// Mover that always fails, as if the source were locked by another process.
pub struct LockedMover;

impl FileMover for LockedMover {
    fn move_file(&self, _src: &Path, _dst: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "file is locked by another process",
        ))
    }
}

/// Sink whose every append fails.
pub struct FailingSink;

impl RecordSink for FailingSink {
    fn append(&self, _record: &IntakeRecord) -> Result<(), SinkError> {
        Err(SinkError::Poisoned)
    }
}

/// Collects progress events in arrival order.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Stage(stage) => Some(stage),
                ProgressEvent::Skipped { .. } => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
