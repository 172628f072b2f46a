#![allow(dead_code)]

use std::path::Path;

use injury_report_engine::RawGrid;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Writes a text-only PDF, one line of monospaced text per entry. Cells
/// are separated by two spaces the way report PDFs lay them out.
pub fn write_report_pdf(
    path: &Path,
    pages: &[Vec<&str>],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::with_capacity(pages.len());
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 9.into()]),
            Operation::new("TL", vec![12.into()]),
            Operation::new("Td", vec![20.into(), 560.into()]),
        ];
        for (index, line) in lines.iter().enumerate() {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            if index + 1 < lines.len() {
                operations.push(Operation::new("T*", vec![]));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }));
    }

    // Landscape, like the league's report.
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}

pub fn grid(rows: &[&[&str]]) -> RawGrid {
    rows.iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

pub const REPORT_HEADER: &[&str] = &[
    "Game Date",
    "Game Time",
    "Matchup",
    "Team",
    "Player Name",
    "Current Status",
    "Reason",
];
