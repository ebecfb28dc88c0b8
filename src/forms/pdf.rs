//! Serializes a laid-out form into PDF bytes.
//!
//! The output carries no creation date or document id, so identical layouts
//! produce identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::common::{to_win_ansi, Font};
use super::layout::{Color, LaidOutDocument, TextItem, PAGE_HEIGHT, PAGE_WIDTH};
use super::RenderError;

const PDF_VERSION: &str = "1.5";

pub fn write_pdf(layout: &LaidOutDocument) -> Result<Vec<u8>, RenderError> {
    let mut document = Document::with_version(PDF_VERSION);
    let pages_id = document.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in [Font::Regular, Font::Bold] {
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = document.add_object(dictionary! { "Font" => fonts });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = page_content(&page.items);
        let stream = Stream::new(lopdf::Dictionary::new(), content.encode()?);
        let content_id = document.add_object(stream);
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes)?;
    Ok(bytes)
}

fn page_content(items: &[TextItem]) -> Content {
    let mut operations = Vec::with_capacity(items.len() * 5);
    let mut color = Color::Black;

    for item in items {
        if item.color != color {
            let (r, g, b) = item.color.rgb();
            operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            color = item.color;
        }
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![item.font.resource_name().into(), item.size.into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![item.x.into(), (PAGE_HEIGHT - item.baseline).into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(&item.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::layout::{LayoutBuilder, LineStyle};

    fn sample() -> LaidOutDocument {
        let style = LineStyle::new(Font::Regular, 12.0, 20.0);
        let mut builder = LayoutBuilder::new();
        builder
            .text("Heading", LineStyle::new(Font::Bold, 16.0, 28.0))
            .amount_row("Net", "-$5.00", style, Color::Red);
        builder.finish()
    }

    #[test]
    fn test_writes_pdf_header() {
        let bytes = write_pdf(&sample()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_output_is_reproducible() {
        let first = write_pdf(&sample()).unwrap();
        let second = write_pdf(&sample()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pages_round_trip_through_parser() {
        let bytes = write_pdf(&sample()).unwrap();
        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }

    #[test]
    fn test_color_switches_only_when_needed() {
        let ops = page_content(&sample().pages[0].items).operations;
        let color_ops: Vec<_> = ops.iter().filter(|op| op.operator == "rg").collect();
        assert_eq!(color_ops.len(), 1);
    }
}
