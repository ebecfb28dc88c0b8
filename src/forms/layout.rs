//! Page layout for the forms.
//!
//! `LayoutBuilder` flows lines top to bottom on US Letter pages and starts a
//! new page when the next line would cross the bottom margin. Positions are
//! measured in points from the top-left corner; the PDF writer flips them.

use super::common::{text_width, Font};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;
/// Right edge of the amount column.
pub const AMOUNT_COLUMN_RIGHT: f32 = PAGE_WIDTH - MARGIN;
/// Minimum space between a row label and its amount.
pub const COLUMN_GUTTER: f32 = 12.0;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
}

impl Color {
    pub fn rgb(self) -> (f32, f32, f32) {
        match self {
            Color::Black => (0.0, 0.0, 0.0),
            Color::Red => (1.0, 0.0, 0.0),
        }
    }
}

/// One run of text placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    /// Baseline, measured from the top of the page.
    pub baseline: f32,
    pub font: Font,
    pub size: f32,
    pub color: Color,
}

impl TextItem {
    pub fn right_edge(&self) -> f32 {
        self.x + text_width(&self.text, self.font, self.size)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<TextItem>,
}

/// The laid-out pages of one form.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &TextItem> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    /// First item whose text is exactly `text`.
    pub fn find(&self, text: &str) -> Option<&TextItem> {
        self.items().find(|item| item.text == text)
    }

    /// Text of every item in reading order.
    pub fn texts(&self) -> Vec<&str> {
        self.items().map(|item| item.text.as_str()).collect()
    }
}

/// Typography of one kind of line.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub font: Font,
    pub size: f32,
    /// Vertical space the line takes, including leading.
    pub height: f32,
}

impl LineStyle {
    pub const fn new(font: Font, size: f32, height: f32) -> Self {
        Self { font, size, height }
    }
}

pub struct LayoutBuilder {
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Page::default(),
            cursor: MARGIN,
        }
    }

    /// A line of left-aligned text.
    pub fn text(&mut self, text: &str, style: LineStyle) -> &mut Self {
        let baseline = self.reserve(style.height) + style.size;
        self.current.items.push(TextItem {
            text: text.to_string(),
            x: MARGIN,
            baseline,
            font: style.font,
            size: style.size,
            color: Color::Black,
        });
        self
    }

    /// A label on the left and an amount right-aligned to the amount column.
    pub fn amount_row(
        &mut self,
        label: &str,
        amount: &str,
        style: LineStyle,
        amount_color: Color,
    ) -> &mut Self {
        let baseline = self.reserve(style.height) + style.size;
        let amount_x = AMOUNT_COLUMN_RIGHT - text_width(amount, style.font, style.size);
        let label = fit_label(label, amount_x - COLUMN_GUTTER - MARGIN, style);

        self.current.items.push(TextItem {
            text: label,
            x: MARGIN,
            baseline,
            font: style.font,
            size: style.size,
            color: Color::Black,
        });
        self.current.items.push(TextItem {
            text: amount.to_string(),
            x: amount_x,
            baseline,
            font: style.font,
            size: style.size,
            color: amount_color,
        });
        self
    }

    /// Vertical whitespace. Dropped at a page break.
    pub fn gap(&mut self, height: f32) -> &mut Self {
        if self.cursor + height > PAGE_HEIGHT - MARGIN {
            self.break_page();
        } else {
            self.cursor += height;
        }
        self
    }

    pub fn finish(mut self) -> LaidOutDocument {
        self.pages.push(self.current);
        LaidOutDocument { pages: self.pages }
    }

    /// Claim `height` points for the next line and return its top.
    fn reserve(&mut self, height: f32) -> f32 {
        if self.cursor + height > PAGE_HEIGHT - MARGIN && !self.current.items.is_empty() {
            self.break_page();
        }
        let top = self.cursor;
        self.cursor += height;
        top
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = MARGIN;
    }
}

/// Shorten `label` with a trailing ellipsis until it fits in `max_width`.
fn fit_label(label: &str, max_width: f32, style: LineStyle) -> String {
    if text_width(label, style.font, style.size) <= max_width {
        return label.to_string();
    }

    let budget = max_width - text_width(ELLIPSIS, style.font, style.size);
    let mut fitted = String::new();
    let mut width = 0.0;
    for ch in label.chars() {
        let ch_width = text_width(ch.encode_utf8(&mut [0; 4]), style.font, style.size);
        if width + ch_width > budget {
            break;
        }
        width += ch_width;
        fitted.push(ch);
    }
    format!("{}{}", fitted.trim_end(), ELLIPSIS)
}

impl Default for LayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}
