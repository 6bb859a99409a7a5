//! Minimal single-page PDF drawing on top of `lopdf`
//!
//! [`Canvas`] collects content-stream operations in PDF user space (points,
//! origin bottom-left); [`Canvas::finish`] wraps them in a one-page document
//! with the two standard Helvetica faces and returns the encoded bytes.

use super::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Standard Type1 faces available to every canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// RGB colour with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

    pub const fn gray(level: f32) -> Rgb {
        Rgb(level, level, level)
    }

    fn operands(self) -> Vec<Object> {
        vec![self.0.into(), self.1.into(), self.2.into()]
    }
}

/// Keep text within what the standard fonts can encode
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{20B9}' => out.push_str("Rs."),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Rough Helvetica advance width, good enough for centering and clipping
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | '\'' | '|' | ' ' | ':' | ';' | '!' => 0.28,
            'm' | 'w' | 'M' | 'W' => 0.83,
            c if c.is_ascii_uppercase() => 0.67,
            c if c.is_ascii_digit() => 0.556,
            _ => 0.5,
        })
        .sum::<f32>()
        * size
}

/// Cut `text` so it fits into `max_width`, marking the cut with "..."
pub fn fit_text(text: &str, size: f32, max_width: f32) -> String {
    let text = sanitize(text);
    if text_width(&text, size) <= max_width {
        return text;
    }
    let mut cut = text.clone();
    while !cut.is_empty() && text_width(&format!("{}...", cut), size) > max_width {
        cut.pop();
    }
    format!("{}...", cut.trim_end())
}

/// Greedy word wrap against `max_width`
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in sanitize(text).split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if text_width(&candidate, size) > max_width && !line.is_empty() {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// A single page being drawn
#[derive(Debug)]
pub struct Canvas {
    width: f32,
    height: f32,
    operations: Vec<Operation>,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            operations: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    /// Filled rectangle, `(x, y)` is the bottom-left corner
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.op("q", vec![]);
        self.op("rg", color.operands());
        self.op("re", vec![x.into(), y.into(), w.into(), h.into()]);
        self.op("f", vec![]);
        self.op("Q", vec![]);
    }

    /// Outlined rectangle
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, color: Rgb) {
        self.op("q", vec![]);
        self.op("RG", color.operands());
        self.op("w", vec![line_width.into()]);
        self.op("re", vec![x.into(), y.into(), w.into(), h.into()]);
        self.op("S", vec![]);
        self.op("Q", vec![]);
    }

    /// Straight line
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), line_width: f32, color: Rgb) {
        self.op("q", vec![]);
        self.op("RG", color.operands());
        self.op("w", vec![line_width.into()]);
        self.op("m", vec![from.0.into(), from.1.into()]);
        self.op("l", vec![to.0.into(), to.1.into()]);
        self.op("S", vec![]);
        self.op("Q", vec![]);
    }

    /// Text with its baseline starting at `(x, y)`
    pub fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str, color: Rgb) {
        self.text_matrix(font, size, [1.0, 0.0, 0.0, 1.0, x, y], text, color);
    }

    /// Text centered horizontally on `center_x`
    pub fn text_centered(
        &mut self,
        font: Font,
        size: f32,
        center_x: f32,
        y: f32,
        text: &str,
        color: Rgb,
    ) {
        let text = sanitize(text);
        let x = center_x - text_width(&text, size) / 2.0;
        self.text(font, size, x, y, &text, color);
    }

    /// Text whose right edge ends at `right_x`
    pub fn text_right(&mut self, font: Font, size: f32, right_x: f32, y: f32, text: &str, color: Rgb) {
        let text = sanitize(text);
        let x = right_x - text_width(&text, size);
        self.text(font, size, x, y, &text, color);
    }

    /// Text rotated by `degrees` counter-clockwise around its origin
    pub fn text_rotated(
        &mut self,
        font: Font,
        size: f32,
        x: f32,
        y: f32,
        degrees: f32,
        text: &str,
        color: Rgb,
    ) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.text_matrix(font, size, [cos, sin, -sin, cos, x, y], text, color);
    }

    fn text_matrix(&mut self, font: Font, size: f32, matrix: [f32; 6], text: &str, color: Rgb) {
        let text = sanitize(text);
        if text.is_empty() {
            return;
        }
        self.op("q", vec![]);
        self.op("rg", color.operands());
        self.op("BT", vec![]);
        self.op("Tf", vec![font.resource_name().into(), size.into()]);
        self.op("Tm", matrix.iter().map(|v| (*v).into()).collect());
        self.op("Tj", vec![Object::string_literal(text)]);
        self.op("ET", vec![]);
        self.op("Q", vec![]);
    }

    /// Number of drawing operations so far
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Encode the page into a complete PDF document
    pub fn finish(self, title: &str) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let content = Content {
            operations: self.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => Object::Integer(1),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                self.width.into(),
                self.height.into(),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(sanitize(title)),
            "Producer" => Object::string_literal("ngo-portal"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::Encoding(e.to_string()))?;

        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(bytes)
    }
}
