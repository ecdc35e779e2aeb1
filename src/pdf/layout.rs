use crate::config::PageGeometry;
use crate::error::{Error, Stage};
use crate::fonts::FontPair;
use crate::model::Color;

pub(crate) const PT_PER_MM: f32 = 72.0 / 25.4;

/// Line advance per point of font size, in millimetres. An approximation, not font metrics.
pub(crate) const LINE_HEIGHT_FACTOR: f32 = 0.4;

/// Running draw position. `y` is measured in millimetres from the page top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCursor {
    pub y: f32,
    /// 1-based.
    pub page_index: usize,
}

/// One recorded drawing primitive. Coordinates are millimetres from the top-left
/// corner; text `y` is the baseline.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        bold: bool,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        width: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<Color>,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: usize,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// True when any single text draw contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Color,
}

impl TextStyle {
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            bold: false,
            color: Color::TEXT,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            size,
            bold: true,
            color: Color::TEXT,
        }
    }

    pub const fn color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub(crate) fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT_FACTOR
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Owns the page set and cursor for one render call and exposes the drawing primitives.
pub(crate) struct Canvas<'a> {
    geometry: PageGeometry,
    fonts: &'a FontPair,
    pages: Vec<Page>,
    target: usize,
    cursor: RenderCursor,
    stage: Stage,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(geometry: PageGeometry, fonts: &'a FontPair) -> Self {
        Self {
            geometry,
            fonts,
            pages: vec![Page::default()],
            target: 0,
            cursor: RenderCursor {
                y: geometry.margin_top,
                page_index: 1,
            },
            stage: Stage::Banner,
        }
    }

    pub(crate) fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub(crate) fn cursor(&self) -> RenderCursor {
        self.cursor
    }

    pub(crate) fn y(&self) -> f32 {
        self.cursor.y
    }

    pub(crate) fn set_y(&mut self, y: f32) {
        self.cursor.y = y;
    }

    pub(crate) fn advance(&mut self, dy: f32) {
        self.cursor.y += dy;
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Direct subsequent draws at an earlier page (0-based); used by the footer sweep.
    pub(crate) fn select_page(&mut self, index: usize) {
        self.target = index.min(self.pages.len() - 1);
    }

    pub(crate) fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.target = self.pages.len() - 1;
        self.cursor.page_index += 1;
        self.cursor.y = self.geometry.margin_top;
        log::debug!("page break → page {}", self.cursor.page_index);
    }

    /// Start a new page when a block of `required` height would cross the bottom margin.
    /// A block taller than a whole page is left to overflow rather than break forever.
    pub(crate) fn ensure_page_space(&mut self, required: f32) -> bool {
        let at_top = (self.cursor.y - self.geometry.margin_top).abs() < f32::EPSILON;
        if self.cursor.y + required > self.geometry.usable_bottom() && !at_top {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn check(&self, what: &str, coords: &[f32], extents: &[f32]) -> Result<(), Error> {
        if coords.iter().chain(extents).any(|v| !v.is_finite()) {
            return Err(Error::layout(self.stage, format!("non-finite geometry in {what}")));
        }
        if extents.iter().any(|v| *v < 0.0) {
            return Err(Error::layout(self.stage, format!("negative extent in {what}")));
        }
        Ok(())
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.target].ops.push(op);
    }

    /// Advance width of `text` in millimetres.
    pub(crate) fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        self.fonts.face(bold).text_width(text, size) / PT_PER_MM
    }

    /// Greedy word wrap to `max_width`. Newlines force breaks; words wider than
    /// the line are split between characters.
    pub(crate) fn split_text(
        &self,
        text: &str,
        max_width: f32,
        size: f32,
        bold: bool,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                if self.text_width(word, size, bold) > max_width {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    for ch in word.chars() {
                        let mut candidate = current.clone();
                        candidate.push(ch);
                        if !current.is_empty()
                            && self.text_width(&candidate, size, bold) > max_width
                        {
                            lines.push(std::mem::take(&mut current));
                            current.push(ch);
                        } else {
                            current = candidate;
                        }
                    }
                    continue;
                }
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if !current.is_empty() && self.text_width(&candidate, size, bold) > max_width {
                    lines.push(std::mem::replace(&mut current, word.to_string()));
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Single unwrapped line; `align` positions the text relative to `x`.
    pub(crate) fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: TextStyle,
        align: Align,
    ) -> Result<(), Error> {
        self.check("text", &[x, y], &[style.size])?;
        let x = match align {
            Align::Left => x,
            Align::Center => x - self.text_width(text, style.size, style.bold) / 2.0,
            Align::Right => x - self.text_width(text, style.size, style.bold),
        };
        self.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            size: style.size,
            bold: style.bold,
            color: style.color,
        });
        Ok(())
    }

    /// Draw `text` wrapped to `max_width`; returns `y` advanced by
    /// `line_count × size × LINE_HEIGHT_FACTOR`.
    pub(crate) fn draw_wrapped_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        max_width: f32,
        style: TextStyle,
    ) -> Result<f32, Error> {
        self.check("wrapped text", &[x, y], &[max_width, style.size])?;
        let lines = self.split_text(text, max_width, style.size, style.bold);
        let line_h = style.line_height();
        for (i, line) in lines.iter().enumerate() {
            if !line.is_empty() {
                self.draw_text(line, x, y + i as f32 * line_h, style, Align::Left)?;
            }
        }
        Ok(y + lines.len() as f32 * line_h)
    }

    pub(crate) fn draw_rule(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
    ) -> Result<(), Error> {
        self.check("rule", &[x1, y1, x2, y2], &[])?;
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width: 0.3,
        });
        Ok(())
    }

    pub(crate) fn draw_box(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<Color>,
    ) -> Result<(), Error> {
        self.check("box", &[x, y], &[width, height])?;
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
        Ok(())
    }

    pub(crate) fn draw_image(
        &mut self,
        image: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), Error> {
        self.check("image", &[x, y], &[width, height])?;
        self.push(DrawOp::Image {
            x,
            y,
            width,
            height,
            image,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(fonts: &FontPair) -> Canvas<'_> {
        Canvas::new(PageGeometry::A4, fonts)
    }

    #[test]
    fn wrapped_text_advances_by_line_count() {
        let fonts = FontPair::helvetica();
        let mut c = canvas(&fonts);
        let y = c
            .draw_wrapped_text("short", 15.0, 50.0, 180.0, TextStyle::regular(10.0))
            .unwrap();
        assert!((y - 54.0).abs() < 1e-4);

        let long = "word ".repeat(80);
        let lines = c.split_text(&long, 60.0, 10.0, false).len();
        assert!(lines > 1);
        let y = c
            .draw_wrapped_text(&long, 15.0, 50.0, 60.0, TextStyle::regular(10.0))
            .unwrap();
        assert!((y - (50.0 + lines as f32 * 4.0)).abs() < 1e-3);
    }

    #[test]
    fn split_respects_width_and_newlines() {
        let fonts = FontPair::helvetica();
        let c = canvas(&fonts);
        let lines = c.split_text("alpha beta gamma delta epsilon", 25.0, 10.0, false);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(c.text_width(line, 10.0, false) <= 25.0, "{line}");
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta epsilon");

        assert_eq!(c.split_text("a\nb", 100.0, 10.0, false), ["a", "b"]);
        assert_eq!(c.split_text("", 100.0, 10.0, false), [""]);
    }

    #[test]
    fn overlong_word_is_broken_between_chars() {
        let fonts = FontPair::helvetica();
        let c = canvas(&fonts);
        let word = "A".repeat(60);
        let lines = c.split_text(&word, 30.0, 10.0, false);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn page_break_resets_cursor_to_top_margin() {
        let fonts = FontPair::helvetica();
        let mut c = canvas(&fonts);
        c.set_y(200.0);
        assert!(!c.ensure_page_space(50.0));
        assert_eq!(c.cursor().page_index, 1);

        c.set_y(260.0);
        assert!(c.ensure_page_space(20.0));
        assert_eq!(
            c.cursor(),
            RenderCursor {
                y: PageGeometry::A4.margin_top,
                page_index: 2
            }
        );
        assert_eq!(c.page_count(), 2);
    }

    #[test]
    fn oversized_block_at_page_top_does_not_break() {
        let fonts = FontPair::helvetica();
        let mut c = canvas(&fonts);
        assert!(!c.ensure_page_space(400.0));
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn invalid_geometry_is_a_layout_error() {
        let fonts = FontPair::helvetica();
        let mut c = canvas(&fonts);
        c.set_stage(Stage::Section);
        let err = c.draw_box(0.0, f32::NAN, 10.0, 10.0, None, None).unwrap_err();
        assert!(matches!(err, Error::Layout { stage: Stage::Section, .. }));
        assert!(c.draw_box(0.0, 0.0, -1.0, 10.0, None, None).is_err());
        assert!(c.draw_rule(0.0, 0.0, f32::INFINITY, 0.0, Color::BORDER).is_err());
    }

    #[test]
    fn aligned_text_is_positioned_by_width() {
        let fonts = FontPair::helvetica();
        let mut c = canvas(&fonts);
        let w = c.text_width("Page 1 of 3", 8.0, false);
        c.draw_text("Page 1 of 3", 100.0, 10.0, TextStyle::regular(8.0), Align::Right)
            .unwrap();
        match &c.into_pages()[0].ops()[0] {
            DrawOp::Text { x, .. } => assert!((x - (100.0 - w)).abs() < 1e-4),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn selected_page_receives_draws() {
        let fonts = FontPair::helvetica();
        let mut c = canvas(&fonts);
        c.set_y(280.0);
        c.ensure_page_space(10.0);
        c.select_page(0);
        c.draw_text("first", 10.0, 10.0, TextStyle::regular(8.0), Align::Left)
            .unwrap();
        let pages = c.into_pages();
        assert!(pages[0].contains_text("first"));
        assert!(!pages[1].contains_text("first"));
    }
}
