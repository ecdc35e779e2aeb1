mod assemble;
mod layout;
mod sections;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeDelta};
use image::{ExtendedColorType, ImageDecoder};

use crate::config::{PageGeometry, RenderOptions};
use crate::error::{Error, Stage};
use crate::fonts::FontPair;
use crate::model::{Category, Color, PLACEHOLDER, ReportDocument, Subsection};

pub use layout::{DrawOp, Page, RenderCursor};
use layout::{Align, Canvas, TextStyle};

const BANNER_H: f32 = 42.0;
const SUBJECT_H: f32 = 36.0;
const CATEGORY_BAND_H: f32 = 10.0;
const SUBSECTION_BAND_H: f32 = 8.0;
/// Room reserved after a subsection band so its first block does not start on a sliver.
const SECTION_MIN_SPACE: f32 = 30.0;
const SECTION_GAP: f32 = 6.0;
const PHOTO_SIZE: f32 = 26.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ImageFormat {
    Jpeg,
    Png,
}

/// Colour model of the encoded samples; JPEG data is embedded as is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ColorModel {
    Gray,
    Rgb,
    Cmyk,
}

pub(crate) struct ImageResource {
    pub(crate) data: Vec<u8>,
    pub(crate) format: ImageFormat,
    pub(crate) color: ColorModel,
    pub(crate) pixel_width: u32,
    pub(crate) pixel_height: u32,
}

/// Read a subject photo; anything unreadable or not PNG/JPEG is skipped with a warning.
fn load_image(path: &str) -> Option<ImageResource> {
    let data = std::fs::read(path)
        .inspect_err(|e| log::warn!("Subject image {path}: {e}"))
        .ok()?;
    let reader = image::ImageReader::new(std::io::Cursor::new(&data))
        .with_guessed_format()
        .ok()?;
    let format = match reader.format() {
        Some(image::ImageFormat::Png) => ImageFormat::Png,
        Some(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
        other => {
            log::warn!("Subject image {path}: unsupported format {other:?}");
            return None;
        }
    };
    let decoder = reader
        .into_decoder()
        .inspect_err(|e| log::warn!("Subject image {path}: {e}"))
        .ok()?;
    let (pixel_width, pixel_height) = decoder.dimensions();
    let color = match decoder.original_color_type() {
        ExtendedColorType::L1
        | ExtendedColorType::L2
        | ExtendedColorType::L4
        | ExtendedColorType::L8
        | ExtendedColorType::L16 => ColorModel::Gray,
        ExtendedColorType::Cmyk8 => ColorModel::Cmyk,
        _ => ColorModel::Rgb,
    };
    drop(decoder);
    Some(ImageResource {
        data,
        format,
        color,
        pixel_width,
        pixel_height,
    })
}

/// The laid-out report: an ordered page set plus the resources needed to write it.
pub struct RenderedDocument {
    pages: Vec<Page>,
    images: Vec<ImageResource>,
    fonts: FontPair,
    geometry: PageGeometry,
    title: String,
    report_label: String,
    generated_at: DateTime<Local>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// 0-based page access.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    /// `{label}_{YYYY-MM-DD}.pdf` using the report label.
    pub fn default_file_name(&self) -> String {
        file_name(&self.report_label, self.generated_at)
    }

    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>, Error> {
        assemble::write_pdf(self)
    }

    /// Write the PDF into `dir` as `{filename_hint}_{YYYY-MM-DD}.pdf` and return its path.
    pub fn save(&self, dir: &Path, filename_hint: &str) -> Result<PathBuf, Error> {
        let path = dir.join(file_name(filename_hint, self.generated_at));
        let bytes = self.to_pdf_bytes()?;
        std::fs::write(&path, &bytes)?;
        log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

fn file_name(hint: &str, date: DateTime<Local>) -> String {
    let stem: String = hint
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':') {
                '_'
            } else {
                c
            }
        })
        .collect();
    let stem = if stem.is_empty() { "Report".to_string() } else { stem };
    format!("{stem}_{}.pdf", date.format("%Y-%m-%d"))
}

/// Lay out the whole report. Any primitive failure aborts the render; no partial
/// document is returned.
pub fn render(doc: &ReportDocument, options: &RenderOptions) -> Result<RenderedDocument, Error> {
    let t0 = std::time::Instant::now();
    let fonts = FontPair::load(options.font_family.as_deref());
    let generated_at = options.generation_time();

    let currency_symbol = fonts.currency_symbol(&options.currency_symbol);

    let mut images = Vec::new();
    let photo = doc.subject.image.as_deref().and_then(load_image).map(|img| {
        images.push(img);
        images.len() - 1
    });
    let t_resources = t0.elapsed();

    let mut canvas = Canvas::new(options.geometry, &fonts);

    canvas.set_stage(Stage::Banner);
    draw_banner(&mut canvas, doc, options, generated_at)?;
    canvas.set_stage(Stage::Subject);
    draw_subject(&mut canvas, doc, photo)?;

    for category in &doc.categories {
        canvas.set_stage(Stage::Category);
        draw_category_band(&mut canvas, category)?;
        for subsection in &category.subsections {
            canvas.set_stage(Stage::Category);
            draw_subsection_band(&mut canvas, subsection)?;
            canvas.set_stage(Stage::Section);
            canvas.ensure_page_space(SECTION_MIN_SPACE);
            let y = sections::render(&subsection.payload, &mut canvas, &currency_symbol)?;
            canvas.set_y(y + SECTION_GAP);
        }
    }
    let t_layout = t0.elapsed();
    log::debug!("Layout ended at {:?}", canvas.cursor());

    canvas.set_stage(Stage::Footer);
    stamp_footers(&mut canvas, doc, options)?;
    let pages = canvas.into_pages();
    let t_footers = t0.elapsed();

    log::info!(
        "Render phases: resources={:.1}ms, layout={:.1}ms, footers={:.1}ms ({} pages)",
        t_resources.as_secs_f64() * 1000.0,
        (t_layout - t_resources).as_secs_f64() * 1000.0,
        (t_footers - t_layout).as_secs_f64() * 1000.0,
        pages.len(),
    );

    Ok(RenderedDocument {
        pages,
        images,
        fonts,
        geometry: options.geometry,
        title: format!("{} - {}", options.report_label, doc.id),
        report_label: options.report_label.clone(),
        generated_at,
    })
}

fn draw_banner(
    canvas: &mut Canvas,
    doc: &ReportDocument,
    options: &RenderOptions,
    generated_at: DateTime<Local>,
) -> Result<(), Error> {
    let g = *canvas.geometry();
    let white = |size: f32, bold: bool| {
        let style = if bold {
            TextStyle::bold(size)
        } else {
            TextStyle::regular(size)
        };
        style.color(Color::WHITE)
    };
    canvas.draw_box(0.0, 0.0, g.width, BANNER_H, Some(options.brand_color), None)?;
    canvas.draw_text(&options.brand, g.margin_left, 14.0, white(18.0, true), Align::Left)?;
    canvas.draw_text(&options.report_label, g.margin_left, 24.0, white(13.0, true), Align::Left)?;
    canvas.draw_text(
        &format!("Report ID: {}", doc.id),
        g.margin_left,
        32.0,
        white(9.0, false),
        Align::Left,
    )?;

    let right = g.width - g.margin_right;
    let valid_until = TimeDelta::try_days(options.validity_days)
        .and_then(|days| generated_at.checked_add_signed(days))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| {
            log::warn!("Validity of {} days is out of range", options.validity_days);
            PLACEHOLDER.to_string()
        });
    canvas.draw_text(
        &format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M")),
        right,
        14.0,
        white(9.0, false),
        Align::Right,
    )?;
    canvas.draw_text(
        &format!("Valid until: {valid_until}"),
        right,
        20.0,
        white(9.0, false),
        Align::Right,
    )?;
    canvas.set_y(BANNER_H + 8.0);
    Ok(())
}

fn draw_subject(
    canvas: &mut Canvas,
    doc: &ReportDocument,
    photo: Option<usize>,
) -> Result<(), Error> {
    let g = *canvas.geometry();
    let (x, y, w) = (g.margin_left, canvas.y(), g.content_width());
    canvas.draw_box(x, y, w, SUBJECT_H, Some(Color::BAND_FILL), Some(Color::BORDER))?;
    canvas.draw_text(
        "Subject Information",
        x + 4.0,
        y + 7.0,
        TextStyle::bold(12.0).color(Color::BRAND),
        Align::Left,
    )?;

    let subject = &doc.subject;
    let score = subject
        .score
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let status = doc.display_status().unwrap_or(PLACEHOLDER);
    let label = TextStyle::bold(9.0).color(Color::MUTED);
    let value = TextStyle::regular(10.0);

    let left: [(&str, &str, TextStyle); 3] = [
        ("Name:", subject.name.as_deref().unwrap_or(PLACEHOLDER), value),
        ("Email:", subject.email.as_deref().unwrap_or(PLACEHOLDER), value),
        ("Score:", &score, TextStyle::bold(10.0).color(Color::BRAND)),
    ];
    let right: [(&str, &str, TextStyle); 2] = [
        (
            "Completed:",
            doc.completion_date.as_deref().unwrap_or(PLACEHOLDER),
            value,
        ),
        (
            "Status:",
            status,
            TextStyle::bold(10.0).color(Color::for_status(status, "Completed")),
        ),
    ];
    for (i, (name, text, style)) in left.iter().enumerate() {
        let row_y = y + 15.0 + i as f32 * 7.0;
        canvas.draw_text(name, x + 4.0, row_y, label, Align::Left)?;
        canvas.draw_text(text, x + 22.0, row_y, *style, Align::Left)?;
    }
    let col_x = x + w / 2.0;
    for (i, (name, text, style)) in right.iter().enumerate() {
        let row_y = y + 15.0 + i as f32 * 7.0;
        canvas.draw_text(name, col_x, row_y, label, Align::Left)?;
        canvas.draw_text(text, col_x + 22.0, row_y, *style, Align::Left)?;
    }

    if let Some(image) = photo {
        let px = x + w - PHOTO_SIZE - 4.0;
        canvas.draw_image(image, px, y + (SUBJECT_H - PHOTO_SIZE) / 2.0, PHOTO_SIZE, PHOTO_SIZE)?;
    }

    canvas.set_y(y + SUBJECT_H + 8.0);
    Ok(())
}

fn draw_category_band(canvas: &mut Canvas, category: &Category) -> Result<(), Error> {
    canvas.ensure_page_space(CATEGORY_BAND_H + SUBSECTION_BAND_H + SECTION_MIN_SPACE);
    let g = *canvas.geometry();
    let (x, y, w) = (g.margin_left, canvas.y(), g.content_width());
    canvas.draw_box(x, y, w, CATEGORY_BAND_H, Some(Color::BRAND), None)?;
    canvas.draw_text(
        &category.name,
        x + 4.0,
        y + 7.0,
        TextStyle::bold(12.0).color(Color::WHITE),
        Align::Left,
    )?;
    let status = category.status.as_deref().unwrap_or(PLACEHOLDER);
    canvas.draw_text(
        &format!("Status: {status}"),
        x + w - 4.0,
        y + 7.0,
        TextStyle::regular(9.0).color(Color::WHITE),
        Align::Right,
    )?;
    canvas.set_y(y + CATEGORY_BAND_H + 4.0);
    Ok(())
}

fn draw_subsection_band(canvas: &mut Canvas, subsection: &Subsection) -> Result<(), Error> {
    canvas.ensure_page_space(SUBSECTION_BAND_H + SECTION_MIN_SPACE);
    let g = *canvas.geometry();
    let (x, y, w) = (g.margin_left, canvas.y(), g.content_width());
    canvas.draw_box(x, y, w, SUBSECTION_BAND_H, Some(Color::BAND_FILL), None)?;
    canvas.draw_rule(x, y, x, y + SUBSECTION_BAND_H, Color::BRAND)?;
    canvas.draw_text(
        &subsection.name,
        x + 4.0,
        y + 5.5,
        TextStyle::bold(10.5).color(Color::BRAND),
        Align::Left,
    )?;
    canvas.set_y(y + SUBSECTION_BAND_H + 3.0);
    Ok(())
}

/// Stamp label, `Page X of N` and the confidentiality notice on every page.
fn stamp_footers(
    canvas: &mut Canvas,
    doc: &ReportDocument,
    options: &RenderOptions,
) -> Result<(), Error> {
    let g = *canvas.geometry();
    let total = canvas.page_count();
    let muted = |size: f32| TextStyle::regular(size).color(Color::MUTED);
    for index in 0..total {
        canvas.select_page(index);
        let rule_y = g.height - 18.0;
        canvas.draw_rule(g.margin_left, rule_y, g.width - g.margin_right, rule_y, Color::BORDER)?;
        canvas.draw_text(
            &format!("{} | {}", options.report_label, doc.id),
            g.margin_left,
            g.height - 13.0,
            muted(8.0),
            Align::Left,
        )?;
        canvas.draw_text(
            &format!("Page {} of {}", index + 1, total),
            g.width - g.margin_right,
            g.height - 13.0,
            muted(8.0),
            Align::Right,
        )?;
        canvas.draw_text(
            &options.confidentiality_notice,
            g.width / 2.0,
            g.height - 8.0,
            muted(7.0),
            Align::Center,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn file_name_uses_hint_and_iso_date() {
        let date = Local.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();
        assert_eq!(file_name("Credit Report", date), "Credit_Report_2024-03-09.pdf");
        assert_eq!(file_name("  ", date), "Report_2024-03-09.pdf");
        assert_eq!(file_name("a/b", date), "a_b_2024-03-09.pdf");
    }

    #[test]
    fn empty_document_renders_single_page_with_placeholders() {
        let rendered = render(&ReportDocument::default(), &RenderOptions::default()).unwrap();
        assert_eq!(rendered.page_count(), 1);
        let page = rendered.page(0).unwrap();
        assert!(page.contains_text("Subject Information"));
        assert!(page.contains_text("Page 1 of 1"));
        assert!(page.texts().filter(|t| *t == PLACEHOLDER).count() >= 4);
    }

    #[test]
    fn out_of_range_validity_renders_placeholder() {
        for validity_days in [i64::MAX, 100_000_000, i64::MIN] {
            let options = RenderOptions {
                validity_days,
                generated_at: Some(Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()),
                ..RenderOptions::default()
            };
            let rendered = render(&ReportDocument::default(), &options).unwrap();
            assert!(rendered.pages()[0].contains_text("Valid until: N/A"), "{validity_days}");
        }
    }

    #[test]
    fn helvetica_render_spells_out_naira() {
        let doc = ReportDocument {
            categories: vec![Category {
                name: "Credit".into(),
                subsections: vec![Subsection {
                    key: "agreementsSummary".into(),
                    name: "Agreements".into(),
                    payload: crate::model::SectionPayload::AgreementsSummary(Default::default()),
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let rendered = render(&doc, &RenderOptions::default()).unwrap();
        assert!(rendered.pages()[0].texts().any(|t| t == "NGN 0.00"));
    }

    #[test]
    fn missing_photo_is_skipped() {
        let mut doc = ReportDocument::default();
        doc.subject.image = Some("/nonexistent/photo.png".into());
        let rendered = render(&doc, &RenderOptions::default()).unwrap();
        assert!(
            rendered.pages()[0]
                .ops()
                .iter()
                .all(|op| !matches!(op, DrawOp::Image { .. }))
        );
    }
}
