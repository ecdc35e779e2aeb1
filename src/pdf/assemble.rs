use std::collections::HashSet;

use chrono::{Datelike, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{FontEntry, register_font};

use super::layout::{DrawOp, PT_PER_MM};
use super::{ColorModel, ImageFormat, ImageResource, RenderedDocument};

/// Serialize the display lists into a PDF. Layout coordinates are millimetres from
/// the top-left corner; PDF space is points from the bottom-left.
pub(super) fn write_pdf(doc: &RenderedDocument) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // F1 regular, F2 bold; subset to the characters each weight actually draws
    let mut used: [HashSet<char>; 2] = Default::default();
    for op in doc.pages.iter().flat_map(|p| p.ops()) {
        if let DrawOp::Text { text, bold, .. } = op {
            used[usize::from(*bold)].extend(text.chars());
        }
    }
    let fonts = [
        register_font(&mut pdf, &doc.fonts.regular, "F1".into(), &mut alloc, &used[0]),
        register_font(&mut pdf, &doc.fonts.bold, "F2".into(), &mut alloc, &used[1]),
    ];
    let t_fonts = t0.elapsed();

    let mut image_xobjects: Vec<(String, Ref)> = Vec::with_capacity(doc.images.len());
    for (i, img) in doc.images.iter().enumerate() {
        let xobj_ref = embed_image(&mut pdf, img, &mut alloc)?;
        image_xobjects.push((format!("Im{}", i + 1), xobj_ref));
    }
    let t_images = t0.elapsed();

    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    let page_h = doc.geometry.height * PT_PER_MM;
    let page_w = doc.geometry.width * PT_PER_MM;
    for (i, page) in doc.pages.iter().enumerate() {
        let mut content = Content::new();
        for op in page.ops() {
            write_op(&mut content, op, page_h, &fonts, &image_xobjects);
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for entry in &fonts {
                font_dict.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let created = doc.generated_at;
    let date = Date::new(created.year().clamp(0, 9999) as u16)
        .month(created.month() as u8)
        .day(created.day() as u8)
        .hour(created.hour() as u8)
        .minute(created.minute() as u8)
        .second(created.second() as u8);
    pdf.document_info(info_id)
        .title(TextStr(&doc.title))
        .producer(TextStr(concat!("credit-report-pdf ", env!("CARGO_PKG_VERSION"))))
        .creation_date(date);

    let bytes = pdf.finish();
    let t_done = t0.elapsed();
    log::info!(
        "Assembly phases: font_embed={:.1}ms, images={:.1}ms, pages={:.1}ms ({} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_done - t_images).as_secs_f64() * 1000.0,
        bytes.len(),
    );
    Ok(bytes)
}

fn write_op(
    content: &mut Content,
    op: &DrawOp,
    page_h: f32,
    fonts: &[FontEntry; 2],
    images: &[(String, Ref)],
) {
    let pt = |mm: f32| mm * PT_PER_MM;
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            size,
            bold,
            color,
        } => {
            let entry = &fonts[usize::from(*bold)];
            let [r, g, b] = rgb(color.0);
            content
                .begin_text()
                .set_fill_rgb(r, g, b)
                .set_font(Name(entry.pdf_name.as_bytes()), *size)
                .next_line(pt(*x), page_h - pt(*y))
                .show(Str(&entry.encode(text)))
                .end_text();
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        } => {
            let [r, g, b] = rgb(color.0);
            content
                .save_state()
                .set_stroke_rgb(r, g, b)
                .set_line_width(pt(*width))
                .move_to(pt(*x1), page_h - pt(*y1))
                .line_to(pt(*x2), page_h - pt(*y2))
                .stroke()
                .restore_state();
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            content.save_state();
            if let Some(c) = fill {
                let [r, g, b] = rgb(c.0);
                content.set_fill_rgb(r, g, b);
            }
            if let Some(c) = stroke {
                let [r, g, b] = rgb(c.0);
                content.set_stroke_rgb(r, g, b).set_line_width(0.5);
            }
            content.rect(pt(*x), page_h - pt(*y + *height), pt(*width), pt(*height));
            match (fill.is_some(), stroke.is_some()) {
                (true, true) => content.fill_nonzero_and_stroke(),
                (true, false) => content.fill_nonzero(),
                (false, true) => content.stroke(),
                (false, false) => content.end_path(),
            };
            content.restore_state();
        }
        DrawOp::Image {
            x,
            y,
            width,
            height,
            image,
        } => {
            let Some((name, _)) = images.get(*image) else {
                log::warn!("Image {image} was never embedded; skipping");
                return;
            };
            content
                .save_state()
                .transform([
                    pt(*width),
                    0.0,
                    0.0,
                    pt(*height),
                    pt(*x),
                    page_h - pt(*y + *height),
                ])
                .x_object(Name(name.as_bytes()))
                .restore_state();
        }
    }
}

fn rgb(c: [u8; 3]) -> [f32; 3] {
    c.map(|v| f32::from(v) / 255.0)
}

/// JPEG passes through as DCT; PNG is decoded to RGB with an optional alpha SMask.
fn embed_image(
    pdf: &mut Pdf,
    img: &ImageResource,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<Ref, Error> {
    let xobj_ref = alloc();
    match img.format {
        ImageFormat::Jpeg => {
            let mut xobj = pdf.image_xobject(xobj_ref, &img.data);
            xobj.filter(Filter::DctDecode);
            xobj.width(img.pixel_width as i32);
            xobj.height(img.pixel_height as i32);
            match img.color {
                ColorModel::Gray => xobj.color_space().device_gray(),
                ColorModel::Rgb => xobj.color_space().device_rgb(),
                ColorModel::Cmyk => xobj.color_space().device_cmyk(),
            }
            xobj.bits_per_component(8);
        }
        ImageFormat::Png => {
            let decoded =
                image::load_from_memory_with_format(&img.data, image::ImageFormat::Png)
                    .map_err(|e| Error::Pdf(format!("subject photo: {e}")))?;
            let rgba = decoded.to_rgba8();
            let (w, h) = (rgba.width() as i32, rgba.height() as i32);
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w);
            xobj.height(h);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    log::debug!(
        "Embedded {:?} {:?} image {}x{}",
        img.format,
        img.color,
        img.pixel_width,
        img.pixel_height
    );
    Ok(xobj_ref)
}
