mod config;
pub mod currency;
mod error;
mod fonts;
pub mod input;
pub mod model;
mod pdf;

pub use config::{PageGeometry, RenderOptions};
pub use error::{Error, Stage};
pub use pdf::{DrawOp, Page, RenderCursor, RenderedDocument, render};

use std::path::Path;
use std::time::Instant;

use model::ReportDocument;

pub fn convert_json_to_pdf(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
) -> Result<(), Error> {
    let t0 = Instant::now();
    let doc = input::parse(input)?;
    finish(&doc, output, options, t0)
}

pub fn convert_json_bytes_to_pdf(
    input: &[u8],
    output: &Path,
    options: &RenderOptions,
) -> Result<(), Error> {
    let t0 = Instant::now();
    let doc = input::parse_bytes(input)?;
    finish(&doc, output, options, t0)
}

fn finish(
    doc: &ReportDocument,
    output: &Path,
    options: &RenderOptions,
    t0: Instant,
) -> Result<(), Error> {
    let t_parse = t0.elapsed();

    let rendered = pdf::render(doc, options)?;
    let t_render = t0.elapsed();

    let bytes = rendered.to_pdf_bytes()?;
    let t_assembly = t0.elapsed();

    std::fs::write(output, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, assembly={:.1}ms, write={:.1}ms, \
         total={:.1}ms ({} pages, {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_assembly - t_render).as_secs_f64() * 1000.0,
        (t_total - t_assembly).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        rendered.page_count(),
        bytes.len(),
    );

    Ok(())
}
