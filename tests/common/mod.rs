#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};
use credit_report_pdf::RenderOptions;
use credit_report_pdf::model::ReportDocument;

pub const SAMPLE: &str = "sample_report.json";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn load_fixture(name: &str) -> ReportDocument {
    credit_report_pdf::input::parse(&fixture_path(name)).expect("fixture parses")
}

/// Defaults with a pinned generation time so output is reproducible.
pub fn fixed_options() -> RenderOptions {
    RenderOptions {
        generated_at: Some(Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()),
        ..RenderOptions::default()
    }
}

/// Output directory: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(case);
    fs::create_dir_all(&dir).expect("create output dir");
    dir
}

/// Page objects in a serialized PDF (page dictionaries are never compressed).
pub fn pdf_page_objects(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}

/// First MediaBox as (width, height) in points.
pub fn pdf_mediabox(pdf: &[u8]) -> Option<(f32, f32)> {
    let text = String::from_utf8_lossy(pdf);
    let start = text.find("/MediaBox [")? + "/MediaBox [".len();
    let end = start + text[start..].find(']')?;
    let nums: Vec<f32> = text[start..end]
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    (nums.len() == 4).then(|| (nums[2] - nums[0], nums[3] - nums[1]))
}

/// Inflated bodies of every Flate stream in a serialized PDF.
pub fn pdf_inflated_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    let mut streams = Vec::new();
    let mut rest = pdf;
    while let Some(pos) = find(rest, b"stream\n") {
        let is_end = pos >= 3 && &rest[pos - 3..pos] == b"end";
        let body = &rest[pos + b"stream\n".len()..];
        rest = body;
        if is_end {
            continue;
        }
        let Some(end) = find(body, b"endstream") else {
            break;
        };
        let data = body[..end].strip_suffix(b"\n").unwrap_or(&body[..end]);
        if let Ok(inflated) = miniz_oxide::inflate::decompress_to_vec_zlib(data) {
            streams.push(inflated);
        }
    }
    streams
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
