//! Runs in its own test binary: it points the font search path at a scratch
//! directory before the first font lookup in the process.

mod common;

use std::path::{Path, PathBuf};

use credit_report_pdf::{RenderOptions, render};

const NAIRA: char = '\u{20A6}';

fn collect_ttf(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_ttf(&path, out);
        } else if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf"))
        {
            out.push(path);
        }
    }
}

/// First regular-weight system TrueType font with a naira glyph, with its family name.
fn font_with_naira() -> Option<(PathBuf, String)> {
    let mut files = Vec::new();
    for dir in [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        r"C:\Windows\Fonts",
    ] {
        collect_ttf(Path::new(dir), &mut files);
    }
    files.sort();
    files.into_iter().find_map(|path| {
        let data = std::fs::read(&path).ok()?;
        let face = ttf_parser::Face::parse(&data, 0).ok()?;
        if face.is_italic() || face.is_bold() || face.glyph_index(NAIRA).is_none() {
            return None;
        }
        let family = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == ttf_parser::name_id::FAMILY && n.is_unicode())
            .find_map(|n| n.to_string())?;
        Some((path, family))
    })
}

#[test]
fn embedded_family_draws_naira_through_identity_encoding() {
    common::init_logging();
    let Some((source, family)) = font_with_naira() else {
        eprintln!("no installed TrueType font with a naira glyph; skipping");
        return;
    };
    let font_dir = common::output_dir("truetype").join("fonts");
    std::fs::create_dir_all(&font_dir).unwrap();
    let file_name = source.file_name().unwrap();
    std::fs::copy(&source, font_dir.join(file_name)).unwrap();
    // SAFETY: the only test in this binary, run before any font lookup.
    unsafe { std::env::set_var("CREDIT_REPORT_FONTS", &font_dir) };

    let doc = common::load_fixture(common::SAMPLE);
    let options = RenderOptions {
        font_family: Some(family.clone()),
        ..common::fixed_options()
    };
    let rendered = render(&doc, &options).unwrap();
    assert!(
        rendered
            .pages()
            .iter()
            .any(|p| p.contains_text("\u{20A6}1,250,000.00")),
        "naira kept with {family}"
    );

    let pdf = rendered.to_pdf_bytes().unwrap();
    assert!(common::contains(&pdf, b"/Identity-H"));
    assert!(common::contains(&pdf, b"/ToUnicode"));
    assert!(common::contains(&pdf, b"/FontFile2"));
    assert!(!common::contains(&pdf, b"/BaseFont /Helvetica"));
    std::fs::write(common::output_dir("truetype").join("report.pdf"), &pdf).unwrap();
}
