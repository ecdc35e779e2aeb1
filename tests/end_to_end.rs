mod common;

use credit_report_pdf::{RenderOptions, convert_json_to_pdf, render};

#[test]
fn sample_report_renders_multiple_pages() {
    common::init_logging();
    let doc = common::load_fixture(common::SAMPLE);
    assert_eq!(doc.categories.len(), 1);
    assert_eq!(doc.categories[0].name, "Credit Profile Report");
    assert_eq!(doc.categories[0].subsections.len(), 5);

    let rendered = render(&doc, &common::fixed_options()).unwrap();
    let n = rendered.page_count();
    assert!(n > 1, "expected a multi-page report, got {n}");

    let first = rendered.page(0).unwrap();
    assert!(first.contains_text("Adaeze Okafor"));
    assert!(first.texts().any(|t| t == "720"));

    // Helvetica cannot draw the naira sign, so the total carries the ISO code.
    let all_text: Vec<&str> = rendered.pages().iter().flat_map(|p| p.texts()).collect();
    assert!(all_text.contains(&"NGN 1,250,000.00"));

    let last = rendered.page(n - 1).unwrap();
    assert!(last.contains_text(&format!("Page {n} of {n}")));
}

#[test]
fn banner_shows_id_and_validity_window() {
    let doc = common::load_fixture(common::SAMPLE);
    let rendered = render(&doc, &common::fixed_options()).unwrap();
    let first = rendered.page(0).unwrap();
    assert!(first.contains_text("Report ID: CR-2024-000187"));
    assert!(first.contains_text("Generated: 2024-05-01 09:30"));
    assert!(first.contains_text("Valid until: 2024-05-31"));
}

#[test]
fn pdf_output_has_one_page_object_per_page() {
    let doc = common::load_fixture(common::SAMPLE);
    let rendered = render(&doc, &common::fixed_options()).unwrap();
    let bytes = rendered.to_pdf_bytes().unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(common::pdf_page_objects(&bytes), rendered.page_count());

    let (w, h) = common::pdf_mediabox(&bytes).expect("media box");
    assert!((w - 595.28).abs() < 0.1, "width {w}");
    assert!((h - 841.89).abs() < 0.1, "height {h}");
}

#[test]
fn written_pdf_keeps_currency_on_agreements_total() {
    let doc = common::load_fixture(common::SAMPLE);
    let bytes = render(&doc, &common::fixed_options())
        .unwrap()
        .to_pdf_bytes()
        .unwrap();
    let streams = common::pdf_inflated_streams(&bytes);
    assert!(!streams.is_empty());
    assert!(
        streams
            .iter()
            .any(|s| common::contains(s, b"(NGN 1,250,000.00) Tj"))
    );
    assert!(!streams.iter().any(|s| common::contains(s, b"(1,250,000.00) Tj")));
}

#[test]
fn drawable_currency_symbol_is_kept() {
    let doc = common::load_fixture(common::SAMPLE);
    let options = RenderOptions {
        currency_symbol: "$".into(),
        ..common::fixed_options()
    };
    let rendered = render(&doc, &options).unwrap();
    assert!(
        rendered
            .pages()
            .iter()
            .any(|p| p.texts().any(|t| t == "$1,250,000.00"))
    );
}

#[test]
fn save_uses_label_and_date_file_name() {
    let doc = common::load_fixture(common::SAMPLE);
    let rendered = render(&doc, &common::fixed_options()).unwrap();
    assert_eq!(rendered.default_file_name(), "Credit_Report_2024-05-01.pdf");

    let dir = common::output_dir("save");
    let path = rendered.save(&dir, "Okafor Report").unwrap();
    assert_eq!(path.file_name().unwrap(), "Okafor_Report_2024-05-01.pdf");
    let written = std::fs::read(&path).unwrap();
    assert!(written.starts_with(b"%PDF"));
}

#[test]
fn convert_writes_pdf_file() {
    common::init_logging();
    let out = common::output_dir("convert").join("sample.pdf");
    let _ = std::fs::remove_file(&out);
    let input = common::fixture_path(common::SAMPLE);
    convert_json_to_pdf(&input, &out, &common::fixed_options()).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(common::pdf_page_objects(&bytes) > 1);
}

#[test]
fn missing_input_file_is_io_error() {
    let out = common::output_dir("convert").join("missing.pdf");
    let err = convert_json_to_pdf(
        &common::fixture_path("does_not_exist.json"),
        &out,
        &common::fixed_options(),
    )
    .unwrap_err();
    assert!(matches!(err, credit_report_pdf::Error::Io(_)), "{err}");
}
