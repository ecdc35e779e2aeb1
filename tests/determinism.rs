mod common;

use credit_report_pdf::render;
use rayon::prelude::*;

#[test]
fn identical_input_gives_identical_bytes() {
    let doc = common::load_fixture(common::SAMPLE);
    let options = common::fixed_options();
    let a = render(&doc, &options).unwrap();
    let b = render(&doc, &options).unwrap();
    assert_eq!(a.pages(), b.pages());
    assert_eq!(a.to_pdf_bytes().unwrap(), b.to_pdf_bytes().unwrap());
}

#[test]
fn parallel_renders_match_sequential() {
    common::init_logging();
    let doc = common::load_fixture(common::SAMPLE);
    let options = common::fixed_options();
    let expected = render(&doc, &options).unwrap().to_pdf_bytes().unwrap();

    let outputs: Vec<Vec<u8>> = (0..16)
        .into_par_iter()
        .map(|_| render(&doc, &options).unwrap().to_pdf_bytes().unwrap())
        .collect();
    assert!(outputs.iter().all(|bytes| *bytes == expected));
}
