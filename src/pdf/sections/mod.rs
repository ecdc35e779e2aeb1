mod credit;
mod profile;
mod records;

use crate::error::Error;
use crate::model::{Color, GenericPayload, PLACEHOLDER, SectionPayload};

use super::layout::{Align, Canvas, TextStyle};

const CARD_GAP: f32 = 3.0;
const FIELD_LINE_H: f32 = 5.5;
const VALUE_OFFSET: f32 = 42.0;
const METRIC_CARD_H: f32 = 22.0;
const LINE_BLOCK_H: f32 = 8.0;

pub(super) fn na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(PLACEHOLDER)
}

/// One label/value line inside a card.
pub(super) struct Field {
    label: &'static str,
    value: String,
    color: Option<Color>,
}

impl Field {
    pub(super) fn new(label: &'static str, value: &Option<String>) -> Self {
        Self::text(label, na(value).to_string())
    }

    pub(super) fn text(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            color: None,
        }
    }

    /// Color the value green when it equals `good`, red otherwise.
    pub(super) fn status(label: &'static str, value: &Option<String>, good: &str) -> Self {
        let color = Color::for_status(na(value), good);
        Self {
            color: Some(color),
            ..Self::new(label, value)
        }
    }
}

fn card_height(field_count: usize) -> f32 {
    10.0 + field_count as f32 * FIELD_LINE_H
}

/// Bordered card with a bold title and one line per field. The height is fixed by
/// the field count; values that wrap past it overflow.
pub(super) fn entry_card(canvas: &mut Canvas, title: &str, fields: &[Field]) -> Result<(), Error> {
    let h = card_height(fields.len());
    canvas.ensure_page_space(h + CARD_GAP);
    let g = *canvas.geometry();
    let (x, y, w) = (g.margin_left, canvas.y(), g.content_width());

    canvas.draw_box(x, y, w, h, Some(Color::CARD_FILL), Some(Color::BORDER))?;
    canvas.draw_text(title, x + 4.0, y + 6.0, TextStyle::bold(10.0), Align::Left)?;
    for (i, field) in fields.iter().enumerate() {
        let ly = y + 11.5 + i as f32 * FIELD_LINE_H;
        canvas.draw_text(
            &format!("{}:", field.label),
            x + 4.0,
            ly,
            TextStyle::bold(9.0).color(Color::MUTED),
            Align::Left,
        )?;
        let style = TextStyle::regular(9.0).color(field.color.unwrap_or(Color::TEXT));
        canvas.draw_wrapped_text(
            &field.value,
            x + VALUE_OFFSET,
            ly,
            w - VALUE_OFFSET - 4.0,
            style,
        )?;
    }
    canvas.set_y(y + h + CARD_GAP);
    Ok(())
}

/// Row of equal-width cards, each a small title over a large value.
pub(super) fn metric_cards(canvas: &mut Canvas, cards: &[(&str, String)]) -> Result<(), Error> {
    if cards.is_empty() {
        return Ok(());
    }
    canvas.ensure_page_space(METRIC_CARD_H + 4.0);
    let g = *canvas.geometry();
    let y = canvas.y();
    let gap = 4.0;
    let n = cards.len() as f32;
    let card_w = (g.content_width() - gap * (n - 1.0)) / n;

    for (i, (title, value)) in cards.iter().enumerate() {
        let x = g.margin_left + i as f32 * (card_w + gap);
        canvas.draw_box(x, y, card_w, METRIC_CARD_H, Some(Color::CARD_FILL), Some(Color::BORDER))?;
        let title_style = TextStyle::regular(8.0).color(Color::MUTED);
        let value_style = TextStyle::bold(13.0).color(Color::BRAND);
        canvas.draw_text(title, x + 3.0, y + 7.0, title_style, Align::Left)?;
        canvas.draw_text(value, x + 3.0, y + 16.0, value_style, Align::Left)?;
    }
    canvas.set_y(y + METRIC_CARD_H + 4.0);
    Ok(())
}

/// `Label: value` on one line, value optionally colored.
pub(super) fn label_value_line(
    canvas: &mut Canvas,
    label: &str,
    value: &str,
    color: Color,
) -> Result<(), Error> {
    canvas.ensure_page_space(LINE_BLOCK_H);
    let x = canvas.geometry().margin_left;
    let y = canvas.y() + 5.0;
    let label = format!("{label}:");
    canvas.draw_text(&label, x, y, TextStyle::bold(10.0), Align::Left)?;
    let value_x = x + canvas.text_width(&label, 10.0, true) + 2.0;
    canvas.draw_text(value, value_x, y, TextStyle::bold(10.0).color(color), Align::Left)?;
    canvas.advance(LINE_BLOCK_H);
    Ok(())
}

pub(super) fn status_line(
    canvas: &mut Canvas,
    label: &str,
    status: &Option<String>,
    good: &str,
) -> Result<(), Error> {
    let value = na(status);
    label_value_line(canvas, label, value, Color::for_status(value, good))
}

/// Small bold heading inside a section, e.g. above a history list.
pub(super) fn sub_heading(canvas: &mut Canvas, text: &str) -> Result<(), Error> {
    canvas.ensure_page_space(LINE_BLOCK_H + card_height(2));
    let x = canvas.geometry().margin_left;
    let y = canvas.y() + 5.0;
    canvas.draw_text(text, x, y, TextStyle::bold(10.0).color(Color::BRAND), Align::Left)?;
    canvas.advance(LINE_BLOCK_H);
    Ok(())
}

/// Literal sentence standing in for an absent or empty list.
pub(super) fn no_data(canvas: &mut Canvas, sentence: &str) -> Result<(), Error> {
    canvas.ensure_page_space(LINE_BLOCK_H);
    let x = canvas.geometry().margin_left + 2.0;
    let y = canvas.y() + 5.0;
    canvas.draw_text(sentence, x, y, TextStyle::regular(9.0).color(Color::MUTED), Align::Left)?;
    canvas.advance(LINE_BLOCK_H);
    Ok(())
}

/// Render one subsection payload at the cursor and return the new cursor y.
pub(super) fn render(
    payload: &SectionPayload,
    canvas: &mut Canvas,
    currency_symbol: &str,
) -> Result<f32, Error> {
    match payload {
        SectionPayload::PersonalDetails(p) => profile::personal_details(p, canvas)?,
        SectionPayload::Delinquency(d) => credit::delinquency(d, canvas)?,
        SectionPayload::AccountSummary(s) => credit::account_summary(s, canvas)?,
        SectionPayload::AccountRating(r) => credit::account_rating(r, canvas)?,
        SectionPayload::AgreementsSummary(s) => {
            credit::agreements_summary(s, canvas, currency_symbol)?
        }
        SectionPayload::AgreementsList(list) => credit::agreements_list(list, canvas)?,
        SectionPayload::Guarantors(list) => records::guarantors(list, canvas)?,
        SectionPayload::Collateral(list) => records::collateral(list, canvas)?,
        SectionPayload::DishonouredCheques(c) => credit::dishonoured_cheques(c, canvas)?,
        SectionPayload::Directorships(list) => records::directorships(list, canvas)?,
        SectionPayload::EnquiryHistory(list) => records::enquiries(list, canvas)?,
        SectionPayload::IdentificationHistory(list) => profile::identifications(list, canvas)?,
        SectionPayload::AddressHistory(list) => profile::addresses(list, canvas)?,
        SectionPayload::EmploymentHistory(list) => profile::employments(list, canvas)?,
        SectionPayload::TelephoneHistory(list) => profile::telephones(list, canvas)?,
        SectionPayload::Other(generic) => generic_dump(generic, canvas)?,
    }
    Ok(canvas.y())
}

fn generic_dump(payload: &GenericPayload, canvas: &mut Canvas) -> Result<(), Error> {
    let g = *canvas.geometry();
    let style = TextStyle::regular(9.0);
    match payload {
        GenericPayload::Fields(fields) if fields.is_empty() => {
            no_data(canvas, "No information available.")?;
        }
        GenericPayload::Fields(fields) => {
            for (key, value) in fields {
                canvas.ensure_page_space(style.line_height() * 2.0);
                let y = canvas.y() + 4.0;
                let next = canvas.draw_wrapped_text(
                    &format!("{key}: {value}"),
                    g.margin_left + 2.0,
                    y,
                    g.content_width() - 4.0,
                    style,
                )?;
                canvas.set_y(next + 1.0);
            }
        }
        GenericPayload::Text(text) => {
            canvas.ensure_page_space(style.line_height() * 2.0);
            let y = canvas.y() + 4.0;
            let next = canvas.draw_wrapped_text(
                text,
                g.margin_left + 2.0,
                y,
                g.content_width() - 4.0,
                style,
            )?;
            canvas.set_y(next + 1.0);
        }
    }
    Ok(())
}
