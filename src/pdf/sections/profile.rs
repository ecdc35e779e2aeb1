use crate::error::Error;
use crate::model::{
    AddressRecord, Color, Employment, Identification, PersonalDetails, Telephone,
};
use crate::pdf::layout::{Align, Canvas, TextStyle};

use super::{Field, entry_card, na, no_data};

const GRID_ROW_H: f32 = 7.0;

pub(super) fn personal_details(p: &PersonalDetails, canvas: &mut Canvas) -> Result<(), Error> {
    let pairs: [(&str, &Option<String>); 13] = [
        ("Title", &p.title),
        ("Surname", &p.surname),
        ("First Name", &p.first_name),
        ("Other Names", &p.other_names),
        ("Date of Birth", &p.date_of_birth),
        ("Gender", &p.gender),
        ("Marital Status", &p.marital_status),
        ("Nationality", &p.nationality),
        ("BVN", &p.bvn),
        ("National ID", &p.national_id),
        ("Email", &p.email),
        ("Phone", &p.phone),
        ("Employer", &p.employer),
    ];
    let rows = pairs.len().div_ceil(2);
    // Address spans the full width and gets two lines of room.
    let height = 4.0 + (rows as f32 + 2.0) * GRID_ROW_H;
    canvas.ensure_page_space(height + 3.0);

    let g = *canvas.geometry();
    let (x, y, w) = (g.margin_left, canvas.y(), g.content_width());
    canvas.draw_box(x, y, w, height, Some(Color::CARD_FILL), Some(Color::BORDER))?;

    let col_w = w / 2.0;
    let label_style = TextStyle::bold(8.5).color(Color::MUTED);
    let value_style = TextStyle::regular(9.0);
    for (i, (label, value)) in pairs.iter().enumerate() {
        let col_x = x + 4.0 + (i % 2) as f32 * col_w;
        let row_y = y + 6.0 + (i / 2) as f32 * GRID_ROW_H;
        canvas.draw_text(&format!("{label}:"), col_x, row_y, label_style, Align::Left)?;
        canvas.draw_text(na(value), col_x + 30.0, row_y, value_style, Align::Left)?;
    }

    let address_y = y + 6.0 + rows as f32 * GRID_ROW_H;
    canvas.draw_text("Address:", x + 4.0, address_y, label_style, Align::Left)?;
    canvas.draw_wrapped_text(na(&p.address), x + 34.0, address_y, w - 38.0, value_style)?;

    canvas.set_y(y + height + 3.0);
    Ok(())
}

pub(super) fn identifications(list: &[Identification], canvas: &mut Canvas) -> Result<(), Error> {
    if list.is_empty() {
        return no_data(canvas, "No identification history available.");
    }
    for id in list {
        entry_card(
            canvas,
            na(&id.id_type),
            &[
                Field::new("ID Number", &id.id_number),
                Field::new("Issue Date", &id.issue_date),
                Field::new("Expiry Date", &id.expiry_date),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn addresses(list: &[AddressRecord], canvas: &mut Canvas) -> Result<(), Error> {
    if list.is_empty() {
        return no_data(canvas, "No address history available.");
    }
    for (i, addr) in list.iter().enumerate() {
        let title = match &addr.kind {
            Some(kind) => format!("{kind} Address"),
            None => format!("Address {}", i + 1),
        };
        entry_card(
            canvas,
            &title,
            &[
                Field::new("Address", &addr.address),
                Field::new("Date Reported", &addr.date_reported),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn employments(list: &[Employment], canvas: &mut Canvas) -> Result<(), Error> {
    if list.is_empty() {
        return no_data(canvas, "No employment history available.");
    }
    for job in list {
        let when = match (&job.start_date, &job.end_date) {
            (Some(start), Some(end)) => Field::text("Period", format!("{start} - {end}")),
            (Some(start), None) => Field::text("Period", format!("{start} - Present")),
            _ => Field::new("Date Reported", &job.date_reported),
        };
        entry_card(
            canvas,
            na(&job.employer),
            &[Field::new("Position", &job.position), when],
        )?;
    }
    Ok(())
}

/// Cards list only the home/work/mobile numbers an entry actually has.
pub(super) fn telephones(list: &[Telephone], canvas: &mut Canvas) -> Result<(), Error> {
    if list.is_empty() {
        return no_data(canvas, "No telephone history available.");
    }
    for (i, phone) in list.iter().enumerate() {
        let mut fields: Vec<Field> = [
            ("Home", &phone.home),
            ("Work", &phone.work),
            ("Mobile", &phone.mobile),
        ]
        .into_iter()
        .filter(|(_, number)| number.is_some())
        .map(|(label, number)| Field::new(label, number))
        .collect();
        if fields.is_empty() {
            fields.push(Field::new("Number", &None));
        }
        fields.push(Field::new("Date Reported", &phone.date_reported));
        entry_card(canvas, &format!("Telephone Record {}", i + 1), &fields)?;
    }
    Ok(())
}
