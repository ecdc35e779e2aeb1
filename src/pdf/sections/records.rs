use crate::error::Error;
use crate::model::{Collateral, Color, Directorship, Enquiry, Guarantor};
use crate::pdf::layout::Canvas;

use super::{Field, entry_card, label_value_line, na, no_data};

pub(super) fn guarantors(list: &[Guarantor], canvas: &mut Canvas) -> Result<(), Error> {
    if list.is_empty() {
        return no_data(canvas, "No guarantor information available.");
    }
    for g in list {
        entry_card(
            canvas,
            na(&g.name),
            &[
                Field::new("Account Number", &g.account_number),
                Field::new("Date", &g.date),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn collateral(list: &[Collateral], canvas: &mut Canvas) -> Result<(), Error> {
    if list.is_empty() {
        return no_data(canvas, "No collateral information available.");
    }
    for c in list {
        entry_card(
            canvas,
            na(&c.kind),
            &[
                Field::new("Value", &c.value),
                Field::new("Description", &c.description),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn directorships(list: &[Directorship], canvas: &mut Canvas) -> Result<(), Error> {
    if list.is_empty() {
        return no_data(canvas, "No directorship information available.");
    }
    for d in list {
        entry_card(
            canvas,
            na(&d.company),
            &[
                Field::new("Position", &d.position),
                Field::new("Appointed", &d.appointed),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn enquiries(list: &[Enquiry], canvas: &mut Canvas) -> Result<(), Error> {
    label_value_line(canvas, "Total Enquiries", &list.len().to_string(), Color::TEXT)?;
    if list.is_empty() {
        return no_data(canvas, "No enquiry history available.");
    }
    for e in list {
        entry_card(
            canvas,
            na(&e.date),
            &[
                Field::new("Enquirer", &e.enquirer),
                Field::new("Reason", &e.reason),
            ],
        )?;
    }
    Ok(())
}
