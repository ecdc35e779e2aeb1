use crate::currency::{format_currency, sum_currency};
use crate::error::Error;
use crate::model::{
    AccountRating, AccountSummary, Agreement, AgreementsSummary, Color, Delinquency,
    DelinquencyRecord, DishonouredCheques,
};
use crate::pdf::layout::Canvas;

use super::{Field, entry_card, metric_cards, na, no_data, status_line, sub_heading};

fn delinquency_fields(record: &DelinquencyRecord) -> [Field; 4] {
    [
        Field::new("Account Number", &record.account_number),
        Field::new("Status", &record.status),
        Field::new("Amount", &record.amount),
        Field::new("Period", &record.period),
    ]
}

pub(super) fn delinquency(d: &Delinquency, canvas: &mut Canvas) -> Result<(), Error> {
    status_line(canvas, "Delinquency Status", &d.status, "Clear")?;
    if let Some(highest) = &d.highest {
        let title = format!("Highest Delinquency: {}", na(&highest.kind));
        entry_card(canvas, &title, &delinquency_fields(highest))?;
    }
    if d.records.is_empty() {
        return no_data(canvas, "No delinquency records available.");
    }
    for record in &d.records {
        entry_card(canvas, na(&record.kind), &delinquency_fields(record))?;
    }
    Ok(())
}

pub(super) fn account_summary(s: &AccountSummary, canvas: &mut Canvas) -> Result<(), Error> {
    metric_cards(
        canvas,
        &[
            ("Total Accounts", na(&s.total_accounts).to_string()),
            ("Active Accounts", na(&s.active_accounts).to_string()),
            ("Closed Accounts", na(&s.closed_accounts).to_string()),
            ("Delinquent Accounts", na(&s.delinquent_accounts).to_string()),
        ],
    )?;
    for account in &s.accounts {
        entry_card(
            canvas,
            na(&account.account_type),
            &[
                Field::new("Account Number", &account.account_number),
                Field::new("Status", &account.status),
                Field::new("Balance", &account.balance),
            ],
        )?;
    }
    Ok(())
}

pub(super) fn account_rating(r: &AccountRating, canvas: &mut Canvas) -> Result<(), Error> {
    metric_cards(
        canvas,
        &[
            ("Credit Score", na(&r.score).to_string()),
            ("Rating", na(&r.rating).to_string()),
            ("Risk Level", na(&r.risk_level).to_string()),
            ("Last Updated", na(&r.last_updated).to_string()),
        ],
    )?;
    sub_heading(canvas, "Rating History")?;
    if r.history.is_empty() {
        return no_data(canvas, "No rating history available.");
    }
    for entry in &r.history {
        entry_card(
            canvas,
            na(&entry.date),
            &[
                Field::new("Score", &entry.score),
                Field::new("Rating", &entry.rating),
            ],
        )?;
    }
    Ok(())
}

fn agreement_card(agreement: &Agreement, canvas: &mut Canvas) -> Result<(), Error> {
    let title = match (&agreement.facility_type, &agreement.account_status) {
        (Some(kind), Some(status)) => format!("{kind} ({status})"),
        (kind, _) => na(kind).to_string(),
    };
    entry_card(
        canvas,
        &title,
        &[
            Field::new("Account Number", &agreement.account_number),
            Field::new("Subscriber", &agreement.subscriber),
            Field::new("Date Opened", &agreement.date_opened),
            Field::new("Outstanding", &agreement.outstanding_balance),
            Field::new("Amount Overdue", &agreement.amount_overdue),
            Field::status("Performance", &agreement.performance_status, "Performing"),
        ],
    )
}

pub(super) fn agreements_summary(
    s: &AgreementsSummary,
    canvas: &mut Canvas,
    currency_symbol: &str,
) -> Result<(), Error> {
    status_line(canvas, "Status", &s.status, "Performing")?;

    let open = s.agreements.iter().filter(|a| a.is_open()).count();
    let non_performing = s.agreements.iter().filter(|a| !a.is_performing()).count();
    let total = sum_currency(
        s.agreements
            .iter()
            .filter_map(|a| a.outstanding_balance.as_deref()),
    );
    metric_cards(
        canvas,
        &[
            ("Total Agreements", s.agreements.len().to_string()),
            ("Open", open.to_string()),
            ("Non-Performing", non_performing.to_string()),
            ("Total Outstanding", format_currency(total, currency_symbol)),
        ],
    )?;

    agreements_list(&s.agreements, canvas)
}

pub(super) fn agreements_list(list: &[Agreement], canvas: &mut Canvas) -> Result<(), Error> {
    if list.is_empty() {
        return no_data(canvas, "No credit agreements available.");
    }
    for agreement in list {
        agreement_card(agreement, canvas)?;
    }
    Ok(())
}

pub(super) fn dishonoured_cheques(
    c: &DishonouredCheques,
    canvas: &mut Canvas,
) -> Result<(), Error> {
    entry_card(
        canvas,
        "Dishonoured Cheques",
        &[
            Field::new("Number of Cheques", &c.count),
            Field::new("Total Amount", &c.total_amount),
            Field::status("Status", &c.status, "Clear"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;
    use crate::fonts::FontPair;
    use crate::pdf::layout::DrawOp;

    fn agreement(balance: &str, status: &str, performance: &str) -> Agreement {
        Agreement {
            account_number: Some("0012345678".into()),
            facility_type: Some("Term Loan".into()),
            subscriber: Some("First Bank".into()),
            account_status: Some(status.into()),
            performance_status: Some(performance.into()),
            outstanding_balance: Some(balance.into()),
            ..Default::default()
        }
    }

    fn ops_of(f: impl FnOnce(&mut Canvas) -> Result<(), Error>) -> Vec<DrawOp> {
        let fonts = FontPair::helvetica();
        let mut canvas = Canvas::new(PageGeometry::A4, &fonts);
        f(&mut canvas).unwrap();
        canvas
            .into_pages()
            .iter()
            .flat_map(|p| p.ops().to_vec())
            .collect()
    }

    fn text_color(ops: &[DrawOp], needle: &str) -> Option<Color> {
        ops.iter().find_map(|op| match op {
            DrawOp::Text { text, color, .. } if text == needle => Some(*color),
            _ => None,
        })
    }

    #[test]
    fn summary_derives_counts_and_total() {
        let summary = AgreementsSummary {
            status: Some("Performing".into()),
            agreements: vec![
                agreement("750,000.00", "Open", "Performing"),
                agreement("500,000.00", "Closed", "Non-Performing"),
            ],
        };
        let ops = ops_of(|c| agreements_summary(&summary, c, "\u{20A6}"));
        assert!(text_color(&ops, "\u{20A6}1,250,000.00").is_some());
        assert_eq!(text_color(&ops, "Performing"), Some(Color::GOOD));
        assert_eq!(text_color(&ops, "Non-Performing"), Some(Color::MUTED));
        assert_eq!(text_color(&ops, "Term Loan (Open)"), Some(Color::TEXT));
    }

    #[test]
    fn agreement_card_lists_opening_date_and_overdue_amount() {
        let mut entry = agreement("750,000.00", "Open", "Performing");
        entry.date_opened = Some("2022-09-01".into());
        let ops = ops_of(|c| agreements_list(std::slice::from_ref(&entry), c));
        assert!(text_color(&ops, "Date Opened:").is_some());
        assert!(text_color(&ops, "2022-09-01").is_some());
        assert!(text_color(&ops, "Amount Overdue:").is_some());
        assert_eq!(text_color(&ops, "N/A"), Some(Color::TEXT));
    }

    #[test]
    fn summary_without_agreements_totals_zero() {
        let ops = ops_of(|c| agreements_summary(&AgreementsSummary::default(), c, "$"));
        assert!(text_color(&ops, "$0.00").is_some());
        assert!(text_color(&ops, "No credit agreements available.").is_some());
        assert_eq!(text_color(&ops, "N/A"), Some(Color::BAD));
    }

    #[test]
    fn delinquency_status_is_green_only_when_clear() {
        let clear = ops_of(|c| {
            delinquency(
                &Delinquency {
                    status: Some("Clear".into()),
                    ..Default::default()
                },
                c,
            )
        });
        assert_eq!(text_color(&clear, "Clear"), Some(Color::GOOD));

        let delinquent = ops_of(|c| {
            delinquency(
                &Delinquency {
                    status: Some("Delinquent".into()),
                    ..Default::default()
                },
                c,
            )
        });
        assert_eq!(text_color(&delinquent, "Delinquent"), Some(Color::BAD));
    }

    #[test]
    fn account_summary_shows_four_metrics() {
        let summary = AccountSummary {
            total_accounts: Some("3".into()),
            active_accounts: Some("2".into()),
            closed_accounts: Some("1".into()),
            ..Default::default()
        };
        let ops = ops_of(|c| account_summary(&summary, c));
        let boxes = ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. })).count();
        assert_eq!(boxes, 4);
        for value in ["3", "2", "1", "N/A"] {
            assert!(text_color(&ops, value).is_some(), "{value}");
        }
    }
}
