//! CSV export of the lead collection.

use chrono::{DateTime, Local, TimeZone};

use crate::leads::models::Lead;

pub const CSV_HEADERS: [&str; 7] = [
    "Name",
    "Phone",
    "Reviews",
    "Address",
    "Status",
    "Category",
    "Date Saved",
];

/// en-US `toLocaleDateString` rendering, e.g. `10/14/2026`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Renders leads as CSV in the server's local time zone.
pub fn leads_to_csv(leads: &[Lead], date_format: &str) -> String {
    leads_to_csv_in(leads, date_format, &Local)
}

/// Renders leads as CSV, one quoted row per lead, in collection order.
///
/// Every field is wrapped in double quotes with embedded quotes doubled.
/// Rows are separated by `\n` with no trailing newline.
pub fn leads_to_csv_in<Tz: TimeZone>(leads: &[Lead], date_format: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::with_capacity(leads.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for lead in leads {
        let saved = format_saved_at(lead.saved_at, date_format, tz);
        let row = [
            lead.business.name.as_str(),
            lead.business.phone.as_str(),
            lead.business.review_count.as_str(),
            lead.business.address.as_str(),
            lead.status.label(),
            lead.category.as_str(),
            saved.as_str(),
        ]
        .map(quote)
        .join(",");
        lines.push(row);
    }

    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn format_saved_at<Tz: TimeZone>(saved_at: i64, date_format: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(saved_at) {
        Some(utc) => utc.with_timezone(tz).format(date_format).to_string(),
        None => String::new(),
    }
}

/// File name offered for a download on `date`, e.g. `morocco_leads_2026-10-14.csv`.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("morocco_leads_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::models::{BusinessRecord, LeadStatus};
    use chrono::{NaiveDate, Utc};

    fn lead(name: &str, address: &str) -> Lead {
        Lead {
            business: BusinessRecord {
                name: name.to_string(),
                phone: "0522-111222".to_string(),
                review_count: "48".to_string(),
                address: address.to_string(),
            },
            id: "abc".to_string(),
            status: LeadStatus::MeetingBooked,
            // 2026-10-14T12:00:00Z
            saved_at: 1_791_979_200_000,
            category: "Café".to_string(),
            script: None,
            last_niche: None,
        }
    }

    #[test]
    fn test_header_row() {
        let csv = leads_to_csv_in(&[], DEFAULT_DATE_FORMAT, &Utc);
        assert_eq!(csv, "Name,Phone,Reviews,Address,Status,Category,Date Saved");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let csv = leads_to_csv_in(&[lead(r#"O'Hara "Deli""#, "")], DEFAULT_DATE_FORMAT, &Utc);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with(r#""O'Hara ""Deli""","#), "{row}");
    }

    #[test]
    fn test_full_row_rendering() {
        let csv = leads_to_csv_in(
            &[lead("Café Atlas", "Rue \"V\", Casablanca")],
            DEFAULT_DATE_FORMAT,
            &Utc,
        );
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            r#""Café Atlas","0522-111222","48","Rue ""V"", Casablanca","Meeting Booked","Café","10/14/2026""#
        );
    }

    #[test]
    fn test_custom_date_format() {
        let csv = leads_to_csv_in(&[lead("A", "")], "%d/%m/%Y", &Utc);
        assert!(csv.ends_with(r#""14/10/2026""#), "{csv}");
    }

    #[test]
    fn test_one_row_per_lead_no_trailing_newline() {
        let csv = leads_to_csv_in(&[lead("A", ""), lead("B", "")], DEFAULT_DATE_FORMAT, &Utc);
        assert_eq!(csv.lines().count(), 3);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        assert_eq!(export_file_name(date), "morocco_leads_2026-10-14.csv");
    }
}
