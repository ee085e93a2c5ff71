use chrono::NaiveDate;

use crate::model::AlumniRecord;

/// Export column order is fixed; consumers of the file rely on it.
const COLUMNS: [&str; 15] = [
    "Serial ID",
    "Full Name",
    "Email",
    "Mobile",
    "Gender",
    "Blood Group",
    "Student ID",
    "Session",
    "Batch",
    "Degree",
    "Occupation",
    "Organization",
    "Position",
    "Interested in Activities",
    "Created At",
];

/// Render records as CSV: header row plus one row per record, every field
/// double-quoted, embedded quotes doubled. Missing optional fields become
/// empty strings. Pure; the caller decides the file name and transport.
pub fn export(records: &[AlumniRecord]) -> String {
    let mut out = String::with_capacity(256 * (records.len() + 1));

    push_row(&mut out, COLUMNS.iter().copied());

    for record in records {
        let interested = if record.interested_in_activities {
            "Yes"
        } else {
            "No"
        };
        let created_at = record.created_at.date_naive().format("%d/%m/%Y").to_string();

        push_row(
            &mut out,
            [
                record.serial_id.as_str(),
                record.full_name.as_str(),
                record.email_address.as_str(),
                record.mobile_number.as_deref().unwrap_or(""),
                record.gender.as_deref().unwrap_or(""),
                record.blood_group.as_deref().unwrap_or(""),
                record.student_id.as_deref().unwrap_or(""),
                record.session.as_deref().unwrap_or(""),
                record.batch_no.as_deref().unwrap_or(""),
                record.program_degree.as_deref().unwrap_or(""),
                record.current_occupation.as_deref().unwrap_or(""),
                record.organization_name.as_deref().unwrap_or(""),
                record.designation_position.as_deref().unwrap_or(""),
                interested,
                created_at.as_str(),
            ]
            .into_iter(),
        );
    }

    out
}

/// File name for a download on `date`: `alumni_registrations_<ISO-date>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("alumni_registrations_{}.csv", date.format("%Y-%m-%d"))
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        push_quoted(out, field);
    }
    out.push('\n');
}

fn push_quoted(out: &mut String, field: &str) {
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}
