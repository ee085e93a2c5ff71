use std::fmt::Write;

use chrono::NaiveDate;

use crate::domain::{AreaOfInterest, Gender, ProgramDegree, RegistreeStatus};
use crate::model::AlumniRecord;

/// Institutional header, fixed on every printed form.
const ASSOCIATION_NAME: &str = "Alumni Association of Geography and Environment";
const COLLEGE_LINE: &str = "Chittagong College, Chattogram";
const CONTACT_EMAIL: &str = "geoenvironment.alumni@gmail.com";
const ESTD_LINE: &str = "ESTD: 5th May 2025";
const LOGO_URL: &str = "https://raw.githubusercontent.com/aimzworld007/Geography_and_Environment_Department_Alumni_Association/refs/heads/main/img/logo.png";

const TITLE_BADGE: &str = "Membership Registration Form";

const DECLARATION: &str = "I hereby confirm that the information provided above is true and correct to the best of my knowledge. I agree to be contacted for alumni association activities and communications.";

const CHECKED: &str = "&#9745;";
const UNCHECKED: &str = "&#9744;";

/// Suggestions text flows over three ruled lines, broken at these offsets.
const SUGGESTIONS_BREAKS: [usize; 2] = [100, 200];

/// Blank-field fills. The widths are part of the layout contract: a field
/// left empty must print as the same dotted blank the paper form carries,
/// field by field, so the document can be hand-filled after printing.
const DATE_OF_BIRTH_FILL: &str = "........../........../......................";
const MOBILE_NUMBER_FILL: &str = "........................................................................................................................................................";
const BLOOD_GROUP_FILL: &str = ".............................";
const EMERGENCY_CONTACT_FILL: &str = "...........................................................................";
const EMERGENCY_RELATION_FILL: &str = "................................";
const CURRENT_ADDRESS_FILL: &str = "........................................................................................................................................................";
const PERMANENT_ADDRESS_FILL: &str = "........................................................................................................................................................";
const STUDENT_ID_FILL: &str = "........................................................................................................................................................";
const SESSION_FILL: &str = ".....................................................................";
const BATCH_NO_FILL: &str = "................................................................";
const DEGREE_OTHER_FILL: &str = "....................................................";
const OCCUPATION_FILL: &str = "........................................,";
const ORGANIZATION_FILL: &str = "............................................................";
const DESIGNATION_FILL: &str = "..........................................";
const WORK_ADDRESS_FILL: &str = "......................................................................................";
const PROFESSIONAL_EMAIL_FILL: &str = ".............................................................................................................................................";
const SUGGESTIONS_FILLS: [&str; 3] = [
    "................................................................................................................................................................................",
    "................................................................................................................................................................................................",
    "................................................................................................................................................................................................",
];

const DOC_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Membership Registration Form</title>
<style>
body { font-family: "Times New Roman", Georgia, serif; margin: 0; background: #fff; color: #000; }
.print-form { max-width: 800px; margin: 16px auto; padding: 32px; border: 2px solid #000; page-break-after: always; }
.masthead { display: flex; align-items: flex-start; justify-content: space-between; }
.masthead .identity { display: flex; align-items: center; }
.masthead img.logo { width: 80px; height: 80px; object-fit: contain; margin-right: 16px; }
.masthead h1 { color: #1d4ed8; font-size: 22px; margin: 0 0 2px; }
.masthead h2 { font-size: 18px; margin: 0 0 2px; }
.masthead p { font-size: 12px; margin: 0; }
.photo { width: 128px; height: 160px; border: 2px solid #60a5fa; background: #eff6ff; color: #1d4ed8; font-size: 12px; display: flex; align-items: center; justify-content: center; text-align: center; flex-shrink: 0; }
.form-no { font-size: 13px; font-weight: 600; margin: 16px 0 8px; }
.badge { text-align: center; margin-bottom: 24px; }
.badge span { background: #7c3aed; color: #fff; padding: 8px 24px; border-radius: 999px; font-weight: 600; }
section { margin-bottom: 20px; }
section h3 { text-decoration: underline; font-size: 15px; margin: 0 0 10px; }
section.personal h3 { color: #dc2626; }
section.academic h3, section.declaration h3 { color: #1d4ed8; }
section.professional h3, section.additional h3 { color: #7c3aed; }
section.engagement h3 { color: #16a34a; }
.status-label { color: #1d4ed8; font-weight: 700; text-decoration: underline; margin-right: 12px; }
.row { display: flex; align-items: baseline; font-size: 13px; margin-bottom: 6px; }
.row .label { width: 150px; font-weight: 600; flex-shrink: 0; }
.row .sep { margin: 0 6px; }
.row .value { flex: 1; border-bottom: 1px dotted #9ca3af; padding-bottom: 2px; overflow: hidden; white-space: nowrap; }
.row .aux-label { font-weight: 600; margin-left: 12px; flex-shrink: 0; }
.row .aux { border-bottom: 1px dotted #9ca3af; padding-bottom: 2px; margin-left: 6px; overflow: hidden; white-space: nowrap; }
.rule { border-bottom: 1px dotted #9ca3af; height: 18px; margin: 0 0 6px 156px; }
.ruled-line { border-bottom: 1px dotted #9ca3af; padding-bottom: 2px; min-height: 18px; margin-bottom: 4px; font-size: 13px; overflow: hidden; white-space: nowrap; }
.check { margin-right: 16px; font-size: 13px; white-space: nowrap; }
.check .box { margin-right: 4px; }
.areas .check { display: block; margin-bottom: 4px; }
.question { font-size: 13px; font-weight: 600; }
.declaration p { font-size: 13px; }
.sign-row { display: flex; justify-content: space-between; align-items: flex-end; margin-top: 32px; font-size: 13px; }
.sign-row .line { display: inline-block; border-bottom: 1px solid #000; min-width: 160px; margin-left: 8px; }
.sign-row .date { border-bottom: 1px dotted #9ca3af; padding-bottom: 2px; margin-left: 8px; }
@media print {
  body { background: #fff !important; }
  .print-form { border: 2px solid #000; box-shadow: none; margin: 0; padding: 20px; }
}
</style>
</head>
<body>
"#;

const DOC_TAIL: &str = "</body>\n</html>\n";

/// Render one record as a complete printable document.
/// Pure and idempotent: the same record always yields byte-identical
/// output. Performs no I/O; a photo URL that fails to load falls back to
/// the placeholder text inside the photo box.
pub fn render(record: &AlumniRecord) -> String {
    document(std::slice::from_ref(record))
}

/// Render an admin selection as a single multi-page document, one form per
/// page. Replaces the old one-popup-per-record print path.
pub fn render_batch(records: &[AlumniRecord]) -> String {
    document(records)
}

fn document(records: &[AlumniRecord]) -> String {
    let mut out = String::with_capacity(DOC_HEAD.len() + 12 * 1024 * records.len());
    out.push_str(DOC_HEAD);
    for record in records {
        form(&mut out, record);
    }
    out.push_str(DOC_TAIL);
    out
}

fn form(out: &mut String, record: &AlumniRecord) {
    out.push_str("<div class=\"print-form\">\n");

    masthead(out, record);

    let _ = writeln!(
        out,
        "<div class=\"form-no\">Form No: {}</div>",
        escape(&record.serial_id)
    );
    let _ = writeln!(out, "<div class=\"badge\"><span>{}</span></div>", TITLE_BADGE);

    personal_details(out, record);
    registree_status(out, record);
    academic_background(out, record);
    professional_information(out, record);
    engagement(out, record);
    additional_information(out, record);
    declaration(out, record);

    out.push_str("</div>\n");
}

fn masthead(out: &mut String, record: &AlumniRecord) {
    out.push_str("<div class=\"masthead\">\n<div class=\"identity\">\n");
    let _ = writeln!(out, "<img class=\"logo\" src=\"{}\" alt=\"Department Logo\">", LOGO_URL);
    let _ = writeln!(
        out,
        "<div>\n<h1>{}</h1>\n<h2>{}</h2>\n<p>Email: {}</p>\n<p>{}</p>\n</div>",
        ASSOCIATION_NAME, COLLEGE_LINE, CONTACT_EMAIL, ESTD_LINE
    );
    out.push_str("</div>\n");
    match record.photo_url.as_deref() {
        Some(url) => {
            // <object> degrades to its inner text when the URL cannot be
            // fetched, so a broken photo never breaks the document.
            let _ = writeln!(
                out,
                "<object class=\"photo\" data=\"{}\">Photo Not Available</object>",
                escape(url)
            );
        }
        None => out.push_str("<div class=\"photo\">[Photo]</div>\n"),
    }
    out.push_str("</div>\n");
}

fn personal_details(out: &mut String, record: &AlumniRecord) {
    let personal = record.personal();

    out.push_str("<section class=\"personal\">\n<h3>Personal Details</h3>\n");

    row(out, "Full Name", Some(personal.full_name), "");
    let date_of_birth = personal.date_of_birth.map(format_date);
    row(out, "Date of Birth", date_of_birth.as_deref(), DATE_OF_BIRTH_FILL);

    let gender = personal.gender.and_then(|g| g.parse::<Gender>().ok());
    out.push_str("<div class=\"row\"><span class=\"label\">Gender</span><span class=\"sep\">:</span><span>");
    checkbox(out, "Male", gender == Some(Gender::Male));
    checkbox(out, "Female", gender == Some(Gender::Female));
    out.push_str("</span></div>\n");

    row(out, "Mobile Number", personal.mobile_number, MOBILE_NUMBER_FILL);
    row_pair(
        out,
        "Email Address",
        Some(personal.email_address),
        "",
        "Blood Group:",
        personal.blood_group,
        BLOOD_GROUP_FILL,
    );
    row_pair(
        out,
        "Emergency Contact",
        personal.emergency_contact,
        EMERGENCY_CONTACT_FILL,
        "(Relation):",
        personal.emergency_relation,
        EMERGENCY_RELATION_FILL,
    );
    row(out, "Current Address", personal.current_address, CURRENT_ADDRESS_FILL);
    out.push_str("<div class=\"rule\"></div>\n");
    row(out, "Permanent Address", personal.permanent_address, PERMANENT_ADDRESS_FILL);
    out.push_str("<div class=\"rule\"></div>\n");

    out.push_str("</section>\n");
}

fn registree_status(out: &mut String, record: &AlumniRecord) {
    let status = record
        .academic()
        .registree_status
        .and_then(|s| s.parse::<RegistreeStatus>().ok());

    out.push_str("<section class=\"status\">\n<div class=\"row\"><span class=\"status-label\">Registree Status</span><span class=\"sep\">:</span><span>");
    checkbox(out, "Former Student", status == Some(RegistreeStatus::FormerStudent));
    checkbox(out, "Current Student", status == Some(RegistreeStatus::CurrentStudent));
    out.push_str("</span></div>\n</section>\n");
}

fn academic_background(out: &mut String, record: &AlumniRecord) {
    let academic = record.academic();

    out.push_str("<section class=\"academic\">\n<h3>Academic Background:</h3>\n");

    row(out, "Student ID (if available)", academic.student_id, STUDENT_ID_FILL);
    row_pair(
        out,
        "Session",
        academic.session,
        SESSION_FILL,
        "Batch No.:",
        academic.batch_no,
        BATCH_NO_FILL,
    );

    let degree = academic
        .program_degree
        .and_then(|d| d.parse::<ProgramDegree>().ok());
    let other = match &degree {
        Some(ProgramDegree::Other(text)) => Some(text.as_str()),
        _ => None,
    };

    out.push_str("<div class=\"row\"><span class=\"label\">Program/Degree Completed:</span><span>");
    checkbox(out, "B.Sc.", degree == Some(ProgramDegree::BSc));
    checkbox(out, "M.Sc.", degree == Some(ProgramDegree::MSc));
    checkbox(out, "Other (please specify):", other.is_some());
    let _ = writeln!(
        out,
        "<span class=\"aux\">{}</span></span></div>",
        other.map(escape).unwrap_or_else(|| DEGREE_OTHER_FILL.into())
    );

    out.push_str("</section>\n");
}

fn professional_information(out: &mut String, record: &AlumniRecord) {
    let professional = record.professional();

    out.push_str("<section class=\"professional\">\n<h3>Professional Information :</h3>\n");

    row_pair(
        out,
        "Current Occupation",
        professional.current_occupation,
        OCCUPATION_FILL,
        "Organization/Company Name:",
        professional.organization_name,
        ORGANIZATION_FILL,
    );
    out.push_str("<div class=\"rule\"></div>\n");
    row_pair(
        out,
        "Designation/Position",
        professional.designation_position,
        DESIGNATION_FILL,
        "Work Address:",
        professional.work_address,
        WORK_ADDRESS_FILL,
    );
    row(
        out,
        "Professional Email (if different):",
        professional.professional_email,
        PROFESSIONAL_EMAIL_FILL,
    );

    out.push_str("</section>\n");
}

fn engagement(out: &mut String, record: &AlumniRecord) {
    let engagement = record.engagement();

    out.push_str("<section class=\"engagement\">\n<h3>Engagement with the Association</h3>\n");

    out.push_str("<div class=\"row\"><span class=\"question\">Are you interested in actively participating in alumni activities?</span><span>");
    checkbox(out, "Yes", engagement.interested_in_activities);
    checkbox(out, "No", !engagement.interested_in_activities);
    out.push_str("</span></div>\n");

    out.push_str("<div class=\"question\">Areas of Interest (please select all that apply):</div>\n<div class=\"areas\">\n");
    for area in AreaOfInterest::ALL {
        let label = match area {
            AreaOfInterest::Other => "Other (please specify)",
            _ => area.as_ref(),
        };
        let selected = engagement
            .areas_of_interest
            .iter()
            .any(|stored| stored.as_str() == area.as_ref());
        checkbox(out, label, selected);
        out.push('\n');
    }
    out.push_str("</div>\n</section>\n");
}

fn additional_information(out: &mut String, record: &AlumniRecord) {
    out.push_str("<section class=\"additional\">\n<h3>Additional Information</h3>\n");
    out.push_str("<div class=\"question\">Any Suggestions or Messages for the Association:</div>\n");

    for (index, line) in suggestion_lines(record.suggestions_messages.as_deref())
        .iter()
        .enumerate()
    {
        let _ = writeln!(
            out,
            "<div class=\"ruled-line\">{}</div>",
            match line {
                Some(text) => escape(text),
                None => SUGGESTIONS_FILLS[index].into(),
            }
        );
    }

    out.push_str("</section>\n");
}

fn declaration(out: &mut String, record: &AlumniRecord) {
    out.push_str("<section class=\"declaration\">\n<h3>Declaration</h3>\n");
    let _ = writeln!(out, "<p>{}</p>", DECLARATION);
    let _ = writeln!(
        out,
        "<div class=\"sign-row\">\n<div><span class=\"question\">Signature:</span><span class=\"line\"></span></div>\n<div><span class=\"question\">Date:</span><span class=\"date\">{}</span></div>\n</div>",
        format_date(record.created_at.date_naive())
    );
    out.push_str("</section>\n");
}

/// Split the suggestions text over the form's three ruled lines.
/// `None` entries print as the dotted fill of that line.
fn suggestion_lines(text: Option<&str>) -> [Option<String>; 3] {
    let Some(text) = text else {
        return [None, None, None];
    };

    let chars: Vec<char> = text.chars().collect();
    let [first, second] = SUGGESTIONS_BREAKS;

    let line = |from: usize, to: Option<usize>| -> Option<String> {
        if chars.len() <= from {
            return None;
        }
        let slice = match to {
            Some(to) => chars.get(from..to.min(chars.len()))?,
            None => chars.get(from..)?,
        };
        Some(slice.iter().collect())
    };

    [
        line(0, Some(first)),
        line(first, Some(second)),
        line(second, None),
    ]
}

fn row(out: &mut String, label: &str, value: Option<&str>, fill: &str) {
    let _ = writeln!(
        out,
        "<div class=\"row\"><span class=\"label\">{}</span><span class=\"sep\">:</span><span class=\"value\">{}</span></div>",
        label,
        value.map(escape).unwrap_or_else(|| fill.into())
    );
}

/// Two fields sharing one line, like "Session ... Batch No.: ..." on the
/// paper form.
fn row_pair(
    out: &mut String,
    label: &str,
    value: Option<&str>,
    fill: &str,
    aux_label: &str,
    aux_value: Option<&str>,
    aux_fill: &str,
) {
    let _ = writeln!(
        out,
        "<div class=\"row\"><span class=\"label\">{}</span><span class=\"sep\">:</span><span class=\"value\">{}</span><span class=\"aux-label\">{}</span><span class=\"aux\">{}</span></div>",
        label,
        value.map(escape).unwrap_or_else(|| fill.into()),
        aux_label,
        aux_value.map(escape).unwrap_or_else(|| aux_fill.into())
    );
}

fn checkbox(out: &mut String, label: &str, checked: bool) {
    let box_glyph = if checked { CHECKED } else { UNCHECKED };
    let _ = write!(
        out,
        "<label class=\"check\"><span class=\"box\">{}</span>{}</label>",
        box_glyph,
        escape(label)
    );
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
