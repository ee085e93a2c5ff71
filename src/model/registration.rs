use chrono::{DateTime, NaiveDate, Utc};

use serde::Serialize;

use uuid::Uuid;

use crate::domain::{
    AreaOfInterest, EmailAddress, FullName, Gender, PhoneNumber, ProgramDegree, RegistreeStatus,
};

/// Validated registration input, assembled from the submission form before
/// any I/O happens. Optional free-text fields arrive trimmed, with empty
/// values already collapsed to `None`.
#[derive(Debug)]
pub struct NewRegistration {
    pub full_name: FullName,
    pub email_address: EmailAddress,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub mobile_number: Option<PhoneNumber>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_relation: Option<String>,
    pub current_address: Option<String>,
    pub permanent_address: Option<String>,
    pub registree_status: Option<RegistreeStatus>,
    pub student_id: Option<String>,
    pub session: Option<String>,
    pub batch_no: Option<String>,
    pub program_degree: Option<ProgramDegree>,
    pub current_occupation: Option<String>,
    pub organization_name: Option<String>,
    pub designation_position: Option<String>,
    pub work_address: Option<String>,
    pub professional_email: Option<EmailAddress>,
    pub interested_in_activities: bool,
    /// Selection order is preserved; an empty selection is stored as NULL
    pub areas_of_interest: Vec<AreaOfInterest>,
    pub suggestions_messages: Option<String>,
}

/// Stored registration record, flat as the store keeps it.
/// Enumerated fields are plain strings here; the domain enums are applied
/// at the edges (validation on the way in, checkbox matching on the way
/// out), so an unrecognized stored value never panics.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AlumniRecord {
    /// Store-assigned primary key, never set by clients
    pub id: Uuid,
    /// Externally visible identifier, assigned once at creation
    pub serial_id: String,
    pub full_name: String,
    pub email_address: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub mobile_number: Option<String>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_relation: Option<String>,
    pub current_address: Option<String>,
    pub permanent_address: Option<String>,
    pub registree_status: Option<String>,
    pub student_id: Option<String>,
    pub session: Option<String>,
    pub batch_no: Option<String>,
    pub program_degree: Option<String>,
    pub current_occupation: Option<String>,
    pub organization_name: Option<String>,
    pub designation_position: Option<String>,
    pub work_address: Option<String>,
    pub professional_email: Option<String>,
    pub interested_in_activities: bool,
    pub areas_of_interest: Option<Vec<String>>,
    pub suggestions_messages: Option<String>,
    pub photo_url: Option<String>,
    /// Creation and update timestamps
    /// NOTE: Auto-set and updated by database triggers
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlumniRecord {
    pub fn personal(&self) -> PersonalDetails<'_> {
        PersonalDetails {
            full_name: &self.full_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender.as_deref(),
            mobile_number: self.mobile_number.as_deref(),
            email_address: &self.email_address,
            blood_group: self.blood_group.as_deref(),
            emergency_contact: self.emergency_contact.as_deref(),
            emergency_relation: self.emergency_relation.as_deref(),
            current_address: self.current_address.as_deref(),
            permanent_address: self.permanent_address.as_deref(),
        }
    }

    pub fn academic(&self) -> AcademicBackground<'_> {
        AcademicBackground {
            registree_status: self.registree_status.as_deref(),
            student_id: self.student_id.as_deref(),
            session: self.session.as_deref(),
            batch_no: self.batch_no.as_deref(),
            program_degree: self.program_degree.as_deref(),
        }
    }

    pub fn professional(&self) -> ProfessionalInfo<'_> {
        ProfessionalInfo {
            current_occupation: self.current_occupation.as_deref(),
            organization_name: self.organization_name.as_deref(),
            designation_position: self.designation_position.as_deref(),
            work_address: self.work_address.as_deref(),
            professional_email: self.professional_email.as_deref(),
        }
    }

    pub fn engagement(&self) -> Engagement<'_> {
        Engagement {
            interested_in_activities: self.interested_in_activities,
            areas_of_interest: self.areas_of_interest.as_deref().unwrap_or(&[]),
        }
    }
}

/// The store keeps the record flat; these grouped views back the
/// section-by-section layout of the printable form.
#[derive(Debug)]
pub struct PersonalDetails<'a> {
    pub full_name: &'a str,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<&'a str>,
    pub mobile_number: Option<&'a str>,
    pub email_address: &'a str,
    pub blood_group: Option<&'a str>,
    pub emergency_contact: Option<&'a str>,
    pub emergency_relation: Option<&'a str>,
    pub current_address: Option<&'a str>,
    pub permanent_address: Option<&'a str>,
}

#[derive(Debug)]
pub struct AcademicBackground<'a> {
    pub registree_status: Option<&'a str>,
    pub student_id: Option<&'a str>,
    pub session: Option<&'a str>,
    pub batch_no: Option<&'a str>,
    pub program_degree: Option<&'a str>,
}

#[derive(Debug)]
pub struct ProfessionalInfo<'a> {
    pub current_occupation: Option<&'a str>,
    pub organization_name: Option<&'a str>,
    pub designation_position: Option<&'a str>,
    pub work_address: Option<&'a str>,
    pub professional_email: Option<&'a str>,
}

#[derive(Debug)]
pub struct Engagement<'a> {
    pub interested_in_activities: bool,
    pub areas_of_interest: &'a [String],
}

/// Partial edit from the administration console. An outer `None` leaves a
/// field untouched; for optional fields, `Some(None)` clears it.
/// `photo_url` is handled separately by the edit flow (upload semantics).
#[derive(Debug, Default)]
pub struct RecordUpdate {
    pub full_name: Option<FullName>,
    pub email_address: Option<EmailAddress>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub gender: Option<Option<Gender>>,
    pub mobile_number: Option<Option<PhoneNumber>>,
    pub blood_group: Option<Option<String>>,
    pub emergency_contact: Option<Option<String>>,
    pub emergency_relation: Option<Option<String>>,
    pub current_address: Option<Option<String>>,
    pub permanent_address: Option<Option<String>>,
    pub registree_status: Option<Option<RegistreeStatus>>,
    pub student_id: Option<Option<String>>,
    pub session: Option<Option<String>>,
    pub batch_no: Option<Option<String>>,
    pub program_degree: Option<Option<ProgramDegree>>,
    pub current_occupation: Option<Option<String>>,
    pub organization_name: Option<Option<String>>,
    pub designation_position: Option<Option<String>>,
    pub work_address: Option<Option<String>>,
    pub professional_email: Option<Option<EmailAddress>>,
    pub interested_in_activities: Option<bool>,
    pub areas_of_interest: Option<Vec<AreaOfInterest>>,
    pub suggestions_messages: Option<Option<String>>,
}

impl RecordUpdate {
    /// Merge the supplied fields into `record`. `id`, `serial_id`,
    /// `created_at` and `photo_url` are never touched here.
    pub fn apply(&self, record: &mut AlumniRecord) {
        if let Some(full_name) = &self.full_name {
            record.full_name = full_name.as_ref().to_string();
        }
        if let Some(email) = &self.email_address {
            record.email_address = email.as_ref().to_string();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            record.date_of_birth = date_of_birth;
        }
        if let Some(gender) = &self.gender {
            record.gender = gender.map(|g| g.as_ref().to_string());
        }
        if let Some(mobile) = &self.mobile_number {
            record.mobile_number = mobile.as_ref().map(|m| m.as_ref().to_string());
        }
        if let Some(blood_group) = &self.blood_group {
            record.blood_group = blood_group.clone();
        }
        if let Some(contact) = &self.emergency_contact {
            record.emergency_contact = contact.clone();
        }
        if let Some(relation) = &self.emergency_relation {
            record.emergency_relation = relation.clone();
        }
        if let Some(address) = &self.current_address {
            record.current_address = address.clone();
        }
        if let Some(address) = &self.permanent_address {
            record.permanent_address = address.clone();
        }
        if let Some(status) = &self.registree_status {
            record.registree_status = status.map(|s| s.as_ref().to_string());
        }
        if let Some(student_id) = &self.student_id {
            record.student_id = student_id.clone();
        }
        if let Some(session) = &self.session {
            record.session = session.clone();
        }
        if let Some(batch_no) = &self.batch_no {
            record.batch_no = batch_no.clone();
        }
        if let Some(degree) = &self.program_degree {
            record.program_degree = degree.as_ref().map(|d| d.as_ref().to_string());
        }
        if let Some(occupation) = &self.current_occupation {
            record.current_occupation = occupation.clone();
        }
        if let Some(organization) = &self.organization_name {
            record.organization_name = organization.clone();
        }
        if let Some(position) = &self.designation_position {
            record.designation_position = position.clone();
        }
        if let Some(address) = &self.work_address {
            record.work_address = address.clone();
        }
        if let Some(email) = &self.professional_email {
            record.professional_email = email.as_ref().map(|e| e.as_ref().to_string());
        }
        if let Some(interested) = self.interested_in_activities {
            record.interested_in_activities = interested;
        }
        if let Some(areas) = &self.areas_of_interest {
            record.areas_of_interest = if areas.is_empty() {
                None
            } else {
                Some(areas.iter().map(|a| a.as_ref().to_string()).collect())
            };
        }
        if let Some(suggestions) = &self.suggestions_messages {
            record.suggestions_messages = suggestions.clone();
        }
    }
}

/// Free-text filter over an already-fetched snapshot: case-insensitive
/// substring match against serial ID, full name, email and student ID.
/// Pure; re-evaluated per keystroke without touching the store.
pub fn filter<'a>(snapshot: &'a [AlumniRecord], term: &str) -> Vec<&'a AlumniRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return snapshot.iter().collect();
    }

    snapshot
        .iter()
        .filter(|record| {
            record.serial_id.to_lowercase().contains(&term)
                || record.full_name.to_lowercase().contains(&term)
                || record.email_address.to_lowercase().contains(&term)
                || record
                    .student_id
                    .as_deref()
                    .is_some_and(|id| id.to_lowercase().contains(&term))
        })
        .collect()
}
