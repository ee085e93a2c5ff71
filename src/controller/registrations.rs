use actix_web::dev::HttpServiceFactory;
use actix_web::http::header::ContentType;
use actix_web::{get, post, web, HttpResponse, Responder};

use chrono::NaiveDate;

use serde::{Deserialize, Serialize};

use sqlx::PgPool;

use url::Url;

use crate::client::PhotoStore;
use crate::domain::{AreaOfInterest, Gender, PhoneNumber, ProgramDegree, RegistreeStatus, SerialId};
use crate::error::{RestError, RestResult};
use crate::model::NewRegistration;
use crate::render;
use crate::repo::{PgRegistrationRepo, RegistrationRepo};

/// Upload ceiling enforced before any blob-store call
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Submission form, one field per form input. Optional inputs may arrive
/// absent, null or blank; all three collapse to "not provided".
#[derive(Debug, Deserialize)]
pub struct RegistrationForm {
    full_name: String,
    email_address: String,
    #[serde(default)]
    date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    mobile_number: Option<String>,
    #[serde(default)]
    blood_group: Option<String>,
    #[serde(default)]
    emergency_contact: Option<String>,
    #[serde(default)]
    emergency_relation: Option<String>,
    #[serde(default)]
    current_address: Option<String>,
    #[serde(default)]
    permanent_address: Option<String>,
    #[serde(default)]
    registree_status: Option<String>,
    #[serde(default)]
    student_id: Option<String>,
    #[serde(default)]
    session: Option<String>,
    #[serde(default)]
    batch_no: Option<String>,
    #[serde(default)]
    program_degree: Option<String>,
    #[serde(default)]
    current_occupation: Option<String>,
    #[serde(default)]
    organization_name: Option<String>,
    #[serde(default)]
    designation_position: Option<String>,
    #[serde(default)]
    work_address: Option<String>,
    #[serde(default)]
    professional_email: Option<String>,
    #[serde(default)]
    interested_in_activities: bool,
    #[serde(default)]
    areas_of_interest: Vec<String>,
    #[serde(default)]
    suggestions_messages: Option<String>,
    #[serde(default)]
    pub(super) photo: Option<PhotoUpload>,
}

impl TryInto<NewRegistration> for RegistrationForm {
    type Error = String;

    fn try_into(self) -> Result<NewRegistration, String> {
        let full_name = self.full_name.parse()?;
        let email_address = self.email_address.parse()?;
        let gender: Option<Gender> = parse_optional(self.gender)?;
        let mobile_number: Option<PhoneNumber> = parse_optional(self.mobile_number)?;
        let registree_status: Option<RegistreeStatus> = parse_optional(self.registree_status)?;
        let program_degree: Option<ProgramDegree> = parse_optional(self.program_degree)?;
        let professional_email = parse_optional(self.professional_email)?;
        let areas_of_interest = self
            .areas_of_interest
            .iter()
            .map(|area| area.parse())
            .collect::<Result<Vec<AreaOfInterest>, String>>()?;

        Ok(NewRegistration {
            full_name,
            email_address,
            date_of_birth: self.date_of_birth,
            gender,
            mobile_number,
            blood_group: optional(self.blood_group),
            emergency_contact: optional(self.emergency_contact),
            emergency_relation: optional(self.emergency_relation),
            current_address: optional(self.current_address),
            permanent_address: optional(self.permanent_address),
            registree_status,
            student_id: optional(self.student_id),
            session: optional(self.session),
            batch_no: optional(self.batch_no),
            program_degree,
            current_occupation: optional(self.current_occupation),
            organization_name: optional(self.organization_name),
            designation_position: optional(self.designation_position),
            work_address: optional(self.work_address),
            professional_email,
            interested_in_activities: self.interested_in_activities,
            areas_of_interest,
            suggestions_messages: optional(self.suggestions_messages),
        })
    }
}

/// Trim a free-text input, collapsing blank values to "not provided"
pub(super) fn optional(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

pub(super) fn parse_optional<T>(value: Option<String>) -> Result<Option<T>, String>
where
    T: std::str::FromStr<Err = String>,
{
    optional(value).map(|value| value.parse()).transpose()
}

/// Inline photo payload attached to a submission or an admin edit
#[derive(Debug, Deserialize)]
pub struct PhotoUpload {
    file_name: String,
    content_type: String,
    /// Base64-encoded image bytes
    data: String,
}

/// Validated photo payload, ready for the blob store
#[derive(Debug)]
pub(super) struct PhotoAttachment {
    pub extension: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl TryFrom<PhotoUpload> for PhotoAttachment {
    type Error = String;

    fn try_from(upload: PhotoUpload) -> Result<Self, String> {
        use base64::Engine;

        if !upload.content_type.starts_with("image/") {
            return Err("Photo must be an image".into());
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(upload.data.as_bytes())
            .map_err(|_| "Photo data is not valid base64".to_string())?;

        if bytes.is_empty() {
            return Err("Photo file is empty".into());
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err("Photo must be 10 MB or smaller".into());
        }

        let extension = upload
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "img".into());

        Ok(Self {
            extension,
            content_type: upload.content_type,
            bytes,
        })
    }
}

/// Upload a validated photo, downgrading failure to a warning: the
/// registration goes through without the photo
pub(super) async fn upload_photo(
    photo_store: &PhotoStore,
    key: &str,
    attachment: PhotoAttachment,
    upsert: bool,
) -> Option<Url> {
    match photo_store
        .upload(key, &attachment.content_type, attachment.bytes, upsert)
        .await
    {
        Ok(url) => Some(url),
        Err(error) => {
            tracing::warn!(
                error.cause_chain = ?error,
                "Photo upload failed for key {}", key
            );
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    serial_id: String,
}

#[tracing::instrument(name = "Submit a registration", skip(form, pool, photo_store))]
#[post("")]
async fn submit(
    form: web::Json<RegistrationForm>,
    pool: web::Data<PgPool>,
    photo_store: web::Data<PhotoStore>,
) -> RestResult<impl Responder> {
    let pool = pool.get_ref();
    let mut form = form.into_inner();

    // Fail fast on bad input, before any I/O
    let photo = form
        .photo
        .take()
        .map(PhotoAttachment::try_from)
        .transpose()
        .map_err(RestError::Validation)?;
    let new_registration: NewRegistration = form.try_into().map_err(RestError::Validation)?;

    // An unreachable store blocks the submission entirely; no identifier
    // is generated
    PgRegistrationRepo::ping(pool)
        .await
        .map_err(RestError::Connectivity)?;

    let serial_id = SerialId::generate();

    let mut photo_key = None;
    let mut photo_url = None;
    if let Some(attachment) = photo {
        let key = format!("{}.{}", serial_id, attachment.extension);
        photo_url = upload_photo(&photo_store, &key, attachment, false).await;
        if photo_url.is_some() {
            photo_key = Some(key);
        }
    }

    let photo_url = photo_url.map(|url| url.to_string());
    let inserted =
        PgRegistrationRepo::insert(pool, &serial_id, &new_registration, photo_url.as_deref()).await;

    match inserted {
        Ok(record) => Ok(HttpResponse::Created().json(SubmitResponse {
            serial_id: record.serial_id,
        })),
        Err(error) => {
            // Compensate the now-orphaned blob; best effort only
            if let Some(key) = photo_key {
                if let Err(delete_error) = photo_store.delete(&key).await {
                    tracing::warn!(
                        error.cause_chain = ?delete_error,
                        "Failed to delete orphaned photo blob {}", key
                    );
                }
            }
            Err(error.into())
        }
    }
}

#[tracing::instrument(name = "Look up a registration", skip(pool))]
#[get("/{serial_id}")]
async fn lookup(path: web::Path<String>, pool: web::Data<PgPool>) -> RestResult<impl Responder> {
    let serial_id: SerialId = path
        .into_inner()
        .parse()
        .map_err(RestError::Validation)?;

    let record = PgRegistrationRepo::fetch_by_serial_id(pool.get_ref(), &serial_id)
        .await?
        .ok_or(RestError::NotFound)?;

    Ok(web::Json(record))
}

#[tracing::instrument(name = "Print a registration", skip(pool))]
#[get("/{serial_id}/print")]
async fn print(path: web::Path<String>, pool: web::Data<PgPool>) -> RestResult<impl Responder> {
    let serial_id: SerialId = path
        .into_inner()
        .parse()
        .map_err(RestError::Validation)?;

    let record = PgRegistrationRepo::fetch_by_serial_id(pool.get_ref(), &serial_id)
        .await?
        .ok_or(RestError::NotFound)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render::print::render(&record)))
}

/// Public registration endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/registrations")
        .service(submit)
        .service(print)
        .service(lookup)
}
