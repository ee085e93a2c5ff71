use actix_web::dev::HttpServiceFactory;
use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

use chrono::{NaiveDate, Utc};

use serde::{Deserialize, Deserializer, Serialize};

use sqlx::PgPool;

use uuid::Uuid;

use crate::auth::Administrator;
use crate::client::PhotoStore;
use crate::domain::{AreaOfInterest, Gender, PhoneNumber, ProgramDegree, RegistreeStatus};
use crate::error::{RestError, RestResult};
use crate::model::{self, AlumniRecord, RecordUpdate};
use crate::render;
use crate::repo::{PgRegistrationRepo, RegistrationRepo};

use super::registrations::{optional, upload_photo, PhotoAttachment, PhotoUpload};

#[derive(Debug, Deserialize)]
struct ListQuery {
    /// Free-text filter over the fetched snapshot
    #[serde(default)]
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    /// Count of all stored registrations
    total: i64,
    /// Count after applying the filter term
    filtered: usize,
    records: Vec<AlumniRecord>,
}

#[tracing::instrument(name = "List registrations", skip(_admin, pool))]
#[get("")]
async fn list(
    _admin: Administrator,
    query: web::Query<ListQuery>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let pool = pool.get_ref();

    let snapshot = PgRegistrationRepo::fetch_all(pool).await?;
    let total = PgRegistrationRepo::count(pool).await?;

    let records: Vec<AlumniRecord> = match query.q.as_deref() {
        Some(term) => model::filter(&snapshot, term).into_iter().cloned().collect(),
        None => snapshot,
    };

    Ok(web::Json(ListResponse {
        total,
        filtered: records.len(),
        records,
    }))
}

/// Partial edit form. A field left out of the payload is untouched;
/// an optional field sent as null or blank is cleared.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email_address: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    mobile_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    blood_group: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    emergency_contact: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    emergency_relation: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    current_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    permanent_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    registree_status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    student_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    session: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    batch_no: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    program_degree: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    current_occupation: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    organization_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    designation_position: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    work_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    professional_email: Option<Option<String>>,
    #[serde(default)]
    interested_in_activities: Option<bool>,
    #[serde(default)]
    areas_of_interest: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    suggestions_messages: Option<Option<String>>,
    #[serde(default)]
    photo: Option<PhotoUpload>,
    /// Explicitly drop the stored photo. Ignored when a new upload
    /// succeeds; honored when there is no upload or the upload failed.
    #[serde(default)]
    clear_photo: bool,
}

/// Deserialize a present-but-null field as `Some(None)`, leaving an absent
/// field as `None`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

impl TryInto<RecordUpdate> for UpdateForm {
    type Error = String;

    fn try_into(self) -> Result<RecordUpdate, String> {
        let full_name = self
            .full_name
            .map(|name| name.parse())
            .transpose()?;
        let email_address = self
            .email_address
            .map(|email| email.parse())
            .transpose()?;
        let gender: Option<Option<Gender>> = parse_shaped(self.gender)?;
        let mobile_number: Option<Option<PhoneNumber>> = parse_shaped(self.mobile_number)?;
        let registree_status: Option<Option<RegistreeStatus>> =
            parse_shaped(self.registree_status)?;
        let program_degree: Option<Option<ProgramDegree>> = parse_shaped(self.program_degree)?;
        let professional_email = parse_shaped(self.professional_email)?;
        let areas_of_interest = self
            .areas_of_interest
            .map(|areas| {
                areas
                    .iter()
                    .map(|area| area.parse())
                    .collect::<Result<Vec<AreaOfInterest>, String>>()
            })
            .transpose()?;

        Ok(RecordUpdate {
            full_name,
            email_address,
            date_of_birth: self.date_of_birth,
            gender,
            mobile_number,
            blood_group: self.blood_group.map(optional),
            emergency_contact: self.emergency_contact.map(optional),
            emergency_relation: self.emergency_relation.map(optional),
            current_address: self.current_address.map(optional),
            permanent_address: self.permanent_address.map(optional),
            registree_status,
            student_id: self.student_id.map(optional),
            session: self.session.map(optional),
            batch_no: self.batch_no.map(optional),
            program_degree,
            current_occupation: self.current_occupation.map(optional),
            organization_name: self.organization_name.map(optional),
            designation_position: self.designation_position.map(optional),
            work_address: self.work_address.map(optional),
            professional_email,
            interested_in_activities: self.interested_in_activities,
            areas_of_interest,
            suggestions_messages: self.suggestions_messages.map(optional),
        })
    }
}

/// Shape a supplied optional: blank collapses to a clear, other values
/// must parse
fn parse_shaped<T>(value: Option<Option<String>>) -> Result<Option<Option<T>>, String>
where
    T: std::str::FromStr<Err = String>,
{
    match value.map(optional) {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(value)) => Ok(Some(Some(value.parse()?))),
    }
}

#[tracing::instrument(name = "Update a registration", skip(_admin, form, pool, photo_store))]
#[patch("/{id}")]
async fn update(
    _admin: Administrator,
    path: web::Path<Uuid>,
    form: web::Json<UpdateForm>,
    pool: web::Data<PgPool>,
    photo_store: web::Data<PhotoStore>,
) -> RestResult<impl Responder> {
    let pool = pool.get_ref();
    let id = path.into_inner();
    let mut form = form.into_inner();

    let photo = form
        .photo
        .take()
        .map(PhotoAttachment::try_from)
        .transpose()
        .map_err(RestError::Validation)?;
    let clear_photo = form.clear_photo;
    let update: RecordUpdate = form.try_into().map_err(RestError::Validation)?;

    // Read-modify-write without a lock: last writer wins
    let mut record = PgRegistrationRepo::fetch_by_id(pool, id)
        .await?
        .ok_or(RestError::NotFound)?;
    update.apply(&mut record);

    if let Some(attachment) = photo {
        // Timestamped key so an edit never overwrites the original upload
        let key = format!(
            "{}-{}.{}",
            record.serial_id,
            Utc::now().timestamp(),
            attachment.extension
        );
        match upload_photo(&photo_store, &key, attachment, false).await {
            Some(url) => record.photo_url = Some(url.to_string()),
            // Upload failure keeps the previous photo unless the admin
            // explicitly cleared it
            None if clear_photo => record.photo_url = None,
            None => {}
        }
    } else if clear_photo {
        record.photo_url = None;
    }

    let updated = PgRegistrationRepo::update(pool, &record).await?;

    Ok(web::Json(updated))
}

#[tracing::instrument(name = "Delete a registration", skip(_admin, pool))]
#[delete("/{id}")]
async fn delete_one(
    _admin: Administrator,
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    PgRegistrationRepo::delete(pool.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::NoContent())
}

#[derive(Debug, Deserialize)]
struct DeleteManyBody {
    ids: Vec<Uuid>,
}

#[tracing::instrument(name = "Delete registrations", skip(_admin, pool))]
#[post("/delete")]
async fn delete_many(
    _admin: Administrator,
    body: web::Json<DeleteManyBody>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    if body.ids.is_empty() {
        return Err(RestError::Validation("No records selected".into()));
    }

    // One batch statement; not atomic per record if the store fails midway
    PgRegistrationRepo::delete_many(pool.get_ref(), &body.ids).await?;

    Ok(HttpResponse::NoContent())
}

#[tracing::instrument(name = "Export registrations as CSV", skip(_admin, pool))]
#[get("/export")]
async fn export_csv(_admin: Administrator, pool: web::Data<PgPool>) -> RestResult<impl Responder> {
    let records = PgRegistrationRepo::fetch_all(pool.get_ref()).await?;

    let body = render::csv::export(&records);
    let file_name = render::csv::export_file_name(Utc::now().date_naive());

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(body))
}

#[derive(Debug, Deserialize)]
struct PrintQuery {
    /// Comma-separated record IDs, in selection order
    ids: String,
}

#[tracing::instrument(name = "Print selected registrations", skip(_admin, pool))]
#[get("/print")]
async fn print_selection(
    _admin: Administrator,
    query: web::Query<PrintQuery>,
    pool: web::Data<PgPool>,
) -> RestResult<impl Responder> {
    let ids = query
        .ids
        .split(',')
        .map(|id| id.trim().parse::<Uuid>())
        .collect::<Result<Vec<Uuid>, _>>()
        .map_err(|_| RestError::Validation("Malformed record ID in selection".into()))?;

    if ids.is_empty() {
        return Err(RestError::Validation("No records selected".into()));
    }

    // Reuse the console's snapshot read, then keep the selection in order.
    // A single multi-page document replaces the old one-popup-per-record
    // print loop.
    let snapshot = PgRegistrationRepo::fetch_all(pool.get_ref()).await?;
    let selection: Vec<AlumniRecord> = ids
        .iter()
        .filter_map(|id| snapshot.iter().find(|record| record.id == *id))
        .cloned()
        .collect();

    if selection.is_empty() {
        return Err(RestError::NotFound);
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render::print::render_batch(&selection)))
}

/// Administration console endpoints; every handler takes the signed-in
/// `Administrator` principal
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/admin/registrations")
        .service(list)
        .service(export_csv)
        .service(print_selection)
        .service(delete_many)
        .service(update)
        .service(delete_one)
}
