use sqlx::{Executor, PgExecutor};

use uuid::Uuid;

use crate::domain::SerialId;
use crate::model::{AlumniRecord, NewRegistration};

const INSERT_SQL: &str = "\
    insert into alumni_registrations( \
        serial_id, full_name, email_address, date_of_birth, gender, \
        mobile_number, blood_group, emergency_contact, emergency_relation, \
        current_address, permanent_address, registree_status, student_id, \
        session, batch_no, program_degree, current_occupation, \
        organization_name, designation_position, work_address, \
        professional_email, interested_in_activities, areas_of_interest, \
        suggestions_messages, photo_url) \
    values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
        $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25) \
    returning *";

const UPDATE_SQL: &str = "\
    update alumni_registrations set \
        full_name=$2, email_address=$3, date_of_birth=$4, gender=$5, \
        mobile_number=$6, blood_group=$7, emergency_contact=$8, \
        emergency_relation=$9, current_address=$10, permanent_address=$11, \
        registree_status=$12, student_id=$13, session=$14, batch_no=$15, \
        program_degree=$16, current_occupation=$17, organization_name=$18, \
        designation_position=$19, work_address=$20, professional_email=$21, \
        interested_in_activities=$22, areas_of_interest=$23, \
        suggestions_messages=$24, photo_url=$25 \
    where id=$1 \
    returning *";

/// Registration repository trait, must be implemented for each database used.
/// NOTE: Intended to facilitate easier testing/mocking
/// TODO: Swap async-trait for std async traits when those become stable
/// https://github.com/orgs/rust-lang/projects/28/views/2?pane=issue&itemId=21990165
#[async_trait::async_trait]
pub trait RegistrationRepo {
    type DB: sqlx::Database;

    /// Cheap connectivity probe; gates submission before any identifier
    /// is generated
    async fn ping<'con>(executor: impl Executor<'con, Database = Self::DB>) -> sqlx::Result<()>;

    /// Insert a new registration and return the stored row
    async fn insert<'con>(
        executor: impl Executor<'con, Database = Self::DB>,
        serial_id: &SerialId,
        new_registration: &NewRegistration,
        photo_url: Option<&str>,
    ) -> sqlx::Result<AlumniRecord>;

    /// Fetch every registration, newest first
    async fn fetch_all<'con>(
        executor: impl Executor<'con, Database = Self::DB>,
    ) -> sqlx::Result<Vec<AlumniRecord>>;

    /// Exact-match lookup by the externally visible identifier.
    /// `None` is the normal miss outcome, not an error
    async fn fetch_by_serial_id<'con>(
        executor: impl Executor<'con, Database = Self::DB>,
        serial_id: &SerialId,
    ) -> sqlx::Result<Option<AlumniRecord>>;

    /// Fetch one registration by primary key (read side of the console's
    /// read-modify-write edit)
    async fn fetch_by_id<'con>(
        executor: impl Executor<'con, Database = Self::DB>,
        id: Uuid,
    ) -> sqlx::Result<Option<AlumniRecord>>;

    /// Write back an edited record. Last writer wins; `serial_id` and
    /// `created_at` are never written
    async fn update<'con>(
        executor: impl Executor<'con, Database = Self::DB>,
        record: &AlumniRecord,
    ) -> sqlx::Result<AlumniRecord>;

    /// Hard delete by primary key
    async fn delete<'con>(
        executor: impl Executor<'con, Database = Self::DB>,
        id: Uuid,
    ) -> sqlx::Result<()>;

    /// Hard delete a batch in one statement; returns the number of rows
    /// actually removed
    async fn delete_many<'con>(
        executor: impl Executor<'con, Database = Self::DB>,
        ids: &[Uuid],
    ) -> sqlx::Result<u64>;

    async fn count<'con>(executor: impl Executor<'con, Database = Self::DB>)
        -> sqlx::Result<i64>;
}

/// Postgres Registration Repository
#[derive(Debug)]
pub struct PgRegistrationRepo;

#[async_trait::async_trait]
impl RegistrationRepo for PgRegistrationRepo {
    type DB = sqlx::Postgres;

    #[tracing::instrument(name = "Ping record store", skip(executor))]
    async fn ping<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<()> {
        sqlx::query("select 1").execute(executor).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Insert registration", skip(executor, new_registration))]
    async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        serial_id: &SerialId,
        new_registration: &NewRegistration,
        photo_url: Option<&str>,
    ) -> sqlx::Result<AlumniRecord> {
        let gender: Option<&str> = new_registration.gender.as_ref().map(|g| g.as_ref());
        let mobile_number: Option<&str> =
            new_registration.mobile_number.as_ref().map(|m| m.as_ref());
        let registree_status: Option<&str> =
            new_registration.registree_status.as_ref().map(|s| s.as_ref());
        let program_degree: Option<&str> =
            new_registration.program_degree.as_ref().map(|d| d.as_ref());
        let professional_email: Option<&str> =
            new_registration.professional_email.as_ref().map(|e| e.as_ref());
        let areas_of_interest: Option<Vec<String>> =
            if new_registration.areas_of_interest.is_empty() {
                None
            } else {
                Some(
                    new_registration
                        .areas_of_interest
                        .iter()
                        .map(|a| a.as_ref().to_string())
                        .collect(),
                )
            };

        sqlx::query_as::<_, AlumniRecord>(INSERT_SQL)
            .bind(serial_id.as_ref())
            .bind(new_registration.full_name.as_ref())
            .bind(new_registration.email_address.as_ref())
            .bind(new_registration.date_of_birth)
            .bind(gender)
            .bind(mobile_number)
            .bind(new_registration.blood_group.as_deref())
            .bind(new_registration.emergency_contact.as_deref())
            .bind(new_registration.emergency_relation.as_deref())
            .bind(new_registration.current_address.as_deref())
            .bind(new_registration.permanent_address.as_deref())
            .bind(registree_status)
            .bind(new_registration.student_id.as_deref())
            .bind(new_registration.session.as_deref())
            .bind(new_registration.batch_no.as_deref())
            .bind(program_degree)
            .bind(new_registration.current_occupation.as_deref())
            .bind(new_registration.organization_name.as_deref())
            .bind(new_registration.designation_position.as_deref())
            .bind(new_registration.work_address.as_deref())
            .bind(professional_email)
            .bind(new_registration.interested_in_activities)
            .bind(areas_of_interest)
            .bind(new_registration.suggestions_messages.as_deref())
            .bind(photo_url)
            .fetch_one(executor)
            .await
    }

    #[tracing::instrument(name = "Fetch all registrations", skip(executor))]
    async fn fetch_all<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<Vec<AlumniRecord>> {
        sqlx::query_as::<_, AlumniRecord>(
            "select * from alumni_registrations order by created_at desc",
        )
        .fetch_all(executor)
        .await
    }

    #[tracing::instrument(name = "Fetch registration by serial ID", skip(executor))]
    async fn fetch_by_serial_id<'con>(
        executor: impl PgExecutor<'con>,
        serial_id: &SerialId,
    ) -> sqlx::Result<Option<AlumniRecord>> {
        sqlx::query_as::<_, AlumniRecord>(
            "select * from alumni_registrations where serial_id=$1",
        )
        .bind(serial_id.as_ref())
        .fetch_optional(executor)
        .await
    }

    #[tracing::instrument(name = "Fetch registration by id", skip(executor))]
    async fn fetch_by_id<'con>(
        executor: impl PgExecutor<'con>,
        id: Uuid,
    ) -> sqlx::Result<Option<AlumniRecord>> {
        sqlx::query_as::<_, AlumniRecord>("select * from alumni_registrations where id=$1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument(name = "Update registration", skip(executor, record))]
    async fn update<'con>(
        executor: impl PgExecutor<'con>,
        record: &AlumniRecord,
    ) -> sqlx::Result<AlumniRecord> {
        sqlx::query_as::<_, AlumniRecord>(UPDATE_SQL)
            .bind(record.id)
            .bind(&record.full_name)
            .bind(&record.email_address)
            .bind(record.date_of_birth)
            .bind(&record.gender)
            .bind(&record.mobile_number)
            .bind(&record.blood_group)
            .bind(&record.emergency_contact)
            .bind(&record.emergency_relation)
            .bind(&record.current_address)
            .bind(&record.permanent_address)
            .bind(&record.registree_status)
            .bind(&record.student_id)
            .bind(&record.session)
            .bind(&record.batch_no)
            .bind(&record.program_degree)
            .bind(&record.current_occupation)
            .bind(&record.organization_name)
            .bind(&record.designation_position)
            .bind(&record.work_address)
            .bind(&record.professional_email)
            .bind(record.interested_in_activities)
            .bind(&record.areas_of_interest)
            .bind(&record.suggestions_messages)
            .bind(&record.photo_url)
            .fetch_one(executor)
            .await
    }

    #[tracing::instrument(name = "Delete registration", skip(executor))]
    async fn delete<'con>(executor: impl PgExecutor<'con>, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("delete from alumni_registrations where id=$1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    #[tracing::instrument(name = "Delete registrations", skip(executor))]
    async fn delete_many<'con>(
        executor: impl PgExecutor<'con>,
        ids: &[Uuid],
    ) -> sqlx::Result<u64> {
        let result = sqlx::query("delete from alumni_registrations where id = any($1)")
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "Count registrations", skip(executor))]
    async fn count<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("select count(*) from alumni_registrations")
            .fetch_one(executor)
            .await
    }
}
