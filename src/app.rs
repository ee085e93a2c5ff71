use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, web, App, HttpServer, Responder};

use sqlx::PgPool;

use tracing_actix_web::TracingLogger;

use crate::client::PhotoStore;
use crate::controller::{admin, registrations};
use crate::error::{RestError, RestResult};
use crate::repo::{PgRegistrationRepo, RegistrationRepo};

/// Health-check endpoint doubling as the record-store connectivity probe
#[tracing::instrument(name = "Health check", skip(pool))]
#[get("/health_check")]
async fn health_check(pool: web::Data<PgPool>) -> RestResult<impl Responder> {
    PgRegistrationRepo::ping(pool.get_ref())
        .await
        .map_err(RestError::Connectivity)?;

    Ok("I am alive")
}

/// Run the application on a specified TCP listener
pub fn run(listener: TcpListener, pool: PgPool, photo_store: PhotoStore) -> anyhow::Result<Server> {
    // Wrap application data
    let pool = web::Data::new(pool);
    let photo_store = web::Data::new(photo_store);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(photo_store.clone())
            .service(health_check)
            .service(registrations::scope())
            .service(admin::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
