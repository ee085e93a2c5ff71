use sqlx::PgPool;

use crate::helpers::TestApp;

#[sqlx::test(migrations = "./migrations")]
async fn health_check_reports_live_store(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app.health_check().await.expect("Failed to execute request");

    assert!(res.status().is_success());
    assert_eq!("I am alive", res.text().await.expect("Failed to read body"));

    Ok(())
}
