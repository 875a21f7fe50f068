use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use serde_json::json;
use service::partner::{repo::seaorm::SeaOrmPartnerRepository, PartnerRepository};
use tokio::net::TcpListener;
use uuid::Uuid;

use server::routes::{self, ServerState};
use server::startup::build_cors;

struct TestApp {
    base_url: String,
    db: DatabaseConnection,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Use DATABASE_URL from environment; if not present, skip tests gracefully
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from_env()).await?;
    migration::Migrator::up(&db, None).await?;

    let repo: Arc<dyn PartnerRepository> = Arc::new(SeaOrmPartnerRepository::new(db.clone()));
    let app: Router = routes::build_router(ServerState::new(repo), build_cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, db })
}

async fn delete_partner(db: &DatabaseConnection, id: &str) -> anyhow::Result<()> {
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "DELETE FROM partners WHERE id = $1",
        [Uuid::parse_str(id)?.into()],
    ))
    .await?;
    Ok(())
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_create_get_search_over_postgis() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = reqwest::Client::new();

    let document = format!("e2e_{}", Uuid::new_v4());
    let body = json!({
        "tradingName": "Adega Sul",
        "ownerName": "Maria",
        "document": document,
        "coverageArea": {"type": "MultiPolygon", "coordinates": [[[[50.0, 50.0], [51.0, 50.0], [51.0, 51.0], [50.0, 51.0], [50.0, 50.0]]]]},
        "address": {"type": "Point", "coordinates": [50.5, 50.5]}
    });

    let res = c.post(format!("{}/partners", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created = res.json::<serde_json::Value>().await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = c.get(format!("{}/partners/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let fetched = res.json::<serde_json::Value>().await?;
    assert_eq!(fetched["coverageArea"], body["coverageArea"]);
    assert_eq!(fetched["address"], body["address"]);

    let res = c.get(format!("{}/partners/search?lat=50.5&long=50.5", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?["id"], created["id"]);

    let res = c.post(format!("{}/partners", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    delete_partner(&app.db, &id).await
}
