//! Balanza API Server
//!
//! Main entry point for the Balanza backend service.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balanza_api::{AppState, DynFiscalPipeline, create_router};
use balanza_core::storage::{StorageConfig, StorageProvider, StorageService};
use balanza_db::connect;
use balanza_db::repositories::FiscalInfoRepository;
use balanza_shared::AppConfig;
use balanza_sri::fakes::{FakeSigner, ScriptedAuthority, StaticXmlBuilder};
use balanza_sri::{AuthorityClient, DigitalSigner, FiscalPipeline, RetrySweeper, XmlBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balanza=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Blob storage for signed XML and certificates
    let storage_root = std::env::var("BALANZA__STORAGE__ROOT")
        .unwrap_or_else(|_| "./storage".to_string());
    let storage = Arc::new(StorageService::from_config(&StorageConfig::new(
        StorageProvider::local_fs(storage_root),
    ))?);

    // Collaborator ports. The signing service and the authority's SOAP
    // transport are deployment-specific; the in-memory stand-ins below are
    // replaced by the deployment's implementations when wiring a real
    // environment.
    let signer: Arc<dyn DigitalSigner> = Arc::new(FakeSigner::new(
        "sandbox",
        "0000000000000000000000000000000000000000000000000",
    ));
    let authority: Arc<dyn AuthorityClient> = Arc::new(ScriptedAuthority::new());
    let xml_builder: Arc<dyn XmlBuilder> = Arc::new(StaticXmlBuilder::new("<factura/>"));

    let pipeline: Arc<DynFiscalPipeline> = Arc::new(FiscalPipeline::new(
        db.clone(),
        storage,
        signer,
        authority,
        xml_builder,
        config.sri.clone(),
    ));

    // Background retry sweep for in-process authorizations
    let sweeper = RetrySweeper::new(
        Arc::clone(&pipeline),
        FiscalInfoRepository::new(db.clone()),
    );
    let sweep_interval = Duration::from_secs(config.sri.sweep_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = sweeper.sweep_pending().await {
                error!(error = %e, "retry sweep failed");
            }
        }
    });

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        pipeline,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
