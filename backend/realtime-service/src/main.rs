use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use asset_store::{AssetResolver, S3AssetResolver};
use realtime_service::{
    config::Config,
    db, error, logging, routes,
    services::projector::{PostProjector, SqlPostProjector},
    state::AppState,
    websocket::{dispatcher::Dispatcher, PeerRegistry},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();

    let cfg = Arc::new(Config::from_env()?);

    let db = db::init_pool(&cfg.database)
        .await
        .map_err(|e| error::AppError::StartServer(format!("db: {e}")))?;

    let resolver: Arc<dyn AssetResolver> =
        Arc::new(S3AssetResolver::connect(cfg.storage.clone()).await);
    let projector: Arc<dyn PostProjector> = Arc::new(SqlPostProjector::new(db.clone()));
    let registry = PeerRegistry::new();

    let dispatcher = Arc::new(Dispatcher::new(
        projector,
        resolver,
        registry,
        cfg.pipeline.resolution_timeout(),
    ));

    let state = AppState {
        db: db.clone(),
        dispatcher,
        config: cfg.clone(),
    };

    let bind_addr = format!("{}:{}", cfg.app.host, cfg.app.port);
    tracing::info!(%bind_addr, "starting realtime-service");

    let allowed_origins = cfg.cors.allowed_origins.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_addr)
    .map_err(|e| error::AppError::StartServer(format!("bind {bind_addr}: {e}")))?
    .run()
    .await
    .map_err(|e| error::AppError::StartServer(e.to_string()))
}
