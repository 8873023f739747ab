//! Federation Gateway Server Binary
//!
//! Wires configuration, the authentication engine, the session cache and
//! its reaper, and the federation pipeline, then serves the HTTP API.

use std::env;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fedgate_auth::{AuthEngine, LdapDirectory};
use fedgate_server::storage::MappingStore;
use fedgate_server::{
    create_router, AppState, AuditRecorder, Authorizer, CookieCodec, FederationService,
    GatewayConfig, MemoryMappingStore, SessionCache, StsTokenService, VaultSecretStore,
};

#[tokio::main]
async fn main() {
    // Initialize logging
    let log_level = env::var("FEDGATE_LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = GatewayConfig::from_env().expect("Invalid configuration");

    // Authentication engine
    let mut engine = AuthEngine::new(config.auth.clone());
    if let Some(ldap) = config.ldap.clone() {
        let directory = Arc::new(LdapDirectory::new(ldap.clone()));
        engine = engine.with_directory(ldap, directory);
    }
    if let Some(static_secret) = config.static_secret.clone() {
        engine = engine.with_static_secret(static_secret);
    }

    // Role-mapping storage
    // TODO: select PostgresMappingStore when built with the postgres feature
    // and DATABASE_URL is set
    let store: Arc<dyn MappingStore> = Arc::new(MemoryMappingStore::new());

    // Session cache and reaper; the sweep interval is the active timeout
    let sessions = Arc::new(SessionCache::new());
    let reaper = sessions.start_reaper(config.session_active_timeout);

    let cookies = match &config.cookie_key {
        Some(key) => CookieCodec::from_base64(key).expect("Invalid FEDGATE_COOKIE_KEY"),
        None => {
            info!("FEDGATE_COOKIE_KEY not set; sessions will not survive a restart");
            CookieCodec::generate()
        }
    };

    let secrets = Arc::new(
        VaultSecretStore::new(
            config.vault_address.clone(),
            config.vault_token.clone(),
            config.upstream_timeout,
        )
        .expect("Failed to build secret store client"),
    );
    let token_service = Arc::new(StsTokenService::new(config.sts_region.clone()));

    let federation = FederationService::new(
        Authorizer::new(store),
        secrets,
        token_service,
        AuditRecorder::tracing(),
        config.default_session_name_template.clone(),
        config.secret_path_prefix.clone(),
    );

    let state = Arc::new(AppState {
        engine,
        sessions,
        cookies,
        federation,
        session_active_timeout: config.session_active_timeout,
        session_total_duration: config.session_total_duration,
    });

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %addr, "Federation gateway listening");

    axum::serve(listener, app).await.expect("Server error");

    reaper.abort();
}
