use std::{fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE, InvalidHeaderValue},
    },
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use finance_tracker::{
    AppState, PaginationConfig, PasswordHash, TokenService, build_router, graceful_shutdown,
    logging_middleware,
};

const MAX_TOKEN_LIFETIME_HOURS: i64 = 10 * 365 * 24;

/// The REST API server for tracking personal finances.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Created if it does not exist.
    #[arg(long, env = "DB_PATH", default_value = "finance_tracker.db")]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// The secret used to sign and verify bearer tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// How many hours a token is valid for after it is issued, at most ten years.
    #[arg(
        long,
        env = "TOKEN_LIFETIME_HOURS",
        default_value_t = 72,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_LIFETIME_HOURS)
    )]
    token_lifetime_hours: i64,

    /// The origin that browsers may call the API from. Any origin is allowed if not set.
    #[arg(long, env = "ALLOWED_ORIGIN")]
    allowed_origin: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging() {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    let token_service = match TokenService::new(
        &args.jwt_secret,
        Duration::hours(args.token_lifetime_hours),
    ) {
        Ok(token_service) => token_service,
        Err(error) => {
            tracing::error!("Could not create the token service: {error}");
            return ExitCode::FAILURE;
        }
    };

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open the database at {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(
        connection,
        token_service,
        PasswordHash::DEFAULT_COST,
        PaginationConfig::default(),
    ) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize the database: {error}");
            return ExitCode::FAILURE;
        }
    };

    let cors_layer = match build_cors_layer(args.allowed_origin.as_deref()) {
        Ok(cors_layer) => cors_layer,
        Err(error) => {
            tracing::error!("Invalid allowed origin: {error}");
            return ExitCode::FAILURE;
        }
    };

    let router = build_router(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors_layer);
    let router = add_tracing_layer(router);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging() -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn build_cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let allow_origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
