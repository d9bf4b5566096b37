use bill_persona_connector::app_state::{AppState, Settings};
use bill_persona_connector::config::Config;
use bill_persona_connector::genai::{GeminiClient, GenerativeModel};
use bill_persona_connector::handlers::run_refresh_prompt_job;
use bill_persona_connector::push::{DisabledPush, FcmClient, PushSender};
use bill_persona_connector::routes::build_router;
use bill_persona_connector::triggers::{run_notification_queue_job, run_trigger_loop};
use clokwerk::{Job, Scheduler, TimeUnits};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return;
        }
    };

    // initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // init Gemini and push callers
    let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(&config));
    let push: Arc<dyn PushSender> = match FcmClient::from_config(&config) {
        Some(fcm) => Arc::new(fcm),
        None => {
            warn!("FCM_PROJECT_ID or FCM_ACCESS_TOKEN not set, push notifications disabled.");
            Arc::new(DisabledPush)
        }
    };

    // App State, backed by the file DBs
    let (app_state, events) =
        match AppState::open(&config.db_dir, model, push, Settings::from(&config)) {
            Ok(opened) => opened,
            Err(e) => {
                error!("Error opening DBs: {:#?}", e);
                return;
            }
        };

    // document-created triggers, run in a seperated task
    tokio::spawn(run_trigger_loop(app_state.clone(), events));

    // Create a new scheduler
    let mut scheduler = Scheduler::new();
    {
        let app_state = app_state.clone();
        scheduler
            .every(config.prompt_refresh_minutes.minutes())
            .run(move || run_refresh_prompt_job(app_state.clone()));
    }
    {
        let app_state = app_state.clone();
        scheduler
            .every(config.notification_poll_seconds.seconds())
            .run(move || run_notification_queue_job(app_state.clone()));
    }

    // Run scheduler loop in a spawned task
    tokio::spawn(async move {
        info!("Scheduler started.");
        loop {
            scheduler.run_pending();
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    });

    let app = build_router(app_state).layer((
        TraceLayer::new_for_http(),
        // Graceful shutdown will wait for outstanding requests to complete. Add a timeout so
        // requests don't hang forever.
        TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)),
    ));

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Error binding {}: {}", config.listen_addr, e);
            return;
        }
    };
    info!("Listening on {}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down.");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down.");
        },
    }
}
