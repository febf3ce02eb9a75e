use argh::FromArgs;
use oneline::{
    AppState, GeminiModel, ModelClient, ModelConfig, SummarizationService,
    config::{legacy_errors_from_env, port_from_env},
    router,
};
use std::path::PathBuf;

// defaults for the server
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(FromArgs)]
/// Oneline serves a web page that summarizes text in one line.
struct ServerArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to run the server on (defaults to $PORT or 8002)
    #[argh(option, short = 'p', default = "port_from_env()")]
    port: u16,

    /// directory served under /static
    #[argh(option, default = "PathBuf::from(DEFAULT_STATIC_DIR)")]
    static_dir: PathBuf,

    /// answer failed summaries with 200 and the error text in "response"
    #[argh(switch)]
    legacy_errors: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: ServerArgs = argh::from_env();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let config = ModelConfig::from_env();
    let client = match ModelClient::<GeminiModel>::initialize(&config) {
        Ok(client) => {
            log::info!(
                "Text summarizer model {} loaded successfully",
                client.model_identifier()
            );
            log::debug!("Prompt template: {}", client.template().as_str());
            Some(client)
        }
        Err(e) => {
            log::error!("Error initializing summarizer model: {e}");
            log::warn!("Continuing without a model, /chat will answer 'service unavailable'");
            None
        }
    };

    let state = AppState::new(SummarizationService::new(client))
        .with_legacy_error_payloads(args.legacy_errors || legacy_errors_from_env());
    let app = router(state, &args.static_dir);

    log::info!("Starting the server");
    log::info!("Listening on: http://{}", addr);
    log::info!("Press Ctrl+C to stop the server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
            log::info!("Shutting down");
        })
        .await?;

    Ok(())
}
