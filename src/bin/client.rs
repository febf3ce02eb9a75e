use argh::FromArgs;
use std::path::PathBuf;

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8002;

#[derive(FromArgs)]
/// Oneline client for summarizing text and checking server health
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// command to execute: "summarize" or "health"
    #[argh(subcommand)]
    command: ClientCommands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum ClientCommands {
    Summarize(SummarizeCommand),
    Health(HealthCommand),
}

#[derive(FromArgs)]
/// Summarize a piece of text
#[argh(subcommand, name = "summarize")]
struct SummarizeCommand {
    /// the text to summarize
    #[argh(option, short = 't', default = "String::new()")]
    text: String,

    /// an image to attach (the server will reject it)
    #[argh(option, short = 'i')]
    image: Option<PathBuf>,
}

#[derive(FromArgs)]
/// Check whether the server has a model configured
#[argh(subcommand, name = "health")]
struct HealthCommand {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ClientArgs = argh::from_env();

    let client = reqwest::Client::new();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let response = match args.command {
        ClientCommands::Summarize(command) => {
            let mut form = reqwest::multipart::Form::new().text("user_query", command.text);

            if let Some(path) = command.image {
                let file_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("image")
                    .to_string();
                let bytes = tokio::fs::read(&path).await?;
                form = form.part(
                    "image",
                    reqwest::multipart::Part::bytes(bytes).file_name(file_name),
                );
            }

            client
                .post(format!("http://{}/chat", addr))
                .multipart(form)
                .send()
                .await?
        }
        ClientCommands::Health(_) => {
            client
                .get(format!("http://{}/health", addr))
                .send()
                .await?
        }
    };

    let status = response.status();
    let result = response.json::<serde_json::Value>().await?;
    println!("Status: {}", status);
    println!("Result: {}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
