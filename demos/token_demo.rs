use clap::Parser;
use mini_twitch::{AuthProcess, Config, TokenData, DEFAULT_CALLBACK_PORT};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about = "Obtain a Twitch user token and poke the Helix API", long_about = None)]
struct Args {
    /// Twitch application Client ID
    #[arg(short, long, default_value = "")]
    client_id: String,

    /// Twitch application Client Secret
    #[arg(short = 's', long, default_value = "")]
    secret: String,

    /// Callback path registered with the provider
    #[arg(long, default_value = "/auth")]
    callback_path: String,

    /// Local callback port
    #[arg(short = 'p', long, default_value_t = DEFAULT_CALLBACK_PORT)]
    port: u16,

    /// Game name to look up after authorization
    #[arg(short, long)]
    game: Option<String>,

    /// Where the token is persisted between runs
    #[arg(long, default_value = "token.json")]
    token_file: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = Args::parse();

    // Fall back to environment variables for the credentials.
    if args.client_id.is_empty() {
        if let Ok(client_id) = std::env::var("TWITCH_CLIENT_ID") {
            args.client_id = client_id;
        }
    }
    if args.secret.is_empty() {
        if let Ok(secret) = std::env::var("TWITCH_SECRET") {
            args.secret = secret;
        }
    }
    if args.client_id.is_empty() || args.secret.is_empty() {
        eprintln!("Error: Twitch Client ID and Client Secret are required");
        eprintln!("Provide them via command line arguments or environment variables:");
        eprintln!("  export TWITCH_CLIENT_ID=your_client_id");
        eprintln!("  export TWITCH_SECRET=your_secret");
        std::process::exit(1);
    }

    let config = Config {
        client_id: args.client_id,
        secret: args.secret,
        callback_path: args.callback_path,
        port: args.port,
        scopes: vec![
            "user:read:email".to_string(),
            "channel:read:polls".to_string(),
            "channel:manage:polls".to_string(),
        ],
    };

    let mut proc = AuthProcess::new(config);

    // Reuse a previously persisted token when one is on disk.
    match std::fs::read_to_string(&args.token_file) {
        Ok(contents) => match serde_json::from_str::<TokenData>(&contents) {
            Ok(token) => proc.set_token(token),
            Err(e) => warn!("ignoring unreadable {}: {e}", args.token_file),
        },
        Err(_) => info!("no stored token, interactive authorization will run"),
    }

    proc.on_authorize_url(|url| {
        if let Err(e) = webbrowser::open(url.as_str()) {
            eprintln!("Failed to open browser: {e}");
            eprintln!("Please visit the URL manually: {url}");
        }
    });

    proc.start().await?;
    std::fs::write(&args.token_file, serde_json::to_string_pretty(proc.token())?)?;
    info!("user token is {}", proc.token().access_token);

    let users = proc.get_user_info().await?;
    if let Some(user) = users.data.first() {
        info!("authorized as {} ({})", user.display_name, user.id);
    }

    if let Some(game) = args.game {
        let game_id = proc.get_game(&game).await?;
        if game_id.is_empty() {
            info!("no game named {game:?}");
        } else {
            info!("game_id is {game_id}");
        }
    }

    Ok(())
}
