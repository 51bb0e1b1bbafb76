use clap::Parser;
use rpcwatch::cli::{
    alerts, auth, handle_completions, handle_config_init, keys, load_config, metrics, status,
    watch, Cli, Commands, ConfigCommands, KeysCommands,
};
use rpcwatch::client::ApiClient;
use rpcwatch::config::RpcWatchConfig;
use rpcwatch::health::HealthPoller;

/// Print a handler's output on success
fn emit(
    result: Result<String, Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = result?;
    println!("{}", output);
    Ok(())
}

fn poller_for(config: &RpcWatchConfig) -> Result<HealthPoller, Box<dyn std::error::Error>> {
    let client = ApiClient::new(&config.api)?;
    Ok(HealthPoller::new(client, config.poller.clone()))
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Commands that never talk to the backend skip config and logging
    match &cli.command {
        Commands::Config(ConfigCommands::Init(args)) => return handle_config_init(args),
        Commands::Completions(args) => {
            handle_completions(args);
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli.global)?;
    rpcwatch::logging::init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Status(args) => {
            let poller = poller_for(&config)?;
            emit(status::handle_status(&args, &poller).await)
        }
        Commands::Check(args) => {
            let poller = poller_for(&config)?;
            emit(status::handle_check(&args, &poller).await)
        }
        Commands::Watch(args) => watch::run_watch(&args, config).await,
        Commands::Alerts(args) => {
            let client = ApiClient::new(&config.api)?;
            emit(alerts::handle_alerts(&args, &client).await)
        }
        Commands::Uptime(args) => {
            let client = ApiClient::new(&config.api)?;
            emit(metrics::handle_uptime(&args, &client).await)
        }
        Commands::Usage(args) => {
            let client = ApiClient::new(&config.api)?;
            emit(metrics::handle_usage(&args, &client).await)
        }
        Commands::Login(args) => emit(auth::handle_login(&args, &config).await),
        Commands::Logout => emit(auth::handle_logout(&config)),
        Commands::Whoami(args) => {
            let client = ApiClient::new(&config.api)?;
            emit(auth::handle_whoami(&args, &client).await)
        }
        Commands::Keys(command) => {
            let client = ApiClient::new(&config.api)?;
            match command {
                KeysCommands::List(args) => emit(keys::handle_keys_list(&args, &client).await),
                KeysCommands::Create(args) => emit(keys::handle_keys_create(&args, &client).await),
                KeysCommands::Delete(args) => emit(keys::handle_keys_delete(&args, &client).await),
            }
        }
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
