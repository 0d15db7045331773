use clap::{CommandFactory, Parser};
use dialoguer::Password;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use arbflow::core::constants::exit_codes;
use arbflow::logging;
use arbflow::ui::{
    Cli, Commands, ExportFormat, LoadSpinner, LogoCommand, cli_to_config, format_dashboard,
    print_completions, state_message,
};
use arbflow::{
    ApiError, ArbflowError, BrandingAsset, BrandingStore, Config, ExportEngine, ExportOutcome,
    FileStore, HttpAnalyticsClient, IntegrationRequest, KeyValueStore, Result, SessionGate,
    ViewState, WorkspaceController, WorkspaceSnapshot, connect_integration,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Commands::Completion { shell } = cli.command {
        let mut app = Cli::command();
        print_completions(shell, &mut app);
        std::process::exit(exit_codes::SUCCESS);
    }

    logging::init_logger(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(ArbflowError::NotAuthenticated) => {
            eprintln!("{}", state_message(&ViewState::SessionExpired));
            std::process::exit(exit_codes::SESSION_EXPIRED);
        }
        Err(e) => {
            logging::log_error("Command failed", Some(&e));
            eprintln!("Error: {e}");
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

/// Run the selected subcommand and return the process exit code
async fn run(cli: &Cli) -> Result<i32> {
    let config = load_and_merge_config(cli)?;
    logging::log_config_info(&config);

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.data_dir()?)?);
    let gate = SessionGate::new(Arc::clone(&store));

    match &cli.command {
        Commands::Login { token } => login(&gate, token.as_deref()),
        Commands::Logout => {
            gate.logout()?;
            println!("Logged out.");
            Ok(exit_codes::SUCCESS)
        }
        Commands::Dashboard {
            property,
            sync,
            json,
        } => {
            let controller = load_workspace(cli, &config, gate, property.as_deref(), *sync).await?;
            show_dashboard(&controller, *json)
        }
        Commands::Export {
            format,
            out,
            property,
        } => {
            let controller =
                load_workspace(cli, &config, gate, property.as_deref(), false).await?;
            let branding = BrandingStore::new(store);
            export(&config, &controller, &branding, *format, out)
        }
        Commands::Logo { action } => manage_logo(&BrandingStore::new(store), action),
        Commands::Connect {
            property_id,
            key_file,
            provider,
        } => connect(&config, &gate, property_id, key_file, provider).await,
        Commands::Completion { .. } => Ok(exit_codes::SUCCESS),
    }
}

/// Load the config file (explicit or discovered) and apply CLI overrides
fn load_and_merge_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => Config::load_from_file(path)?,
        None => Config::load_from_standard_locations(),
    };
    config.merge_with_cli(&cli_to_config(cli));
    config.validate()?;
    Ok(config)
}

fn login(gate: &SessionGate, token: Option<&str>) -> Result<i32> {
    let token = match token {
        Some(token) => token.to_string(),
        None => Password::new()
            .with_prompt("Session token")
            .interact()
            .map_err(|e| ArbflowError::InvalidArgument(format!("Could not read token: {e}")))?,
    };

    gate.login(&token)?;
    println!("Session saved.");
    Ok(exit_codes::SUCCESS)
}

async fn load_workspace(
    cli: &Cli,
    config: &Config,
    gate: SessionGate,
    property: Option<&str>,
    manual: bool,
) -> Result<WorkspaceController> {
    let api = Arc::new(HttpAnalyticsClient::new(config)?);
    let mut controller = WorkspaceController::new(api, gate, config.sync_indicator_duration());
    if property.is_some() {
        controller.select_property(property);
    }

    let message = if manual {
        "Syncing engine..."
    } else {
        "Loading workspace..."
    };
    let spinner = LoadSpinner::start(!cli.quiet, message);
    controller.load(manual).await;
    spinner.finish();

    Ok(controller)
}

fn exit_code_for(state: &ViewState) -> i32 {
    match state {
        ViewState::Ready(_) | ViewState::PendingIntegration => exit_codes::SUCCESS,
        ViewState::SessionExpired => exit_codes::SESSION_EXPIRED,
        ViewState::Loading | ViewState::Error(_) => exit_codes::FAILURE,
    }
}

fn show_dashboard(controller: &WorkspaceController, json: bool) -> Result<i32> {
    let state = controller.state();
    match state.snapshot() {
        Some(snapshot) if json => println!(
            "{}",
            serde_json::to_string_pretty::<WorkspaceSnapshot>(snapshot)?
        ),
        Some(snapshot) => println!(
            "{}",
            format_dashboard(snapshot, controller.selected_property())
        ),
        None => eprintln!("{}", state_message(&state)),
    }
    Ok(exit_code_for(&state))
}

fn export(
    config: &Config,
    controller: &WorkspaceController,
    branding: &BrandingStore,
    format: ExportFormat,
    out: &Path,
) -> Result<i32> {
    let state = controller.state();
    if matches!(state, ViewState::SessionExpired | ViewState::Error(_)) {
        eprintln!("{}", state_message(&state));
        return Ok(exit_code_for(&state));
    }

    let engine = ExportEngine::new(config.logo_width());
    let outcome = match format {
        ExportFormat::Csv => engine.export_delimited(&state),
        ExportFormat::Report => engine.export_report(&state, branding.get().as_ref()),
    };

    match outcome {
        ExportOutcome::Document(document) => {
            let path = document.write_to_dir(out)?;
            println!("Saved {}", path.display());
        }
        ExportOutcome::NothingToExport => {
            println!("Nothing to export: the workspace has no channel data yet.");
        }
    }
    Ok(exit_codes::SUCCESS)
}

fn manage_logo(branding: &BrandingStore, action: &LogoCommand) -> Result<i32> {
    match action {
        LogoCommand::Set { file } => {
            let bytes = fs::read(file)?;
            let asset = match std::str::from_utf8(&bytes) {
                Ok(text) if text.trim_start().starts_with("data:") => {
                    BrandingAsset::from_data_url(text)?
                }
                _ => BrandingAsset::from_bytes(bytes),
            };
            branding.set(&asset)?;
            println!("Logo saved ({} bytes).", asset.len());
        }
        LogoCommand::Clear => {
            branding.clear()?;
            println!("Logo removed.");
        }
    }
    Ok(exit_codes::SUCCESS)
}

async fn connect(
    config: &Config,
    gate: &SessionGate,
    property_id: &str,
    key_file: &Path,
    provider: &str,
) -> Result<i32> {
    let key = fs::read_to_string(key_file).map_err(|e| {
        ArbflowError::InvalidArgument(format!(
            "Could not read key file '{}': {e}",
            key_file.display()
        ))
    })?;
    let request = IntegrationRequest::new(property_id, key).with_provider(provider);
    let api = HttpAnalyticsClient::new(config)?;

    match connect_integration(&api, gate, &request).await {
        Ok(receipt) => {
            println!(
                "Connected {} property {}.",
                receipt.provider, receipt.property_id
            );
            Ok(exit_codes::SUCCESS)
        }
        Err(ArbflowError::Api(ApiError::Unauthorized)) => {
            eprintln!("{}", state_message(&ViewState::SessionExpired));
            Ok(exit_codes::SESSION_EXPIRED)
        }
        Err(e) => Err(e),
    }
}
