use ccswitch::cli::{Cli, Command, HealthArgs};
use ccswitch::config::{
    load_api_configs, resolve_api_configs_path, resolve_settings_path, unique_targets,
    HealthSettings,
};
use ccswitch::core::health::{cancel_pair, CascadeEvaluator, HealthChecker, IsahcTransport, Prober};
use ccswitch::ui::utils::{paint, Tone};
use ccswitch::ui::HealthTableRenderer;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    match cli.command {
        Command::List => list_configs(cli.configs).await,
        Command::Health(args) => run_health(cli.configs, args).await,
    }
}

async fn list_configs(configs: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = resolve_api_configs_path(configs)?;
    let api_configs = load_api_configs(&path).await?;
    let color = std::env::var_os("NO_COLOR").is_none();

    if !api_configs.found {
        eprintln!(
            "{}",
            paint(Tone::Yellow, &format!("Warning: API config file not found ({})", path.display()), color)
        );
    }
    if api_configs.entries.is_empty() {
        println!("{}", paint(Tone::Yellow, "No API configs found", color));
        return Ok(());
    }

    println!("{}", paint(Tone::Cyan, "Available API configs:", color));
    for (index, entry) in api_configs.entries.iter().enumerate() {
        println!(" {}. {}", index + 1, entry.display_name());
    }
    Ok(())
}

async fn run_health(
    configs: Option<PathBuf>,
    args: HealthArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let color = !args.no_color && !args.json && std::env::var_os("NO_COLOR").is_none();

    let path = resolve_api_configs_path(configs)?;
    let api_configs = load_api_configs(&path).await?;
    if !api_configs.found {
        eprintln!(
            "{}",
            paint(Tone::Yellow, &format!("Warning: API config file not found ({})", path.display()), color)
        );
    }

    let targets = unique_targets(&api_configs.entries);
    if targets.is_empty() {
        println!("{}", paint(Tone::Yellow, "No API configs found", color));
        return Ok(());
    }

    let mut settings = HealthSettings::load(&resolve_settings_path(args.settings)?).await?;
    if let Some(ms) = args.timeout_ms.filter(|ms| *ms > 0) {
        settings.timeout_ms = ms;
    }
    if let Some(n) = args.concurrency {
        settings.concurrency = n;
    }

    let transport = if args.no_proxy {
        IsahcTransport::without_proxy()?
    } else {
        IsahcTransport::new()?
    };
    let prober = Prober::new(Arc::new(transport)).with_timeout(settings.timeout());
    let checker = HealthChecker::new(CascadeEvaluator::new(prober, settings.catalog()))
        .with_concurrency(settings.concurrency);

    let (cancel_handle, cancel_signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_handle.cancel();
        }
    });

    if !args.json {
        println!(
            "{}\n",
            paint(
                Tone::Cyan,
                &format!("Checking {} endpoint(s)...", targets.len()),
                color
            )
        );
    }

    let reports = checker.check_all(targets, cancel_signal).await;

    if args.json {
        println!("{}", HealthTableRenderer::render_json(&reports)?);
    } else {
        println!("{}", HealthTableRenderer::new(color).render_all(&reports));
    }
    Ok(())
}
