//! wallet-checker: terminal front end for the lookup engine
//!
//! Run with:
//! ```bash
//! cargo run -p checker-engine --bin wallet-checker -- --source bundled 0xabc...
//! ```
//!
//! Without addresses, reads one address per line from stdin. Lines starting
//! with `:` are commands: `:source bundled|remote`, `:status`, `:quit`.

use std::path::PathBuf;
use std::sync::Arc;

use checker_core::{CheckerConfig, LookupResult, Source};
use checker_engine::{Completion, LookupEngine, UiEvent};
use checker_loader::SourceLoader;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wallet-checker")]
#[command(about = "Check whether a wallet address is on the eligibility list")]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address source: bundled or remote
    #[arg(long, default_value_t = Source::default())]
    source: Source,

    /// Bundled spreadsheet (.xlsx/.xls/.ods/.csv)
    #[arg(long)]
    bundled_path: Option<PathBuf>,

    /// Hosted spreadsheet document id
    #[arg(long)]
    sheet_id: Option<String>,

    /// Tab id within the hosted spreadsheet
    #[arg(long)]
    sheet_gid: Option<String>,

    /// Override the spreadsheet export host
    #[arg(long)]
    remote_base_url: Option<String>,

    /// Addresses to check; reads stdin when empty
    addresses: Vec<String>,
}

impl Args {
    fn checker_config(&self) -> anyhow::Result<CheckerConfig> {
        let mut config = match &self.config {
            Some(path) => CheckerConfig::load(path)?,
            None => CheckerConfig::default(),
        };

        if let Some(path) = &self.bundled_path {
            config.bundled_path = path.clone();
        }
        if let Some(id) = &self.sheet_id {
            config.sheet_id = id.clone();
        }
        if let Some(gid) = &self.sheet_gid {
            config.sheet_gid = gid.clone();
        }
        if let Some(url) = &self.remote_base_url {
            config.remote_base_url = url.clone();
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("checker_engine=info".parse()?)
                .add_directive("checker_loader=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.checker_config()?;
    let loader = SourceLoader::new(&config)?;

    tracing::info!(
        source = %args.source,
        bundled = %config.bundled_path.display(),
        remote = %config.remote_url(),
        "Starting wallet checker"
    );

    let engine = LookupEngine::with_source(Arc::new(loader), args.source);

    if args.addresses.is_empty() {
        run_interactive(&engine).await
    } else {
        run_batch(&engine, &args.addresses).await
    }
}

async fn run_batch(engine: &LookupEngine, addresses: &[String]) -> anyhow::Result<()> {
    let mut completions = engine.subscribe();
    let mut failed = 0;

    for raw in addresses {
        let Some(request) = engine.on_submit(raw) else {
            println!("{:?}: nothing to check", raw);
            continue;
        };

        let completion = wait_for(&mut completions, request.token).await?;
        print_completion(&completion);
        if matches!(completion.result, LookupResult::Failed(_)) {
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} lookup(s) failed", failed);
    }
    Ok(())
}

async fn wait_for(
    completions: &mut broadcast::Receiver<Completion>,
    token: u64,
) -> anyhow::Result<Completion> {
    loop {
        match completions.recv().await {
            Ok(completion) if completion.request.token == token => return Ok(completion),
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Completion receiver lagged");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn run_interactive(engine: &LookupEngine) -> anyhow::Result<()> {
    let mut completions = engine.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let _preload = engine.preload_bundled();

    eprintln!(
        "Enter a wallet address per line (source: {}). Commands: :source bundled|remote, :status, :quit",
        engine.source()
    );

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !handle_line(engine, &line) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Ok(completion) = completions.recv() => print_completion(&completion),
        }
    }

    // Let the last submission finish its debounce window before exiting
    while engine.is_busy() {
        match completions.recv().await {
            Ok(completion) => print_completion(&completion),
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    Ok(())
}

/// Returns false when the user asked to quit
fn handle_line(engine: &LookupEngine, line: &str) -> bool {
    let Some(command) = line.trim().strip_prefix(':') else {
        if engine.handle(UiEvent::Submit(line.to_string())).is_some() {
            eprintln!("checking...");
        } else {
            eprintln!("(nothing to check)");
        }
        return true;
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit") | Some("q"), _) => return false,
        (Some("status"), _) => {
            let snapshot = engine.snapshot();
            eprintln!(
                "source={} state={} bundled_loading={} token={}",
                snapshot.source,
                snapshot.result.outcome(),
                snapshot.bundled_loading,
                snapshot.token
            );
        }
        (Some("source"), Some(name)) => match name.parse::<Source>() {
            Ok(Source::Bundled) if engine.bundled_loading() => {
                eprintln!("Loading bundled data, please wait...");
            }
            Ok(source) => {
                engine.handle(UiEvent::SourceChanged(source));
                eprintln!("source: {}", source);
            }
            Err(e) => eprintln!("{}", e),
        },
        _ => eprintln!("unknown command: {}", line.trim()),
    }
    true
}

fn print_completion(completion: &Completion) {
    let message = completion.result.message().unwrap_or_default();
    println!(
        "[{}] {} ({}): {}",
        completion.result.outcome(),
        completion.request.address,
        completion.request.source,
        message
    );
}
