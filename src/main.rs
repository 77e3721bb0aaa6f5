use anyhow::{bail, Context, Result as AnyhowResult};
use clap::{Parser, Subcommand};
use playground::app::Playground;
use playground::config::Config;
use playground::config_io::{self, DirectoryContext};
use playground::services::async_bridge::AsyncBridge;
use playground::services::examples::{self, ExampleSet};
use playground::services::persistence::{FileStorage, MemoryStorage, SessionPersistence};
use playground::services::remote::HttpRemote;
use playground::services::time_source::RealTimeSource;
use playground::services::tracing_setup;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Headless driver for the playground session pipeline
#[derive(Parser, Debug)]
#[command(name = "playground")]
#[command(about = "Lint, run and export playground documents", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file (default: inside the data directory)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Directory holding the persisted session
    #[arg(long, value_name = "DIR")]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lint files through the remote service and print diagnostics
    Lint {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },
    /// Run a file remotely and print its output
    Execute {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Export the persisted session to a zip archive
    Export {
        /// Output file, or a directory to place the archive in
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
    },
    /// List the examples in a gallery directory, optionally loading one
    Examples {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Replace the persisted session with this example
        #[arg(long, value_name = "TITLE")]
        load: Option<String>,
    },
    /// Print the directories used by the playground
    ShowPaths,
    /// Print the effective configuration as JSON
    DumpConfig,
}

fn init_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = tracing_setup::init_global(path) {
        eprintln!("Warning: logging disabled ({e})");
    }
}

/// Files on disk as `(name, content)` pairs, named by file name
fn read_documents(paths: &[PathBuf]) -> AnyhowResult<Vec<(String, String)>> {
    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| format!("{} has no file name", path.display()))?;
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok((name, content))
        })
        .collect()
}

/// A throwaway session over the given files, talking to the real service
fn scratch_session(
    config: &Config,
    files: Vec<(String, String)>,
) -> AnyhowResult<(Playground, AsyncBridge)> {
    let bridge = AsyncBridge::new(Arc::new(HttpRemote::new(&config.service)));
    let mut session = Playground::restore(
        config.clone(),
        SessionPersistence::in_memory(MemoryStorage::new()),
        Box::new(bridge.sink()),
        RealTimeSource::shared(),
    )?;
    session.load_example(&ExampleSet::new("command line", files))?;
    Ok((session, bridge))
}

fn persisted_session(config: &Config, storage_dir: &Path) -> AnyhowResult<Playground> {
    let bridge = AsyncBridge::new(Arc::new(HttpRemote::new(&config.service)));
    let persistence =
        SessionPersistence::new(Box::new(FileStorage::with_dir(storage_dir.to_path_buf())));
    Ok(Playground::restore(
        config.clone(),
        persistence,
        Box::new(bridge.sink()),
        RealTimeSource::shared(),
    )?)
}

fn request_timeout(config: &Config) -> Duration {
    Duration::from_millis(config.service.timeout_ms) + Duration::from_secs(1)
}

fn run_lint(config: &Config, files: &[PathBuf]) -> AnyhowResult<bool> {
    let documents = read_documents(files)?;
    let names: Vec<String> = documents.iter().map(|(n, _)| n.clone()).collect();
    let (mut session, bridge) = scratch_session(config, documents)?;
    let mut failed = false;

    for name in names {
        if !session.document(&name)?.is_lint_eligible() {
            println!("{name}: not lint-eligible, skipped");
            continue;
        }
        session.switch_tab(&name)?;
        if session.lint_state(&name)? == playground::app::LintState::Clean {
            session.lint_now(&name)?;
        }
        if !session.run_until_idle(&bridge, request_timeout(config)) {
            bail!("Timed out linting {name}");
        }
        if let Some(error) = session.lint_error() {
            eprintln!("{name}: {error}");
            failed = true;
            continue;
        }

        let diagnostics = session.displayed_diagnostics();
        println!("{name}: {} diagnostics", diagnostics.len());
        for diagnostic in diagnostics {
            println!(
                "  [{}] {} {}",
                diagnostic.severity(),
                diagnostic.diagnostic.code,
                diagnostic.label()
            );
        }
    }
    Ok(!failed)
}

fn run_execute(config: &Config, file: &Path) -> AnyhowResult<bool> {
    let documents = read_documents(&[file.to_path_buf()])?;
    let (mut session, bridge) = scratch_session(config, documents)?;

    session.startup();
    session.run_until_idle(&bridge, request_timeout(config));
    if let Some(status) = session.service_status() {
        tracing::info!("Startup status: {}", status);
    }

    session.execute();
    if !session.run_until_idle(&bridge, request_timeout(config)) {
        bail!("Timed out running {}", file.display());
    }

    let succeeded = match session.output() {
        Some(result) => {
            print!("{}", result.output_text);
            println!("[html output: {} bytes]", result.output_html.len());
            if let Some(error) = &result.error {
                eprintln!("{error}");
            }
            !result.is_error()
        }
        None => false,
    };
    session.shutdown()?;
    Ok(succeeded)
}

fn run_export(config: &Config, storage_dir: &Path, out: &Path) -> AnyhowResult<()> {
    let session = persisted_session(config, storage_dir)?;
    let (file_name, bytes) = session.export_archive()?;
    let target = if out.is_dir() {
        out.join(file_name)
    } else {
        out.to_path_buf()
    };
    std::fs::write(&target, bytes)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    println!("Exported {} documents to {}", session.store().len(), target.display());
    Ok(())
}

fn run_examples(
    config: &Config,
    storage_dir: &Path,
    dir: &Path,
    load: Option<&str>,
) -> AnyhowResult<()> {
    let sets = examples::discover_examples(dir)
        .with_context(|| format!("Failed to read examples from {}", dir.display()))?;

    let Some(title) = load else {
        for set in &sets {
            let names: Vec<&str> = set.files.iter().map(|(n, _)| n.as_str()).collect();
            println!("{}: {}", set.title, names.join(", "));
        }
        return Ok(());
    };

    let set = sets
        .iter()
        .find(|set| set.title == title)
        .with_context(|| format!("No example named {title:?}"))?;
    let mut session = persisted_session(config, storage_dir)?;
    session.load_example(set)?;
    session.save()?;
    println!("Loaded example {:?} ({} documents)", set.title, set.files.len());
    Ok(())
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    let dir_context =
        DirectoryContext::from_system().context("Failed to determine system directories")?;
    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| dir_context.log_file_path());
    init_logging(&log_file);

    let config = config_io::load_config(&dir_context, args.config.as_deref())
        .context("Failed to load configuration")?;
    let storage_dir = args
        .storage
        .clone()
        .unwrap_or_else(|| dir_context.storage_dir());

    let ok = match &args.command {
        Command::Lint { files } => run_lint(&config, files)?,
        Command::Execute { file } => run_execute(&config, file)?,
        Command::Export { out } => {
            run_export(&config, &storage_dir, out)?;
            true
        }
        Command::Examples { dir, load } => {
            run_examples(&config, &storage_dir, dir, load.as_deref())?;
            true
        }
        Command::ShowPaths => {
            println!("Config file:  {}", dir_context.config_path().display());
            println!("Session data: {}", storage_dir.display());
            println!("Log file:     {}", log_file.display());
            true
        }
        Command::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
