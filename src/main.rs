//! Wecr main entry point
//!
//! Loads and validates the configuration, prepares the output tree and the
//! frontier, seeds the initial jobs and runs the worker pool until
//! interrupted.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wecr::config::{self, Config, FOUND_EMAILS_FILE, FOUND_TEXT_FILE, VISIT_QUEUE_FILE};
use wecr::frontier::{DiskFrontier, Frontier, Job, MemoryFrontier};
use wecr::output::{OutputTree, ResultSink};
use wecr::worker::{Pool, WorkerConf};

/// Size of the in-memory visit queue, per worker
const MEMORY_QUEUE_JOBS_PER_WORKER: usize = 5;

/// Wecr: crawl the web for data
#[derive(Parser, Debug)]
#[command(name = "wecr")]
#[command(version)]
#[command(about = "Crawl the web for data", long_about = None)]
struct Cli {
    /// Configuration file name to create or look for
    #[arg(long, default_value = "conf.json")]
    conf: PathBuf,

    /// Force set working directory
    #[arg(long, value_name = "DIR")]
    wdir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let working_dir = match &cli.wdir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let config_path = working_dir.join(&cli.conf);

    // No config yet: write a template and let the user fill it in
    if !config_path.exists() {
        config::create_default_config(&config_path)?;
        eprintln!(
            "Created new configuration file at \"{}\". Exiting...",
            config_path.display()
        );
        return Ok(());
    }

    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    setup_logging(&config, &working_dir, cli.verbose)?;
    tracing::info!("Working in \"{}\"", working_dir.display());

    run(config, &working_dir).await
}

/// Sets up the tracing subscriber according to the config's logging block
/// and the CLI verbosity flags
fn setup_logging(
    config: &Config,
    working_dir: &Path,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match verbose {
        0 => EnvFilter::new("wecr=info,warn"),
        1 => EnvFilter::new("wecr=debug,info"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if !config.logging.output_logs {
        builder.with_writer(std::io::sink).init();
    } else if config.logging.logs_file.is_empty() {
        builder.init();
    } else {
        let file = std::fs::File::create(working_dir.join(&config.logging.logs_file))?;
        builder.with_writer(std::sync::Mutex::new(file)).init();
    }

    Ok(())
}

async fn run(config: Config, working_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match config.search.query.as_str() {
        config::QUERY_IMAGES => tracing::info!("Looking for images"),
        config::QUERY_VIDEOS => tracing::info!("Looking for videos"),
        config::QUERY_AUDIO => tracing::info!("Looking for audio"),
        config::QUERY_DOCUMENTS => tracing::info!("Looking for documents"),
        config::QUERY_EMAIL => tracing::info!("Looking for email addresses"),
        config::QUERY_EVERYTHING => tracing::info!("Looking for everything"),
        config::QUERY_ARCHIVE => tracing::info!("Archiving visited pages"),
        query if config.search.is_regexp => {
            tracing::info!("Looking for RegExp matches ({})", query)
        }
        query => tracing::info!("Looking for text matches ({})", query),
    }

    if config.dashboard.use_dashboard {
        tracing::warn!(
            "Dashboard requested on port {}, but it runs as a separate component",
            config.dashboard.port
        );
    }

    // Output tree and result sinks; failure here is fatal
    let output_dir = if Path::new(&config.save.output_dir).is_absolute() {
        PathBuf::from(&config.save.output_dir)
    } else {
        working_dir.join(&config.save.output_dir)
    };
    let tree = match OutputTree::create(&output_dir) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::error!("Failed to create output directory: {}", e);
            std::process::exit(1);
        }
    };
    let text_sink = ResultSink::create(&tree.root.join(FOUND_TEXT_FILE))?;
    let email_sink = ResultSink::create(&tree.root.join(FOUND_EMAILS_FILE))?;

    // Frontier backend per config
    let frontier = if config.in_memory_visit_queue {
        tracing::info!("Using memory visit queue");
        Arc::new(Frontier::Memory(MemoryFrontier::new(
            config.workers * MEMORY_QUEUE_JOBS_PER_WORKER,
        )))
    } else {
        let queue_path = working_dir.join(VISIT_QUEUE_FILE);
        tracing::info!("Using disk visit queue at \"{}\"", queue_path.display());
        Arc::new(Frontier::Disk(DiskFrontier::create(&queue_path)?))
    };

    // One job per seed, at full configured depth
    for page in &config.initial_pages {
        frontier
            .push(Job {
                url: page.clone(),
                search: config.search.clone(),
                depth: config.depth,
            })
            .await?;
    }

    let mut pool = Pool::new(
        config.workers,
        Arc::clone(&frontier),
        WorkerConf {
            requests: config.requests.clone(),
            save: config.save.clone(),
            allowed_domains: config.allowed_domains.clone(),
            blacklisted_domains: config.blacklisted_domains.clone(),
        },
        tree,
        text_sink,
        email_sink,
    )?;

    let stats = pool.stats();
    pool.work();
    tracing::info!("Started scraping with {} workers...", config.workers);

    // First interrupt asks the workers to drain; a second one exits now
    let shutdown_stats = Arc::clone(&stats);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received interrupt signal. Stopping workers...");
            shutdown_stats.mark_stopped();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(1);
        }
    });

    // With logs going to a file (or disabled), keep a live status line on
    // the terminal instead
    if !config.logging.output_logs || !config.logging.logs_file.is_empty() {
        let status_stats = Arc::clone(&stats);
        tokio::spawn(async move {
            println!();
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;

                let snapshot = status_stats.snapshot();
                let elapsed =
                    (chrono::Utc::now().timestamp() as u64).saturating_sub(snapshot.start_time_unix);
                let rate = snapshot.pages_visited / elapsed.max(1);

                print!(
                    "\r[{}s] {} pages; {} matches ({} pages/sec)",
                    elapsed, snapshot.pages_visited, snapshot.matches_found, rate
                );
                use std::io::Write;
                let _ = std::io::stdout().flush();
            }
        });
    }

    pool.join().await;

    let snapshot = stats.snapshot();
    tracing::info!(
        "Done: {} pages visited, {} matches found, {} pages saved",
        snapshot.pages_visited,
        snapshot.matches_found,
        snapshot.pages_saved
    );

    Ok(())
}
