use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use form_runner::{
    run_session, Config, FormSubmitter, History, ProxyCursor, RotationStrategy, RunLog,
    RunnerConfig, SessionRecord, SubmitterConfig,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Automated web form submission runner
#[derive(Parser)]
#[command(name = "form-runner")]
#[command(about = "Fires a bounded number of form submissions, optionally through rotating proxies")]
struct Cli {
    /// File containing the target form URL
    #[arg(long, default_value = "url.txt")]
    url_file: PathBuf,

    /// File containing the option text to submit
    #[arg(long, default_value = "text.txt")]
    option_file: PathBuf,

    /// File containing proxies, one per line (optional)
    #[arg(long, default_value = "proxies.txt")]
    proxy_file: PathBuf,

    /// Transient log for the current run, overwritten each session
    #[arg(long, default_value = "log.txt")]
    log_file: PathBuf,

    /// Append-only history of past sessions
    #[arg(long, default_value = "history.txt")]
    history_file: PathBuf,

    /// Number of submissions; prompted interactively when omitted
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Form field name the option text is submitted under
    #[arg(long, default_value = "option")]
    field: String,

    /// Proxy rotation strategy (round-robin, random)
    #[arg(long, default_value = "round-robin")]
    rotation: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Minimum delay between submissions in milliseconds
    #[arg(long, default_value = "0")]
    min_delay: u64,

    /// Maximum delay between submissions in milliseconds (0 disables delays)
    #[arg(long, default_value = "0")]
    max_delay: u64,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    validate_args(&cli)?;

    // Configuration problems abort here, before anything is sent or logged.
    let config = Config::load(&cli.url_file, &cli.option_file, &cli.proxy_file)?;
    let rotation = parse_rotation(&cli.rotation)?;

    let count = match cli.count {
        Some(count) => count,
        None => prompt_count()?,
    };

    println!("Form URL: {}", config.form_url);
    println!("Option text: {}", config.option_text);
    if config.proxies.is_empty() {
        println!("Proxies: none (direct connection)");
    } else {
        println!(
            "Proxies: {} loaded, {} rotation",
            config.proxies.len(),
            cli.rotation
        );
    }
    println!("Requests this session: {}", count);
    println!("Run log: {}", cli.log_file.display());
    println!("History: {}", cli.history_file.display());

    if !cli.yes && !confirm("Start submitting? (y/N): ")? {
        println!("Aborted.");
        return Ok(());
    }

    let mut history = History::open(&cli.history_file)?;
    let mut run_log = RunLog::create(&cli.log_file)?;
    run_log.begin(config.form_url.as_str(), count)?;

    let submitter = FormSubmitter::with_config(
        config.form_url.clone(),
        config.option_text.clone(),
        SubmitterConfig::new()
            .with_timeout(Duration::from_secs(cli.timeout))
            .with_field_name(cli.field.clone()),
    );
    let mut cursor = ProxyCursor::new(config.proxies.clone(), rotation);
    let runner_config = RunnerConfig::new(count).with_delay_ms(cli.min_delay, cli.max_delay);

    let stats = run_session(&submitter, &mut cursor, &mut run_log, &runner_config).await?;
    run_log.finish(&stats)?;

    let record = SessionRecord::from_stats(&stats, history.cumulative());
    history.append(&record)?;

    println!();
    println!(
        "Done: {} succeeded, {} failed out of {} ({:.1}%)",
        stats.succeeded,
        stats.failed,
        stats.attempts(),
        stats.success_rate()
    );
    println!("Session duration: {}s", stats.duration().num_seconds());
    println!("Cumulative successful submissions: {}", record.cumulative);
    println!("Detailed log: {}", run_log.path().display());

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn validate_args(cli: &Cli) -> Result<()> {
    if cli.count == Some(0) {
        bail!("--count must be greater than 0");
    }
    if cli.timeout == 0 {
        bail!("--timeout must be greater than 0");
    }
    if cli.max_delay > 0 && cli.min_delay > cli.max_delay {
        bail!("--min-delay must not exceed --max-delay");
    }
    Ok(())
}

fn parse_rotation(s: &str) -> Result<RotationStrategy> {
    match s.to_lowercase().as_str() {
        "round-robin" => Ok(RotationStrategy::RoundRobin),
        "random" => Ok(RotationStrategy::Random),
        _ => Err(anyhow!(
            "Invalid rotation strategy: {}. Use: round-robin, random",
            s
        )),
    }
}

fn prompt_count() -> Result<u64> {
    loop {
        print!("Number of submissions for this session: ");
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("failed to read submission count")?;
        if read == 0 {
            bail!("no input available for submission count");
        }

        match input.trim().parse::<u64>() {
            Ok(count) if count > 0 => return Ok(count),
            _ => println!("Please enter a positive number."),
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
