use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use tracing::debug;

use deltaver::config::{self, FileConfig};
use deltaver::logging::{self, LogConfig};
use deltaver::parser::{self, ExcludedReqs, ManifestFormat, Parser as _};
use deltaver::report::{self, Thresholds};
use deltaver::scan::{ScanOptions, scan};
use deltaver::version::cache::CachedHistory;
use deltaver::version::clock::SystemClock;
use deltaver::version::registries::registry_for;
use deltaver::version::registry::{RegistryHistory, ReleaseHistorySource};

#[derive(Parser)]
#[command(name = "deltaver")]
#[command(
    version,
    about = "Measure how many days pinned dependencies lag behind their registries"
)]
struct Cli {
    /// Dependency manifest (requirements.txt, poetry.lock, package-lock.json, go.sum, mix.lock)
    path: Option<PathBuf>,

    /// Manifest format, guessed from the file name when omitted
    #[arg(long, value_enum)]
    format: Option<ManifestFormat>,

    /// Package names to leave out, comma separated
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Fail when the average delta reaches this many days
    #[arg(long, value_name = "DAYS")]
    fail_on_avg: Option<u64>,

    /// Fail when any delta reaches this many days
    #[arg(long, value_name = "DAYS")]
    fail_on_max: Option<u64>,

    /// Report deltas as they were on this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    for_date: Option<NaiveDate>,

    /// Count versions newer than the registry's latest as up to date
    #[arg(long)]
    overtaking_safe: bool,

    /// Cache directory [default: $XDG_CACHE_HOME/deltaver]
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Always query the registries
    #[arg(long)]
    no_cache: bool,

    /// pyproject.toml holding a [tool.deltaver] table
    #[arg(long, default_value = "pyproject.toml")]
    config: PathBuf,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Write logs to this file as JSON lines instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Command line merged over the config file
#[derive(Debug, PartialEq)]
struct Settings {
    path: PathBuf,
    format: ManifestFormat,
    excluded: Vec<String>,
    thresholds: Thresholds,
    options: ScanOptions,
    cache_dir: Option<PathBuf>,
}

impl Cli {
    fn merge(self, file: FileConfig) -> anyhow::Result<Settings> {
        let path = self
            .path
            .or(file.path_to_file)
            .ok_or_else(|| {
                anyhow!("No manifest given: pass a path or set tool.deltaver.path_to_file")
            })?;

        let format = self
            .format
            .or(file.file_format)
            .or_else(|| parser::types::detect_format(&path))
            .ok_or_else(|| {
                anyhow!(
                    "Cannot tell the format of {}, pass --format",
                    path.display()
                )
            })?;

        let mut excluded = file.excluded;
        excluded.extend(self.exclude);

        let cache_dir = if self.no_cache {
            None
        } else {
            Some(
                self.cache_dir
                    .or(file.cache_dir)
                    .unwrap_or_else(config::cache_dir),
            )
        };

        Ok(Settings {
            path,
            format,
            excluded,
            thresholds: Thresholds {
                fail_on_avg: self.fail_on_avg.or(file.fail_on_avg),
                fail_on_max: self.fail_on_max.or(file.fail_on_max),
            },
            options: ScanOptions {
                overtaking_safe: self.overtaking_safe || file.overtaking_safe,
                for_date: self.for_date,
            },
            cache_dir,
        })
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let _guard = logging::init(&LogConfig::from_verbosity(
        cli.verbose,
        cli.quiet,
        cli.log_file.clone(),
    ))
    .context("Failed to open log file")?;

    let file_config = config::load_pyproject(&cli.config)?.unwrap_or_default();
    let settings = cli.merge(file_config)?;
    debug!("Settings: {:?}", settings);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(settings))
}

async fn run(settings: Settings) -> anyhow::Result<ExitCode> {
    let content = read_manifest(&settings.path)?;
    let manifest_parser = ExcludedReqs::new(parser::parser_for(settings.format), &settings.excluded);
    let requirements = manifest_parser
        .parse(&content)
        .with_context(|| format!("Failed to parse {}", settings.path.display()))?;

    let origin = RegistryHistory::new(registry_for(settings.format.registry_type()));
    let source: Box<dyn ReleaseHistorySource> = match settings.cache_dir {
        Some(dir) => Box::new(CachedHistory::new(origin, dir, SystemClock)),
        None => Box::new(origin),
    };

    let report = scan(&requirements, source.as_ref(), &SystemClock, &settings.options).await;
    print!("{}", report::render(&report));

    let violations = settings.thresholds.check(&report);
    for violation in &violations {
        eprintln!("{}", violation);
    }

    Ok(if violations.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn read_manifest(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
