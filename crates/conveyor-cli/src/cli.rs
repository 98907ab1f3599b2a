//! Argument parsing and command dispatch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use conveyor_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TracingLog, init_logging};

use crate::action::{
    BuildAction, BuildChild, BuildChildConfig, BuildConfig, ChildAction, RepoAction, RepoConfig,
    ResourceConfig,
};
use crate::client::{CliError, CliResult, HttpClient, parse_url};
use crate::config::ConfigFile;
use crate::output::Renderer;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 10;

/// Parses CLI arguments, executes the requested command and reports failures.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    let Cli {
        api_addr,
        token,
        config: config_path,
        http_timeout,
        log_level,
        log_format,
        command,
    } = cli;

    let file = ConfigFile::load(config_path.as_deref())?;
    install_logging(log_level, log_format, &file);

    let config = command.into_config(&file);
    config.validate()?;

    let addr = api_addr
        .or_else(|| file.api.addr.clone())
        .filter(|addr| !addr.trim().is_empty())
        .ok_or_else(|| {
            CliError::validation(
                "no API address provided (use --api-addr, CONVEYOR_ADDR or api.addr in the config file)",
            )
        })?;
    let base_url = parse_url(&addr).map_err(CliError::validation)?;
    let client = HttpClient::new(
        base_url,
        token.or_else(|| file.api.token.clone()),
        Duration::from_secs(http_timeout),
    )?;

    tracing::debug!(command = %config.label(), "dispatching command");
    let mut renderer = Renderer::stdout(Arc::new(TracingLog));
    config.execute(&client, &mut renderer).await
}

fn install_logging(level: Option<String>, format: Option<String>, file: &ConfigFile) {
    let level = level
        .or_else(|| file.log.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let format = format
        .or_else(|| file.log.format.clone())
        .map_or_else(LogFormat::infer, |name| LogFormat::from_name(&name));
    if let Err(err) = init_logging(&LoggingConfig {
        level: &level,
        format,
    }) {
        eprintln!("warning: {err:#}");
    }
}

#[derive(Parser)]
#[command(
    name = "conveyor",
    version,
    about = "Command-line client for the Conveyor CI service"
)]
struct Cli {
    #[arg(long, global = true, env = "CONVEYOR_ADDR", help = "Base URL of the CI server")]
    api_addr: Option<String>,
    #[arg(long, global = true, env = "CONVEYOR_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long, global = true, env = "CONVEYOR_CONFIG", help = "Path to a YAML config file")]
    config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "CONVEYOR_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "HTTP request timeout in seconds"
    )]
    http_timeout: u64,
    #[arg(long, global = true, env = "CONVEYOR_LOG_LEVEL")]
    log_level: Option<String>,
    #[arg(long, global = true, env = "CONVEYOR_LOG_FORMAT", help = "json or pretty")]
    log_format: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List resources.
    #[command(subcommand)]
    Get(GetCommand),
    /// Inspect a single resource.
    #[command(subcommand)]
    View(ViewCommand),
    #[command(subcommand)]
    Restart(RestartCommand),
    #[command(subcommand)]
    Cancel(CancelCommand),
    #[command(subcommand)]
    Add(AddCommand),
    #[command(subcommand)]
    Update(UpdateCommand),
    #[command(subcommand)]
    Remove(RemoveCommand),
    #[command(subcommand)]
    Repair(RepairCommand),
    #[command(subcommand)]
    Chown(ChownCommand),
}

#[derive(Subcommand)]
enum GetCommand {
    #[command(visible_alias = "builds")]
    Build(BuildListArgs),
    #[command(visible_alias = "repos")]
    Repo(RepoListArgs),
    #[command(visible_alias = "services")]
    Service(NestedListArgs),
    #[command(visible_alias = "steps")]
    Step(NestedListArgs),
}

#[derive(Subcommand)]
enum ViewCommand {
    Build(BuildItemArgs),
    Repo(RepoTargetArgs),
    Service(NestedItemArgs),
    Step(NestedItemArgs),
}

#[derive(Subcommand)]
enum RestartCommand {
    Build(BuildItemArgs),
}

#[derive(Subcommand)]
enum CancelCommand {
    Build(BuildItemArgs),
}

#[derive(Subcommand)]
enum AddCommand {
    Repo(RepoWriteArgs),
}

#[derive(Subcommand)]
enum UpdateCommand {
    Repo(RepoWriteArgs),
}

#[derive(Subcommand)]
enum RemoveCommand {
    Repo(RepoTargetArgs),
}

#[derive(Subcommand)]
enum RepairCommand {
    Repo(RepoTargetArgs),
}

#[derive(Subcommand)]
enum ChownCommand {
    Repo(RepoTargetArgs),
}

#[derive(Args)]
struct OutputArgs {
    #[arg(
        long = "output",
        visible_alias = "op",
        env = "CONVEYOR_OUTPUT",
        help = "Render as table (default), wide, json, yaml, spew or dump"
    )]
    output: Option<String>,
}

impl OutputArgs {
    fn resolve(self, file: &ConfigFile) -> String {
        self.output
            .or_else(|| file.output.clone())
            .unwrap_or_default()
    }
}

#[derive(Args)]
struct TargetArgs {
    #[arg(long, short = 'o', env = "CONVEYOR_ORG")]
    org: Option<String>,
    #[arg(long, short = 'r', env = "CONVEYOR_REPO")]
    repo: Option<String>,
}

impl TargetArgs {
    fn resolve(self, file: &ConfigFile) -> (String, String) {
        (
            self.org.or_else(|| file.org.clone()).unwrap_or_default(),
            self.repo.or_else(|| file.repo.clone()).unwrap_or_default(),
        )
    }
}

#[derive(Args)]
struct PageArgs {
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    page: i64,
    #[arg(long, visible_alias = "pp", default_value_t = DEFAULT_PER_PAGE)]
    per_page: i64,
}

#[derive(Args)]
struct BuildListArgs {
    #[command(flatten)]
    target: TargetArgs,
    #[command(flatten)]
    page: PageArgs,
    #[arg(long, help = "Only builds triggered by this event")]
    event: Option<String>,
    #[arg(long, help = "Only builds with this status")]
    status: Option<String>,
    #[arg(long, help = "Only builds for this branch")]
    branch: Option<String>,
    #[command(flatten)]
    output: OutputArgs,
}

impl BuildListArgs {
    fn into_config(self, file: &ConfigFile) -> BuildConfig {
        let (org, repo) = self.target.resolve(file);
        BuildConfig {
            action: BuildAction::Get,
            org,
            repo,
            number: 0,
            page: self.page.page,
            per_page: self.page.per_page,
            event: self.event,
            status: self.status,
            branch: self.branch,
            output: self.output.resolve(file),
        }
    }
}

#[derive(Args)]
struct BuildItemArgs {
    #[command(flatten)]
    target: TargetArgs,
    #[arg(long = "build", short = 'b', visible_alias = "number", default_value_t = 0)]
    number: i64,
    #[command(flatten)]
    output: OutputArgs,
}

impl BuildItemArgs {
    fn into_config(self, action: BuildAction, file: &ConfigFile) -> BuildConfig {
        let (org, repo) = self.target.resolve(file);
        BuildConfig {
            action,
            org,
            repo,
            number: self.number,
            output: self.output.resolve(file),
            ..BuildConfig::default()
        }
    }
}

#[derive(Args)]
struct NestedListArgs {
    #[command(flatten)]
    target: TargetArgs,
    #[arg(long, short = 'b', default_value_t = 0)]
    build: i64,
    #[command(flatten)]
    page: PageArgs,
    #[command(flatten)]
    output: OutputArgs,
}

impl NestedListArgs {
    fn into_config<K: BuildChild>(self, file: &ConfigFile) -> BuildChildConfig<K> {
        let (org, repo) = self.target.resolve(file);
        let mut config = BuildChildConfig::new(ChildAction::Get);
        config.org = org;
        config.repo = repo;
        config.build = self.build;
        config.page = self.page.page;
        config.per_page = self.page.per_page;
        config.output = self.output.resolve(file);
        config
    }
}

#[derive(Args)]
struct NestedItemArgs {
    #[command(flatten)]
    target: TargetArgs,
    #[arg(long, short = 'b', default_value_t = 0)]
    build: i64,
    #[arg(long, short = 'n', default_value_t = 0)]
    number: i64,
    #[command(flatten)]
    output: OutputArgs,
}

impl NestedItemArgs {
    fn into_config<K: BuildChild>(self, file: &ConfigFile) -> BuildChildConfig<K> {
        let (org, repo) = self.target.resolve(file);
        let mut config = BuildChildConfig::new(ChildAction::View);
        config.org = org;
        config.repo = repo;
        config.build = self.build;
        config.number = self.number;
        config.output = self.output.resolve(file);
        config
    }
}

#[derive(Args)]
struct RepoListArgs {
    #[command(flatten)]
    page: PageArgs,
    #[command(flatten)]
    output: OutputArgs,
}

impl RepoListArgs {
    fn into_config(self, file: &ConfigFile) -> RepoConfig {
        RepoConfig {
            action: RepoAction::Get,
            page: self.page.page,
            per_page: self.page.per_page,
            output: self.output.resolve(file),
            ..RepoConfig::default()
        }
    }
}

#[derive(Args)]
struct RepoTargetArgs {
    #[command(flatten)]
    target: TargetArgs,
    #[command(flatten)]
    output: OutputArgs,
}

impl RepoTargetArgs {
    fn into_config(self, action: RepoAction, file: &ConfigFile) -> RepoConfig {
        let (org, name) = self.target.resolve(file);
        RepoConfig {
            action,
            org,
            name,
            output: self.output.resolve(file),
            ..RepoConfig::default()
        }
    }
}

#[derive(Args)]
struct RepoWriteArgs {
    #[command(flatten)]
    target: TargetArgs,
    #[arg(long, default_value = "main", help = "Default branch")]
    branch: String,
    #[arg(long, default_value = "", help = "Web URL of the repository")]
    link: String,
    #[arg(long, default_value = "", help = "Clone URL of the repository")]
    clone: String,
    #[arg(long, default_value = "public")]
    visibility: String,
    #[arg(long, default_value_t = 30, help = "Build timeout in minutes")]
    timeout: i64,
    #[arg(long, action = ArgAction::Set, default_value_t = false)]
    private: bool,
    #[arg(long, action = ArgAction::Set, default_value_t = false)]
    trusted: bool,
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    active: bool,
    #[arg(
        long = "event",
        short = 'e',
        value_delimiter = ',',
        default_values_t = [String::from("push"), String::from("pull_request")]
    )]
    events: Vec<String>,
    #[command(flatten)]
    output: OutputArgs,
}

impl RepoWriteArgs {
    fn into_config(self, action: RepoAction, file: &ConfigFile) -> RepoConfig {
        let (org, name) = self.target.resolve(file);
        RepoConfig {
            action,
            org,
            name,
            branch: self.branch,
            link: self.link,
            clone: self.clone,
            visibility: self.visibility,
            timeout: self.timeout,
            private: self.private,
            trusted: self.trusted,
            active: self.active,
            events: self.events,
            page: 0,
            per_page: 0,
            output: self.output.resolve(file),
        }
    }
}

impl Command {
    /// Flags win over config file values; anything still unset stays empty
    /// and is left for validation to report.
    fn into_config(self, file: &ConfigFile) -> ResourceConfig {
        match self {
            Self::Get(command) => match command {
                GetCommand::Build(args) => ResourceConfig::Build(args.into_config(file)),
                GetCommand::Repo(args) => ResourceConfig::Repo(args.into_config(file)),
                GetCommand::Service(args) => ResourceConfig::Service(args.into_config(file)),
                GetCommand::Step(args) => ResourceConfig::Step(args.into_config(file)),
            },
            Self::View(command) => match command {
                ViewCommand::Build(args) => {
                    ResourceConfig::Build(args.into_config(BuildAction::View, file))
                }
                ViewCommand::Repo(args) => {
                    ResourceConfig::Repo(args.into_config(RepoAction::View, file))
                }
                ViewCommand::Service(args) => ResourceConfig::Service(args.into_config(file)),
                ViewCommand::Step(args) => ResourceConfig::Step(args.into_config(file)),
            },
            Self::Restart(RestartCommand::Build(args)) => {
                ResourceConfig::Build(args.into_config(BuildAction::Restart, file))
            }
            Self::Cancel(CancelCommand::Build(args)) => {
                ResourceConfig::Build(args.into_config(BuildAction::Cancel, file))
            }
            Self::Add(AddCommand::Repo(args)) => {
                ResourceConfig::Repo(args.into_config(RepoAction::Add, file))
            }
            Self::Update(UpdateCommand::Repo(args)) => {
                ResourceConfig::Repo(args.into_config(RepoAction::Update, file))
            }
            Self::Remove(RemoveCommand::Repo(args)) => {
                ResourceConfig::Repo(args.into_config(RepoAction::Remove, file))
            }
            Self::Repair(RepairCommand::Repo(args)) => {
                ResourceConfig::Repo(args.into_config(RepoAction::Repair, file))
            }
            Self::Chown(ChownCommand::Repo(args)) => {
                ResourceConfig::Repo(args.into_config(RepoAction::Chown, file))
            }
        }
    }
}
