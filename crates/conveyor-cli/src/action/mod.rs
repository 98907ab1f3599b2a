//! Per-resource configurations: validation and dispatch of a single action.
//!
//! Every invocation builds exactly one [`ResourceConfig`], which moves through
//! `validate` → client call → render and is consumed on the way. Validation
//! always runs before the client is touched.

pub(crate) mod build;
pub(crate) mod child;
pub(crate) mod repo;
pub(crate) mod service;
pub(crate) mod step;

use std::io::Write;

use conveyor_api_models::ListOptions;

use crate::client::{CiClient, CliError, CliResult};
use crate::output::Renderer;

pub(crate) use build::{BuildAction, BuildConfig};
pub(crate) use child::{BuildChild, BuildChildConfig, ChildAction};
pub(crate) use repo::{RepoAction, RepoConfig};
pub(crate) use service::ServiceConfig;
pub(crate) use step::StepConfig;

/// The configuration for one CLI invocation, tagged by resource kind.
#[derive(Debug, Clone)]
pub(crate) enum ResourceConfig {
    Build(BuildConfig),
    Repo(RepoConfig),
    Service(ServiceConfig),
    Step(StepConfig),
}

impl ResourceConfig {
    /// Check the fields the action needs without contacting the server.
    pub(crate) fn validate(&self) -> CliResult<()> {
        match self {
            Self::Build(config) => config.validate(),
            Self::Repo(config) => config.validate(),
            Self::Service(config) => config.validate(),
            Self::Step(config) => config.validate(),
        }
    }

    /// Validate, issue one request through `client`, and render the response.
    pub(crate) async fn execute<W: Write>(
        self,
        client: &dyn CiClient,
        renderer: &mut Renderer<W>,
    ) -> CliResult<()> {
        match self {
            Self::Build(config) => config.execute(client, renderer).await,
            Self::Repo(config) => config.execute(client, renderer).await,
            Self::Service(config) => config.execute(client, renderer).await,
            Self::Step(config) => config.execute(client, renderer).await,
        }
    }

    /// `<action> <kind>`, as typed on the command line.
    pub(crate) fn label(&self) -> String {
        match self {
            Self::Build(config) => format!("{} build", config.action.as_str()),
            Self::Repo(config) => format!("{} repo", config.action.as_str()),
            Self::Service(config) => config.label(),
            Self::Step(config) => config.label(),
        }
    }
}

pub(crate) fn require_name(field: &str, value: &str) -> CliResult<()> {
    if value.trim().is_empty() {
        Err(CliError::validation(format!("no {field} provided")))
    } else {
        Ok(())
    }
}

pub(crate) fn require_positive(field: &str, value: i64) -> CliResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "invalid {field} provided: {value} (must be greater than 0)"
        )))
    }
}

pub(crate) fn require_one_of(field: &str, value: &str, allowed: &[&str]) -> CliResult<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "invalid {field} provided: {value} (expected one of: {})",
            allowed.join(", ")
        )))
    }
}

/// Pagination must not be negative; zero leaves the choice to the server.
pub(crate) fn list_options(page: i64, per_page: i64) -> CliResult<ListOptions> {
    if page < 0 {
        return Err(CliError::validation(format!(
            "invalid page provided: {page}"
        )));
    }
    if per_page < 0 {
        return Err(CliError::validation(format!(
            "invalid per page provided: {per_page}"
        )));
    }
    Ok(ListOptions { page, per_page })
}
