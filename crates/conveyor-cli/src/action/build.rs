//! Build listing, inspection, restart and cancellation.

use std::io::Write;

use chrono::{DateTime, Utc};
use conveyor_api_models::{BUILD_STATUSES, Build, BuildListOptions, REPO_EVENTS};

use super::{list_options, require_name, require_one_of, require_positive};
use crate::client::{CiClient, CliResult};
use crate::output::humanize::{duration, relative_time};
use crate::output::{Renderer, Tabular};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BuildAction {
    #[default]
    Get,
    View,
    Restart,
    Cancel,
}

impl BuildAction {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::View => "view",
            Self::Restart => "restart",
            Self::Cancel => "cancel",
        }
    }
}

/// Fields needed to perform a build action.
#[derive(Debug, Clone, Default)]
pub(crate) struct BuildConfig {
    pub(crate) action: BuildAction,
    pub(crate) org: String,
    pub(crate) repo: String,
    pub(crate) number: i64,
    pub(crate) page: i64,
    pub(crate) per_page: i64,
    pub(crate) event: Option<String>,
    pub(crate) status: Option<String>,
    pub(crate) branch: Option<String>,
    pub(crate) output: String,
}

impl BuildConfig {
    pub(crate) fn validate(&self) -> CliResult<()> {
        require_name("organization", &self.org)?;
        require_name("repository", &self.repo)?;

        match self.action {
            BuildAction::Get => {
                list_options(self.page, self.per_page)?;
                if let Some(event) = self.event.as_deref().filter(|v| !v.is_empty()) {
                    require_one_of("event", event, &REPO_EVENTS)?;
                }
                if let Some(status) = self.status.as_deref().filter(|v| !v.is_empty()) {
                    require_one_of("status", status, &BUILD_STATUSES)?;
                }
                Ok(())
            }
            BuildAction::View | BuildAction::Restart | BuildAction::Cancel => {
                require_positive("build number", self.number)
            }
        }
    }

    pub(crate) async fn execute<W: Write>(
        self,
        client: &dyn CiClient,
        renderer: &mut Renderer<W>,
    ) -> CliResult<()> {
        self.validate()?;
        let format = renderer.format(&self.output);

        match self.action {
            BuildAction::Get => {
                let opts = BuildListOptions {
                    list: list_options(self.page, self.per_page)?,
                    event: self.event,
                    status: self.status,
                    branch: self.branch,
                };
                renderer
                    .log()
                    .debug(&format!("listing builds for repo {}/{}", self.org, self.repo));
                let builds = client.list_builds(&self.org, &self.repo, &opts).await?;
                renderer.list(format, builds)
            }
            BuildAction::View => {
                renderer.log().debug(&format!(
                    "inspecting build {}/{}/{}",
                    self.org, self.repo, self.number
                ));
                let build = client.get_build(&self.org, &self.repo, self.number).await?;
                renderer.item(format, &build)
            }
            BuildAction::Restart => {
                renderer.log().debug(&format!(
                    "restarting build {}/{}/{}",
                    self.org, self.repo, self.number
                ));
                let build = client
                    .restart_build(&self.org, &self.repo, self.number)
                    .await?;
                renderer.item(format, &build)
            }
            BuildAction::Cancel => {
                renderer.log().debug(&format!(
                    "canceling build {}/{}/{}",
                    self.org, self.repo, self.number
                ));
                let build = client
                    .cancel_build(&self.org, &self.repo, self.number)
                    .await?;
                renderer.item(format, &build)
            }
        }
    }
}

impl Tabular for Build {
    const KIND: &'static str = "build";

    fn sort_key(&self) -> i64 {
        self.number()
    }

    fn header(wide: bool) -> &'static [&'static str] {
        if wide {
            &[
                "NUMBER", "STATUS", "EVENT", "BRANCH", "COMMIT", "DURATION", "CREATED",
                "FINISHED", "AUTHOR",
            ]
        } else {
            &["NUMBER", "STATUS", "EVENT", "BRANCH", "DURATION"]
        }
    }

    fn row(&self, wide: bool, now: DateTime<Utc>) -> Vec<String> {
        let elapsed = duration(self.status(), self.started(), self.finished());
        if wide {
            vec![
                self.number().to_string(),
                self.status().to_string(),
                self.event().to_string(),
                self.branch().to_string(),
                self.commit().to_string(),
                elapsed,
                relative_time(self.created(), now),
                relative_time(self.finished(), now),
                self.author().to_string(),
            ]
        } else {
            vec![
                self.number().to_string(),
                self.status().to_string(),
                self.event().to_string(),
                self.branch().to_string(),
                elapsed,
            ]
        }
    }
}
