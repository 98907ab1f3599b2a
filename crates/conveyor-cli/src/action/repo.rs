//! Repository registration, inspection and maintenance.

use std::io::Write;

use chrono::{DateTime, Utc};
use conveyor_api_models::{REPO_EVENTS, REPO_VISIBILITIES, Repo};
use url::Url;

use super::{list_options, require_name, require_one_of};
use crate::client::{CiClient, CliError, CliResult};
use crate::output::{Renderer, Tabular};

/// Longest build timeout a repository may request, in minutes.
const MAX_TIMEOUT_MINUTES: i64 = 90;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum RepoAction {
    Add,
    #[default]
    Get,
    View,
    Update,
    Remove,
    Repair,
    Chown,
}

impl RepoAction {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Get => "get",
            Self::View => "view",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Repair => "repair",
            Self::Chown => "chown",
        }
    }
}

/// Fields needed to perform a repository action.
#[derive(Debug, Clone, Default)]
pub(crate) struct RepoConfig {
    pub(crate) action: RepoAction,
    pub(crate) org: String,
    pub(crate) name: String,
    pub(crate) branch: String,
    pub(crate) link: String,
    pub(crate) clone: String,
    pub(crate) visibility: String,
    pub(crate) timeout: i64,
    pub(crate) private: bool,
    pub(crate) trusted: bool,
    pub(crate) active: bool,
    pub(crate) events: Vec<String>,
    pub(crate) page: i64,
    pub(crate) per_page: i64,
    pub(crate) output: String,
}

impl RepoConfig {
    pub(crate) fn validate(&self) -> CliResult<()> {
        if self.action == RepoAction::Get {
            list_options(self.page, self.per_page)?;
            return Ok(());
        }

        require_name("organization", &self.org)?;
        require_name("repository", &self.name)?;

        if matches!(self.action, RepoAction::Add | RepoAction::Update) {
            require_one_of("visibility", &self.visibility, &REPO_VISIBILITIES)?;
            if !(1..=MAX_TIMEOUT_MINUTES).contains(&self.timeout) {
                return Err(CliError::validation(format!(
                    "invalid timeout provided: {} (must be between 1 and {MAX_TIMEOUT_MINUTES} minutes)",
                    self.timeout
                )));
            }
            for event in &self.events {
                require_one_of("event", event, &REPO_EVENTS)?;
            }
            require_url("link", &self.link)?;
            require_url("clone", &self.clone)?;
        }
        Ok(())
    }

    /// The repository payload sent by `add` and `update`.
    pub(crate) fn payload(&self) -> Repo {
        let mut repo = Repo {
            org: Some(self.org.clone()),
            name: Some(self.name.clone()),
            full_name: Some(format!("{}/{}", self.org, self.name)),
            link: non_empty(&self.link),
            clone: non_empty(&self.clone),
            branch: non_empty(&self.branch),
            timeout: Some(self.timeout),
            visibility: Some(self.visibility.clone()),
            private: Some(self.private),
            trusted: Some(self.trusted),
            active: Some(self.active),
            ..Repo::default()
        };
        repo.set_events(&self.events);
        repo
    }

    pub(crate) async fn execute<W: Write>(
        self,
        client: &dyn CiClient,
        renderer: &mut Renderer<W>,
    ) -> CliResult<()> {
        self.validate()?;
        let format = renderer.format(&self.output);
        let target = format!("{}/{}", self.org, self.name);

        match self.action {
            RepoAction::Get => {
                renderer.log().debug("listing repos");
                let repos = client
                    .list_repos(&list_options(self.page, self.per_page)?)
                    .await?;
                renderer.list(format, repos)
            }
            RepoAction::View => {
                renderer.log().debug(&format!("inspecting repo {target}"));
                let repo = client.get_repo(&self.org, &self.name).await?;
                renderer.item(format, &repo)
            }
            RepoAction::Add => {
                renderer.log().debug(&format!("adding repo {target}"));
                let repo = client.add_repo(&self.payload()).await?;
                renderer.item(format, &repo)
            }
            RepoAction::Update => {
                renderer.log().debug(&format!("updating repo {target}"));
                let repo = client
                    .update_repo(&self.org, &self.name, &self.payload())
                    .await?;
                renderer.item(format, &repo)
            }
            RepoAction::Remove => {
                renderer.log().debug(&format!("removing repo {target}"));
                let message = client.remove_repo(&self.org, &self.name).await?;
                renderer.message(format, &message)
            }
            RepoAction::Repair => {
                renderer.log().debug(&format!("repairing repo {target}"));
                let message = client.repair_repo(&self.org, &self.name).await?;
                renderer.message(format, &message)
            }
            RepoAction::Chown => {
                renderer.log().debug(&format!("changing owner of repo {target}"));
                let message = client.chown_repo(&self.org, &self.name).await?;
                renderer.message(format, &message)
            }
        }
    }
}

fn require_url(field: &str, value: &str) -> CliResult<()> {
    if value.is_empty() {
        return Ok(());
    }
    Url::parse(value)
        .map(|_| ())
        .map_err(|err| CliError::validation(format!("invalid {field} provided: {value} ({err})")))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl Tabular for Repo {
    const KIND: &'static str = "repo";

    fn sort_key(&self) -> i64 {
        self.id()
    }

    fn header(wide: bool) -> &'static [&'static str] {
        if wide {
            &[
                "ORG/REPO", "ACTIVE", "EVENTS", "VISIBILITY", "BRANCH", "TIMEOUT", "TRUSTED",
                "LINK",
            ]
        } else {
            &["ORG/REPO", "ACTIVE", "EVENTS", "VISIBILITY", "BRANCH"]
        }
    }

    fn row(&self, wide: bool, _now: DateTime<Utc>) -> Vec<String> {
        let mut row = vec![
            self.full_name(),
            self.active().to_string(),
            self.events().join(","),
            self.visibility().to_string(),
            self.branch().to_string(),
        ];
        if wide {
            row.push(format!("{}m", self.timeout()));
            row.push(self.trusted().to_string());
            row.push(self.link().to_string());
        }
        row
    }
}
