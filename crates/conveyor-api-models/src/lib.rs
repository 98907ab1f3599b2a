#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the Conveyor CI API.
//!
//! Every field is optional on the wire: the server omits unset values and
//! older servers may not know newer fields. Accessors return the zero value
//! for absent fields so renderers never have to unwrap.
use serde::{Deserialize, Serialize};

/// Status reported while a build, step, or service waits for an executor.
pub const STATUS_PENDING: &str = "pending";
/// Status reported while a build, step, or service is executing.
pub const STATUS_RUNNING: &str = "running";

/// Every status a build may report.
pub const BUILD_STATUSES: [&str; 7] = [
    "pending", "running", "success", "failure", "killed", "canceled", "error",
];

/// Webhook events a repository may subscribe to.
pub const REPO_EVENTS: [&str; 5] = ["push", "pull_request", "tag", "deployment", "comment"];

/// Visibility levels accepted for a repository.
pub const REPO_VISIBILITIES: [&str; 2] = ["public", "private"];

/// Error payload returned by the API for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Pagination parameters accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page to fetch; `0` lets the server choose.
    pub page: i64,
    /// Page size; `0` lets the server choose.
    pub per_page: i64,
}

impl ListOptions {
    /// Query pairs for the non-zero fields, in a stable order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page > 0 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.per_page > 0 {
            pairs.push(("per_page", self.per_page.to_string()));
        }
        pairs
    }
}

/// Filters accepted by the build list endpoint in addition to pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildListOptions {
    /// Page and page size.
    pub list: ListOptions,
    /// Only builds triggered by this event.
    pub event: Option<String>,
    /// Only builds in this status.
    pub status: Option<String>,
    /// Only builds for this branch.
    pub branch: Option<String>,
}

impl BuildListOptions {
    /// Query pairs for pagination plus any populated filter.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.list.query_pairs();
        for (key, value) in [
            ("event", &self.event),
            ("status", &self.status),
            ("branch", &self.branch),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        pairs
    }
}

/// A single pipeline execution for a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Build {
    /// Server-assigned primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Owning repository id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<i64>,
    /// Per-repository build number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    /// Build number this build was restarted from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
    /// Webhook event that triggered the build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Lifecycle status (`pending`, `running`, `success`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Error message recorded by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Unix timestamp when the build was queued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enqueued: Option<i64>,
    /// Unix timestamp when the build was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Unix timestamp when execution started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
    /// Unix timestamp when execution finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<i64>,
    /// Deployment target for deployment events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy: Option<String>,
    /// Clone URL used by the build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone: Option<String>,
    /// Link to the change in source control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Short title describing the trigger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Commit message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Commit SHA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Account that sent the webhook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Commit author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Commit author email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Link to the build in the web UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Branch the build ran against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Fully qualified git reference.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Base reference for pull requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_ref: Option<String>,
    /// Worker host that executed the build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Container runtime used by the worker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Worker distribution (`linux`, `windows`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
}

impl Build {
    /// Build number, `0` when absent.
    #[must_use]
    pub fn number(&self) -> i64 {
        self.number.unwrap_or_default()
    }

    /// Status, empty when absent.
    #[must_use]
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }

    /// Triggering event, empty when absent.
    #[must_use]
    pub fn event(&self) -> &str {
        self.event.as_deref().unwrap_or_default()
    }

    /// Branch, empty when absent.
    #[must_use]
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or_default()
    }

    /// Commit SHA, empty when absent.
    #[must_use]
    pub fn commit(&self) -> &str {
        self.commit.as_deref().unwrap_or_default()
    }

    /// Commit author, empty when absent.
    #[must_use]
    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or_default()
    }

    /// Creation timestamp, `0` when absent.
    #[must_use]
    pub fn created(&self) -> i64 {
        self.created.unwrap_or_default()
    }

    /// Start timestamp, `0` when absent.
    #[must_use]
    pub fn started(&self) -> i64 {
        self.started.unwrap_or_default()
    }

    /// Finish timestamp, `0` when absent.
    #[must_use]
    pub fn finished(&self) -> i64 {
        self.finished.unwrap_or_default()
    }
}

/// A single step executed inside a build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Step {
    /// Server-assigned primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Owning build id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<i64>,
    /// Owning repository id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<i64>,
    /// Position of the step within the build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    /// Step name from the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Container image the step ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Stage the step belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Lifecycle status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Error message recorded by the worker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Container exit code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Unix timestamp when the step was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Unix timestamp when the step started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
    /// Unix timestamp when the step finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<i64>,
    /// Worker host that executed the step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Container runtime used by the worker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Worker distribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
}

impl Step {
    /// Step number, `0` when absent.
    #[must_use]
    pub fn number(&self) -> i64 {
        self.number.unwrap_or_default()
    }

    /// Step name, empty when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Stage name, empty when absent.
    #[must_use]
    pub fn stage(&self) -> &str {
        self.stage.as_deref().unwrap_or_default()
    }

    /// Image, empty when absent.
    #[must_use]
    pub fn image(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }

    /// Status, empty when absent.
    #[must_use]
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }

    /// Creation timestamp, `0` when absent.
    #[must_use]
    pub fn created(&self) -> i64 {
        self.created.unwrap_or_default()
    }

    /// Start timestamp, `0` when absent.
    #[must_use]
    pub fn started(&self) -> i64 {
        self.started.unwrap_or_default()
    }

    /// Finish timestamp, `0` when absent.
    #[must_use]
    pub fn finished(&self) -> i64 {
        self.finished.unwrap_or_default()
    }
}

/// A sidecar service container attached to a build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Service {
    /// Server-assigned primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Owning build id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<i64>,
    /// Owning repository id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<i64>,
    /// Position of the service within the build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    /// Service name from the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Container image the service ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Lifecycle status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Error message recorded by the worker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Container exit code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Unix timestamp when the service was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Unix timestamp when the service started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
    /// Unix timestamp when the service finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<i64>,
    /// Worker host that executed the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Container runtime used by the worker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Worker distribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
}

impl Service {
    /// Service number, `0` when absent.
    #[must_use]
    pub fn number(&self) -> i64 {
        self.number.unwrap_or_default()
    }

    /// Service name, empty when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Image, empty when absent.
    #[must_use]
    pub fn image(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }

    /// Status, empty when absent.
    #[must_use]
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }

    /// Exit code, `0` when absent.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code.unwrap_or_default()
    }

    /// Creation timestamp, `0` when absent.
    #[must_use]
    pub fn created(&self) -> i64 {
        self.created.unwrap_or_default()
    }

    /// Start timestamp, `0` when absent.
    #[must_use]
    pub fn started(&self) -> i64 {
        self.started.unwrap_or_default()
    }

    /// Finish timestamp, `0` when absent.
    #[must_use]
    pub fn finished(&self) -> i64 {
        self.finished.unwrap_or_default()
    }
}

/// A source repository enabled on the CI server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Repo {
    /// Server-assigned primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Owning user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Organization (or user) that owns the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Repository name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `org/name` as reported by source control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Web URL of the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Clone URL of the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone: Option<String>,
    /// Default branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Build timeout in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    /// `public` or `private`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Whether public access is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Whether builds run with elevated privileges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted: Option<bool>,
    /// Whether the repository is accepting webhooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Builds on pull request events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_pull: Option<bool>,
    /// Builds on push events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_push: Option<bool>,
    /// Builds on deployment events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_deploy: Option<bool>,
    /// Builds on tag events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_tag: Option<bool>,
    /// Builds on comment events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_comment: Option<bool>,
}

impl Repo {
    /// Primary key, `0` when absent.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id.unwrap_or_default()
    }

    /// `org/name`, preferring the server-reported full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.full_name {
            Some(full) if !full.is_empty() => full.clone(),
            _ => format!(
                "{}/{}",
                self.org.as_deref().unwrap_or_default(),
                self.name.as_deref().unwrap_or_default()
            ),
        }
    }

    /// Default branch, empty when absent.
    #[must_use]
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or_default()
    }

    /// Visibility, empty when absent.
    #[must_use]
    pub fn visibility(&self) -> &str {
        self.visibility.as_deref().unwrap_or_default()
    }

    /// Web URL, empty when absent.
    #[must_use]
    pub fn link(&self) -> &str {
        self.link.as_deref().unwrap_or_default()
    }

    /// Build timeout in minutes, `0` when absent.
    #[must_use]
    pub fn timeout(&self) -> i64 {
        self.timeout.unwrap_or_default()
    }

    /// Whether the repository is active.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active.unwrap_or_default()
    }

    /// Whether builds run trusted.
    #[must_use]
    pub fn trusted(&self) -> bool {
        self.trusted.unwrap_or_default()
    }

    /// Events the repository builds on, in canonical order.
    #[must_use]
    pub fn events(&self) -> Vec<&'static str> {
        [
            (self.allow_push, "push"),
            (self.allow_pull, "pull_request"),
            (self.allow_tag, "tag"),
            (self.allow_deploy, "deployment"),
            (self.allow_comment, "comment"),
        ]
        .into_iter()
        .filter_map(|(enabled, event)| enabled.unwrap_or_default().then_some(event))
        .collect()
    }

    /// Enable exactly the listed events; unknown names are ignored.
    pub fn set_events<S: AsRef<str>>(&mut self, events: &[S]) {
        let has = |name: &str| Some(events.iter().any(|event| event.as_ref() == name));
        self.allow_push = has("push");
        self.allow_pull = has("pull_request");
        self.allow_tag = has("tag");
        self.allow_deploy = has("deployment");
        self.allow_comment = has("comment");
    }
}
