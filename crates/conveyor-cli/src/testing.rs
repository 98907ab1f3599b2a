//! In-memory [`CiClient`] returning canned resources.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use conveyor_api_models::{Build, BuildListOptions, ListOptions, Repo, Service, Step};
use conveyor_telemetry::MemoryLog;
use conveyor_test_support::fixtures;

use crate::action::ResourceConfig;
use crate::client::{CiClient, CliError, CliResult};
use crate::output::Renderer;

/// Serves whatever resources it was seeded with and records every call.
#[derive(Default)]
pub(crate) struct FakeClient {
    pub(crate) builds: Vec<Build>,
    pub(crate) repos: Vec<Repo>,
    pub(crate) services: Vec<Service>,
    pub(crate) steps: Vec<Step>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeClient {
    /// Two builds, one repo, two services and two steps for `github/octocat`.
    pub(crate) fn seeded() -> Self {
        Self {
            builds: vec![fixtures::build(2, "success"), fixtures::build(1, "success")],
            repos: vec![fixtures::repo(1, "github", "octocat")],
            services: vec![
                fixtures::service(2, "redis", "success"),
                fixtures::service(1, "postgres", "success"),
            ],
            steps: vec![
                fixtures::step(2, "test", "success"),
                fixtures::step(1, "clone", "success"),
            ],
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn find_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build> {
        self.builds
            .iter()
            .find(|build| build.number() == number)
            .cloned()
            .ok_or_else(|| not_found(&format!("build {org}/{repo}/{number}")))
    }

    fn find_repo(&self, org: &str, name: &str) -> CliResult<Repo> {
        self.repos
            .iter()
            .find(|repo| repo.full_name() == format!("{org}/{name}"))
            .cloned()
            .ok_or_else(|| not_found(&format!("repo {org}/{name}")))
    }
}

fn not_found(what: &str) -> CliError {
    CliError::client(anyhow!("unable to get {what} (status 404 Not Found)"))
}

#[async_trait]
impl CiClient for FakeClient {
    async fn list_builds(
        &self,
        org: &str,
        repo: &str,
        _opts: &BuildListOptions,
    ) -> CliResult<Vec<Build>> {
        self.record(format!("list_builds {org}/{repo}"));
        Ok(self.builds.clone())
    }

    async fn get_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build> {
        self.record(format!("get_build {org}/{repo}/{number}"));
        self.find_build(org, repo, number)
    }

    async fn restart_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build> {
        self.record(format!("restart_build {org}/{repo}/{number}"));
        let parent = self.find_build(org, repo, number)?;
        let next = self.builds.iter().map(Build::number).max().unwrap_or_default() + 1;
        Ok(Build {
            number: Some(next),
            parent: Some(number),
            status: Some("pending".into()),
            ..parent
        })
    }

    async fn cancel_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build> {
        self.record(format!("cancel_build {org}/{repo}/{number}"));
        let build = self.find_build(org, repo, number)?;
        Ok(Build {
            status: Some("canceled".into()),
            ..build
        })
    }

    async fn list_repos(&self, _opts: &ListOptions) -> CliResult<Vec<Repo>> {
        self.record("list_repos".to_string());
        Ok(self.repos.clone())
    }

    async fn get_repo(&self, org: &str, name: &str) -> CliResult<Repo> {
        self.record(format!("get_repo {org}/{name}"));
        self.find_repo(org, name)
    }

    async fn add_repo(&self, repo: &Repo) -> CliResult<Repo> {
        self.record(format!("add_repo {}", repo.full_name()));
        Ok(Repo {
            id: Some(i64::try_from(self.repos.len()).unwrap_or_default() + 1),
            ..repo.clone()
        })
    }

    async fn update_repo(&self, org: &str, name: &str, repo: &Repo) -> CliResult<Repo> {
        self.record(format!("update_repo {org}/{name}"));
        let existing = self.find_repo(org, name)?;
        Ok(Repo {
            id: existing.id,
            ..repo.clone()
        })
    }

    async fn remove_repo(&self, org: &str, name: &str) -> CliResult<String> {
        self.record(format!("remove_repo {org}/{name}"));
        self.find_repo(org, name)?;
        Ok(format!("repo {org}/{name} deleted"))
    }

    async fn repair_repo(&self, org: &str, name: &str) -> CliResult<String> {
        self.record(format!("repair_repo {org}/{name}"));
        self.find_repo(org, name)?;
        Ok(format!("repo {org}/{name} repaired"))
    }

    async fn chown_repo(&self, org: &str, name: &str) -> CliResult<String> {
        self.record(format!("chown_repo {org}/{name}"));
        self.find_repo(org, name)?;
        Ok(format!("repo {org}/{name} changed owner"))
    }

    async fn list_services(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        _opts: &ListOptions,
    ) -> CliResult<Vec<Service>> {
        self.record(format!("list_services {org}/{repo}/{build}"));
        Ok(self.services.clone())
    }

    async fn get_service(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        number: i64,
    ) -> CliResult<Service> {
        self.record(format!("get_service {org}/{repo}/{build}/{number}"));
        self.services
            .iter()
            .find(|service| service.number() == number)
            .cloned()
            .ok_or_else(|| not_found(&format!("service {org}/{repo}/{build}/{number}")))
    }

    async fn list_steps(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        _opts: &ListOptions,
    ) -> CliResult<Vec<Step>> {
        self.record(format!("list_steps {org}/{repo}/{build}"));
        Ok(self.steps.clone())
    }

    async fn get_step(&self, org: &str, repo: &str, build: i64, number: i64) -> CliResult<Step> {
        self.record(format!("get_step {org}/{repo}/{build}/{number}"));
        self.steps
            .iter()
            .find(|step| step.number() == number)
            .cloned()
            .ok_or_else(|| not_found(&format!("step {org}/{repo}/{build}/{number}")))
    }
}

/// Execute `config` against `client`, rendering into memory at the fixture clock.
pub(crate) async fn run_config(config: ResourceConfig, client: &FakeClient) -> CliResult<String> {
    let now = Utc
        .timestamp_opt(fixtures::NOW, 0)
        .single()
        .expect("valid fixture timestamp");
    let mut renderer = Renderer::new(Vec::new(), Arc::new(MemoryLog::default()), now);
    config.execute(client, &mut renderer).await?;
    Ok(String::from_utf8(renderer.into_inner()).expect("utf8 output"))
}
