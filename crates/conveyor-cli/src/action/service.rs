//! Services attached to a build.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conveyor_api_models::{ListOptions, Service};

use super::{BuildChild, BuildChildConfig};
use crate::client::{CiClient, CliResult};
use crate::output::Tabular;
use crate::output::humanize::{duration, relative_time};

pub(crate) type ServiceConfig = BuildChildConfig<Service>;

#[async_trait]
impl BuildChild for Service {
    async fn list(
        client: &dyn CiClient,
        org: &str,
        repo: &str,
        build: i64,
        opts: &ListOptions,
    ) -> CliResult<Vec<Self>> {
        client.list_services(org, repo, build, opts).await
    }

    async fn get(
        client: &dyn CiClient,
        org: &str,
        repo: &str,
        build: i64,
        number: i64,
    ) -> CliResult<Self> {
        client.get_service(org, repo, build, number).await
    }
}

impl Tabular for Service {
    const KIND: &'static str = "service";

    fn sort_key(&self) -> i64 {
        self.number()
    }

    fn header(wide: bool) -> &'static [&'static str] {
        if wide {
            &[
                "NUMBER", "NAME", "STATUS", "IMAGE", "EXIT", "DURATION", "CREATED", "FINISHED",
            ]
        } else {
            &["NUMBER", "NAME", "STATUS", "DURATION"]
        }
    }

    fn row(&self, wide: bool, now: DateTime<Utc>) -> Vec<String> {
        let elapsed = duration(self.status(), self.started(), self.finished());
        if wide {
            vec![
                self.number().to_string(),
                self.name().to_string(),
                self.status().to_string(),
                self.image().to_string(),
                self.exit_code().to_string(),
                elapsed,
                relative_time(self.created(), now),
                relative_time(self.finished(), now),
            ]
        } else {
            vec![
                self.number().to_string(),
                self.name().to_string(),
                self.status().to_string(),
                elapsed,
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ChildAction, ResourceConfig};
    use crate::client::CliError;
    use crate::testing::{FakeClient, run_config};

    fn config(action: ChildAction) -> ServiceConfig {
        let mut cfg = ServiceConfig::new(action);
        cfg.org = "github".into();
        cfg.repo = "octocat".into();
        cfg.build = 1;
        cfg.number = 1;
        cfg.page = 1;
        cfg.per_page = 10;
        cfg
    }

    #[test]
    fn build_number_is_always_required() {
        for action in [ChildAction::Get, ChildAction::View] {
            let mut cfg = config(action);
            cfg.build = 0;
            let err = cfg.validate().expect_err("build 0 rejected");
            assert_eq!(
                err.display_message(),
                "invalid build number provided: 0 (must be greater than 0)"
            );
        }
    }

    #[test]
    fn view_requires_service_number() {
        let mut cfg = config(ChildAction::View);
        cfg.number = 0;
        assert!(cfg.validate().is_err());

        let mut list = config(ChildAction::Get);
        list.number = 0;
        assert!(list.validate().is_ok());
    }

    #[tokio::test]
    async fn list_is_sorted_by_number() {
        let client = FakeClient::seeded();
        let text = run_config(ResourceConfig::Service(config(ChildAction::Get)), &client)
            .await
            .expect("list services");

        let lines: Vec<Vec<&str>> = text.lines().map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(lines[0], vec!["NUMBER", "NAME", "STATUS", "DURATION"]);
        assert_eq!(lines[1], vec!["1", "postgres", "success", "2m0s"]);
        assert_eq!(lines[2], vec!["2", "redis", "success", "2m0s"]);
        assert_eq!(client.calls(), vec!["list_services github/octocat/1"]);
    }

    #[tokio::test]
    async fn wide_view_shows_exit_code_and_times() {
        let client = FakeClient::seeded();
        let mut cfg = config(ChildAction::View);
        cfg.number = 2;
        cfg.output = "wide".into();
        let text = run_config(ResourceConfig::Service(cfg), &client)
            .await
            .expect("view service");

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("EXIT"));
        assert!(lines[1].contains("postgres:12"));
        assert!(lines[1].contains("10 minutes ago"));
        assert!(lines[1].contains("8 minutes ago"));
    }

    #[tokio::test]
    async fn missing_service_is_a_client_error() {
        let client = FakeClient::seeded();
        let mut cfg = config(ChildAction::View);
        cfg.number = 9;
        let err = run_config(ResourceConfig::Service(cfg), &client)
            .await
            .expect_err("service 9 does not exist");
        assert!(matches!(err, CliError::Client(_)));
    }
}
