//! Pipeline steps executed by a build.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conveyor_api_models::{ListOptions, Step};

use super::{BuildChild, BuildChildConfig};
use crate::client::{CiClient, CliResult};
use crate::output::Tabular;
use crate::output::humanize::{duration, relative_time};

pub(crate) type StepConfig = BuildChildConfig<Step>;

#[async_trait]
impl BuildChild for Step {
    async fn list(
        client: &dyn CiClient,
        org: &str,
        repo: &str,
        build: i64,
        opts: &ListOptions,
    ) -> CliResult<Vec<Self>> {
        client.list_steps(org, repo, build, opts).await
    }

    async fn get(
        client: &dyn CiClient,
        org: &str,
        repo: &str,
        build: i64,
        number: i64,
    ) -> CliResult<Self> {
        client.get_step(org, repo, build, number).await
    }
}

impl Tabular for Step {
    const KIND: &'static str = "step";

    fn sort_key(&self) -> i64 {
        self.number()
    }

    fn header(wide: bool) -> &'static [&'static str] {
        if wide {
            &[
                "NUMBER", "NAME", "STAGE", "STATUS", "IMAGE", "DURATION", "CREATED", "FINISHED",
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
                self.stage().to_string(),
                self.status().to_string(),
                self.image().to_string(),
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
    use crate::testing::{FakeClient, run_config};
    use conveyor_test_support::fixtures;

    fn config(action: ChildAction) -> StepConfig {
        let mut cfg = StepConfig::new(action);
        cfg.org = "github".into();
        cfg.repo = "octocat".into();
        cfg.build = 1;
        cfg.number = 1;
        cfg.page = 1;
        cfg.per_page = 10;
        cfg
    }

    #[test]
    fn negative_paging_is_rejected() {
        let mut cfg = config(ChildAction::Get);
        cfg.per_page = -1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn view_requires_step_number() {
        let mut cfg = config(ChildAction::View);
        cfg.number = -4;
        let err = cfg.validate().expect_err("negative step rejected");
        assert_eq!(
            err.display_message(),
            "invalid step number provided: -4 (must be greater than 0)"
        );
    }

    #[tokio::test]
    async fn narrow_list_sorts_and_formats_duration() {
        let client = FakeClient::seeded();
        let text = run_config(ResourceConfig::Step(config(ChildAction::Get)), &client)
            .await
            .expect("list steps");

        let rows: Vec<Vec<&str>> = text.lines().map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(rows[0], vec!["NUMBER", "NAME", "STATUS", "DURATION"]);
        assert_eq!(rows[1], vec!["1", "clone", "success", "30s"]);
        assert_eq!(rows[2], vec!["2", "test", "success", "30s"]);
    }

    #[tokio::test]
    async fn pending_step_shows_placeholder_in_wide_table() {
        let pending = Step {
            started: None,
            finished: None,
            ..fixtures::step(1, "clone", "pending")
        };
        let client = FakeClient {
            steps: vec![pending],
            ..FakeClient::default()
        };
        let mut cfg = config(ChildAction::View);
        cfg.output = "wide".into();
        let text = run_config(ResourceConfig::Step(cfg), &client)
            .await
            .expect("view step");

        let header: Vec<&str> = text.lines().next().expect("header").split_whitespace().collect();
        assert_eq!(
            header,
            vec!["NUMBER", "NAME", "STAGE", "STATUS", "IMAGE", "DURATION", "CREATED", "FINISHED"]
        );
        let row: Vec<&str> = text.lines().nth(1).expect("one row").split_whitespace().collect();
        assert_eq!(&row[..6], &["1", "clone", "test", "pending", "alpine:latest", "..."]);
        assert!(text.contains("a long while ago"));
    }

    #[tokio::test]
    async fn yaml_list_keeps_api_order() {
        let client = FakeClient::seeded();
        let mut cfg = config(ChildAction::Get);
        cfg.output = "yaml".into();
        let text = run_config(ResourceConfig::Step(cfg), &client)
            .await
            .expect("list steps");

        let steps: Vec<Step> = serde_yaml::from_str(&text).expect("valid YAML");
        let numbers: Vec<i64> = steps.iter().map(Step::number).collect();
        assert_eq!(numbers, vec![2, 1]);
    }
}
