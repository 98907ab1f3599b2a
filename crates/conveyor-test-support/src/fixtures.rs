//! Canned API resources shaped like the server's mock responses.

use conveyor_api_models::{Build, Repo, Service, Step};

/// Fixed "current time" used by fixtures and renderer tests (2021-01-01T00:00:00Z).
pub const NOW: i64 = 1_609_459_200;

/// A finished build of `github/octocat` that ran for 90 seconds.
#[must_use]
pub fn build(number: i64, status: &str) -> Build {
    Build {
        id: Some(number),
        repo_id: Some(1),
        number: Some(number),
        parent: Some(1),
        event: Some("push".into()),
        status: Some(status.into()),
        enqueued: Some(NOW - 3_600),
        created: Some(NOW - 3_600),
        started: Some(NOW - 3_600),
        finished: Some(NOW - 3_510),
        clone: Some("https://github.com/github/octocat.git".into()),
        source: Some(
            "https://github.com/github/octocat/commit/48afb5bdc41ad69bf22588491333f7cf71135163"
                .into(),
        ),
        title: Some("push received from https://github.com/github/octocat".into()),
        message: Some("First commit...".into()),
        commit: Some("48afb5bdc41ad69bf22588491333f7cf71135163".into()),
        sender: Some("OctoKitty".into()),
        author: Some("OctoKitty".into()),
        email: Some("octokitty@github.com".into()),
        link: Some("https://ci.example.com/github/octocat/1".into()),
        branch: Some("main".into()),
        git_ref: Some("refs/heads/main".into()),
        host: Some("worker-1".into()),
        runtime: Some("docker".into()),
        distribution: Some("linux".into()),
        ..Build::default()
    }
}

/// A finished step of build 1 that ran for 30 seconds.
#[must_use]
pub fn step(number: i64, name: &str, status: &str) -> Step {
    Step {
        id: Some(number),
        build_id: Some(1),
        repo_id: Some(1),
        number: Some(number),
        name: Some(name.into()),
        image: Some("alpine:latest".into()),
        stage: Some("test".into()),
        status: Some(status.into()),
        exit_code: Some(0),
        created: Some(NOW - 600),
        started: Some(NOW - 600),
        finished: Some(NOW - 570),
        host: Some("worker-1".into()),
        runtime: Some("docker".into()),
        distribution: Some("linux".into()),
        ..Step::default()
    }
}

/// A finished service of build 1 that ran for two minutes.
#[must_use]
pub fn service(number: i64, name: &str, status: &str) -> Service {
    Service {
        id: Some(number),
        build_id: Some(1),
        repo_id: Some(1),
        number: Some(number),
        name: Some(name.into()),
        image: Some("postgres:12".into()),
        status: Some(status.into()),
        exit_code: Some(0),
        created: Some(NOW - 600),
        started: Some(NOW - 600),
        finished: Some(NOW - 480),
        host: Some("worker-1".into()),
        runtime: Some("docker".into()),
        distribution: Some("linux".into()),
        ..Service::default()
    }
}

/// An active public repository building on push and pull request events.
#[must_use]
pub fn repo(id: i64, org: &str, name: &str) -> Repo {
    Repo {
        id: Some(id),
        user_id: Some(1),
        org: Some(org.into()),
        name: Some(name.into()),
        full_name: Some(format!("{org}/{name}")),
        link: Some(format!("https://github.com/{org}/{name}")),
        clone: Some(format!("https://github.com/{org}/{name}.git")),
        branch: Some("main".into()),
        timeout: Some(30),
        visibility: Some("public".into()),
        private: Some(false),
        trusted: Some(false),
        active: Some(true),
        allow_pull: Some(true),
        allow_push: Some(true),
        allow_deploy: Some(false),
        allow_tag: Some(false),
        allow_comment: Some(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_fixture_ran_for_ninety_seconds() {
        let build = build(3, "success");
        assert_eq!(build.number(), 3);
        assert_eq!(build.finished() - build.started(), 90);
    }

    #[test]
    fn repo_fixture_enables_default_events() {
        let repo = repo(1, "github", "octocat");
        assert_eq!(repo.events(), vec!["push", "pull_request"]);
        assert_eq!(repo.full_name(), "github/octocat");
    }
}
