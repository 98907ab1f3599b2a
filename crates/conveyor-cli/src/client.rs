//! Shared client abstraction, HTTP implementation, and error types for the CLI.

use std::io;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use conveyor_api_models::{Build, BuildListOptions, ErrorBody, ListOptions, Repo, Service, Step};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// CLI-level error type separating bad input, remote failures, and output failures.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Validation(String),
    #[error("{0:#}")]
    Client(anyhow::Error),
    #[error("failed to write output: {0}")]
    Render(#[from] io::Error),
    #[error("{0}")]
    Config(String),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn client(error: impl Into<anyhow::Error>) -> Self {
        Self::Client(error.into())
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Config(_) => 2,
            Self::Client(_) => 3,
            Self::Render(_) => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        self.to_string()
    }
}

/// Remote operations the resource configurations dispatch to.
///
/// Each method issues exactly one request. Errors are returned untouched so the
/// caller decides how to surface them.
#[async_trait]
pub(crate) trait CiClient: Send + Sync {
    async fn list_builds(
        &self,
        org: &str,
        repo: &str,
        opts: &BuildListOptions,
    ) -> CliResult<Vec<Build>>;
    async fn get_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build>;
    async fn restart_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build>;
    async fn cancel_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build>;

    async fn list_repos(&self, opts: &ListOptions) -> CliResult<Vec<Repo>>;
    async fn get_repo(&self, org: &str, name: &str) -> CliResult<Repo>;
    async fn add_repo(&self, repo: &Repo) -> CliResult<Repo>;
    async fn update_repo(&self, org: &str, name: &str, repo: &Repo) -> CliResult<Repo>;
    async fn remove_repo(&self, org: &str, name: &str) -> CliResult<String>;
    async fn repair_repo(&self, org: &str, name: &str) -> CliResult<String>;
    async fn chown_repo(&self, org: &str, name: &str) -> CliResult<String>;

    async fn list_services(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        opts: &ListOptions,
    ) -> CliResult<Vec<Service>>;
    async fn get_service(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        number: i64,
    ) -> CliResult<Service>;

    async fn list_steps(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        opts: &ListOptions,
    ) -> CliResult<Vec<Step>>;
    async fn get_step(&self, org: &str, repo: &str, build: i64, number: i64) -> CliResult<Step>;
}

/// [`CiClient`] backed by the server's `/api/v1` REST routes.
pub(crate) struct HttpClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpClient {
    pub(crate) fn new(base_url: Url, token: Option<String>, timeout: Duration) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("conveyor-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| CliError::client(anyhow!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> CliResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CliError::client(anyhow!("API address '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> CliResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|err| CliError::client(anyhow!("request to {path} failed: {err}")))?;

        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .map_err(|err| CliError::client(anyhow!("failed to parse response from {path}: {err}")))
        } else {
            Err(classify_problem(response).await)
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> CliResult<T> {
        let url = self.endpoint(segments, query)?;
        let path = url.path().to_string();
        tracing::debug!(%method, path = %path, "sending request");
        self.send(self.request(method, url), &path).await
    }

    async fn call_with_body<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> CliResult<T> {
        let url = self.endpoint(segments, &[])?;
        let path = url.path().to_string();
        tracing::debug!(%method, path = %path, "sending request with body");
        self.send(self.request(method, url).json(body), &path).await
    }
}

#[async_trait]
impl CiClient for HttpClient {
    async fn list_builds(
        &self,
        org: &str,
        repo: &str,
        opts: &BuildListOptions,
    ) -> CliResult<Vec<Build>> {
        self.call(
            Method::GET,
            &["repos", org, repo, "builds"],
            &opts.query_pairs(),
        )
        .await
    }

    async fn get_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build> {
        let number = number.to_string();
        self.call(Method::GET, &["repos", org, repo, "builds", number.as_str()], &[])
            .await
    }

    async fn restart_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build> {
        let number = number.to_string();
        self.call(Method::POST, &["repos", org, repo, "builds", number.as_str()], &[])
            .await
    }

    async fn cancel_build(&self, org: &str, repo: &str, number: i64) -> CliResult<Build> {
        let number = number.to_string();
        self.call(
            Method::DELETE,
            &["repos", org, repo, "builds", number.as_str(), "cancel"],
            &[],
        )
        .await
    }

    async fn list_repos(&self, opts: &ListOptions) -> CliResult<Vec<Repo>> {
        self.call(Method::GET, &["repos"], &opts.query_pairs()).await
    }

    async fn get_repo(&self, org: &str, name: &str) -> CliResult<Repo> {
        self.call(Method::GET, &["repos", org, name], &[]).await
    }

    async fn add_repo(&self, repo: &Repo) -> CliResult<Repo> {
        self.call_with_body(Method::POST, &["repos"], repo).await
    }

    async fn update_repo(&self, org: &str, name: &str, repo: &Repo) -> CliResult<Repo> {
        self.call_with_body(Method::PUT, &["repos", org, name], repo)
            .await
    }

    async fn remove_repo(&self, org: &str, name: &str) -> CliResult<String> {
        self.call(Method::DELETE, &["repos", org, name], &[]).await
    }

    async fn repair_repo(&self, org: &str, name: &str) -> CliResult<String> {
        self.call(Method::PATCH, &["repos", org, name, "repair"], &[])
            .await
    }

    async fn chown_repo(&self, org: &str, name: &str) -> CliResult<String> {
        self.call(Method::PATCH, &["repos", org, name, "chown"], &[])
            .await
    }

    async fn list_services(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        opts: &ListOptions,
    ) -> CliResult<Vec<Service>> {
        let build = build.to_string();
        self.call(
            Method::GET,
            &["repos", org, repo, "builds", build.as_str(), "services"],
            &opts.query_pairs(),
        )
        .await
    }

    async fn get_service(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        number: i64,
    ) -> CliResult<Service> {
        let (build, number) = (build.to_string(), number.to_string());
        self.call(
            Method::GET,
            &["repos", org, repo, "builds", build.as_str(), "services", number.as_str()],
            &[],
        )
        .await
    }

    async fn list_steps(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        opts: &ListOptions,
    ) -> CliResult<Vec<Step>> {
        let build = build.to_string();
        self.call(
            Method::GET,
            &["repos", org, repo, "builds", build.as_str(), "steps"],
            &opts.query_pairs(),
        )
        .await
    }

    async fn get_step(&self, org: &str, repo: &str, build: i64, number: i64) -> CliResult<Step> {
        let (build, number) = (build.to_string(), number.to_string());
        self.call(
            Method::GET,
            &["repos", org, repo, "builds", build.as_str(), "steps", number.as_str()],
            &[],
        )
        .await
    }
}

/// Parse the API address provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .trim()
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Turn a non-2xx response into a client error, preferring the server's message.
pub(crate) async fn classify_problem(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();

    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();
    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .map(|problem| problem.error)
        .unwrap_or(body_text);

    if message.is_empty() {
        CliError::client(anyhow!("request failed with status {status}"))
    } else {
        CliError::client(anyhow!("{message} (status {status})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use conveyor_test_support::fixtures;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer, token: Option<&str>) -> Result<HttpClient> {
        let base_url = parse_url(&server.base_url()).map_err(|err| anyhow!(err))?;
        HttpClient::new(base_url, token.map(str::to_string), Duration::from_secs(5))
            .map_err(|err| anyhow!(err.display_message()))
    }

    #[test]
    fn exit_codes_distinguish_error_kinds() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::config("bad").exit_code(), 2);
        assert_eq!(CliError::client(anyhow!("down")).exit_code(), 3);
        assert_eq!(CliError::from(io::Error::other("pipe")).exit_code(), 4);
    }

    #[test]
    fn client_errors_display_full_chain() {
        let err = CliError::client(anyhow!("connection refused").context("request failed"));
        assert_eq!(err.display_message(), "request failed: connection refused");
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("http://ci.example.com").is_ok());
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn endpoint_escapes_segments_and_keeps_base_path() -> Result<()> {
        let client = HttpClient::new(
            parse_url("https://ci.example.com/prefix/").map_err(|err| anyhow!(err))?,
            None,
            Duration::from_secs(1),
        )
        .map_err(|err| anyhow!(err.display_message()))?;

        let url = client
            .endpoint(&["repos", "my org", "repo"], &[("page", "2".to_string())])
            .map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/prefix/api/v1/repos/my%20org/repo?page=2"
        );
        Ok(())
    }

    #[tokio::test]
    async fn list_builds_sends_filters_and_token() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/repos/github/octocat/builds")
                .query_param("page", "1")
                .query_param("per_page", "10")
                .query_param("status", "success")
                .header("authorization", "Bearer secret");
            then.status(200).json_body(json!([
                fixtures::build(1, "success"),
                fixtures::build(2, "success"),
            ]));
        });

        let client = client_for(&server, Some("secret"))?;
        let opts = BuildListOptions {
            list: ListOptions {
                page: 1,
                per_page: 10,
            },
            status: Some("success".into()),
            ..BuildListOptions::default()
        };
        let builds = client
            .list_builds("github", "octocat", &opts)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        mock.assert();
        assert_eq!(builds.len(), 2);
        assert_eq!(builds[1].number(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn cancel_build_uses_delete_route() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/api/v1/repos/github/octocat/builds/1/cancel");
            then.status(200)
                .json_body(json!(fixtures::build(1, "canceled")));
        });

        let client = client_for(&server, None)?;
        let build = client
            .cancel_build("github", "octocat", 1)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        mock.assert();
        assert_eq!(build.status(), "canceled");
        Ok(())
    }

    #[tokio::test]
    async fn update_repo_puts_payload() -> Result<()> {
        let server = MockServer::start_async().await;
        let repo = fixtures::repo(1, "github", "octocat");
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/v1/repos/github/octocat")
                .json_body(json!(repo));
            then.status(200).json_body(json!(repo));
        });

        let client = client_for(&server, None)?;
        let updated = client
            .update_repo("github", "octocat", &repo)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        mock.assert();
        assert_eq!(updated, repo);
        Ok(())
    }

    #[tokio::test]
    async fn repair_repo_returns_server_message() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH).path("/api/v1/repos/github/octocat/repair");
            then.status(200).json_body(json!("repo github/octocat repaired"));
        });

        let client = client_for(&server, None)?;
        let message = client
            .repair_repo("github", "octocat")
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        mock.assert();
        assert_eq!(message, "repo github/octocat repaired");
        Ok(())
    }

    #[tokio::test]
    async fn get_step_hits_nested_route() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/repos/github/octocat/builds/3/steps/2");
            then.status(200)
                .json_body(json!(fixtures::step(2, "test", "success")));
        });

        let client = client_for(&server, None)?;
        let step = client
            .get_step("github", "octocat", 3, 2)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        mock.assert();
        assert_eq!(step.name(), "test");
        Ok(())
    }

    #[tokio::test]
    async fn error_body_is_surfaced_as_client_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/repos/github/octocat/builds/0");
            then.status(404)
                .json_body(json!({"error": "unable to get build github/octocat/0"}));
        });

        let client = client_for(&server, None)?;
        let err = client
            .get_build("github", "octocat", 0)
            .await
            .expect_err("missing build should fail");

        assert!(matches!(err, CliError::Client(_)));
        assert_eq!(
            err.display_message(),
            "unable to get build github/octocat/0 (status 404 Not Found)"
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_error_body_reports_status() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/repos");
            then.status(502);
        });

        let client = client_for(&server, None)?;
        let err = client
            .list_repos(&ListOptions::default())
            .await
            .expect_err("bad gateway should fail");

        assert_eq!(
            err.display_message(),
            "request failed with status 502 Bad Gateway"
        );
        Ok(())
    }

    #[tokio::test]
    async fn malformed_payload_is_a_client_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/repos/github/octocat");
            then.status(200).body("not json");
        });

        let client = client_for(&server, None)?;
        let err = client
            .get_repo("github", "octocat")
            .await
            .expect_err("decode should fail");

        assert!(matches!(err, CliError::Client(_)));
        assert!(err.display_message().starts_with("failed to parse response from /api/v1/repos/github/octocat"));
        Ok(())
    }
}
