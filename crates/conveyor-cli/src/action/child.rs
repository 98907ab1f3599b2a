//! Resources nested under a build (steps and services).
//!
//! Both kinds share one configuration shape; [`BuildChild`] supplies the
//! client calls and, through [`Tabular`], the noun and column layout.

use std::io::Write;
use std::marker::PhantomData;

use async_trait::async_trait;
use conveyor_api_models::ListOptions;

use super::{list_options, require_name, require_positive};
use crate::client::{CiClient, CliResult};
use crate::output::{Renderer, Tabular};

/// A resource listed and fetched by `org/repo/build/number`.
#[async_trait]
pub(crate) trait BuildChild: Tabular + Sized + Send {
    async fn list(
        client: &dyn CiClient,
        org: &str,
        repo: &str,
        build: i64,
        opts: &ListOptions,
    ) -> CliResult<Vec<Self>>;

    async fn get(
        client: &dyn CiClient,
        org: &str,
        repo: &str,
        build: i64,
        number: i64,
    ) -> CliResult<Self>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum ChildAction {
    #[default]
    Get,
    View,
}

impl ChildAction {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::View => "view",
        }
    }
}

/// Fields needed to list or inspect a build's steps or services.
#[derive(Debug, Clone)]
pub(crate) struct BuildChildConfig<K> {
    pub(crate) action: ChildAction,
    pub(crate) org: String,
    pub(crate) repo: String,
    pub(crate) build: i64,
    pub(crate) number: i64,
    pub(crate) page: i64,
    pub(crate) per_page: i64,
    pub(crate) output: String,
    kind: PhantomData<K>,
}

impl<K> Default for BuildChildConfig<K> {
    fn default() -> Self {
        Self::new(ChildAction::default())
    }
}

impl<K> BuildChildConfig<K> {
    pub(crate) fn new(action: ChildAction) -> Self {
        Self {
            action,
            org: String::new(),
            repo: String::new(),
            build: 0,
            number: 0,
            page: 0,
            per_page: 0,
            output: String::new(),
            kind: PhantomData,
        }
    }
}

impl<K: BuildChild> BuildChildConfig<K> {
    pub(crate) fn label(&self) -> String {
        format!("{} {}", self.action.as_str(), K::KIND)
    }

    pub(crate) fn validate(&self) -> CliResult<()> {
        require_name("organization", &self.org)?;
        require_name("repository", &self.repo)?;
        require_positive("build number", self.build)?;
        match self.action {
            ChildAction::Get => list_options(self.page, self.per_page).map(|_| ()),
            ChildAction::View => require_positive(&format!("{} number", K::KIND), self.number),
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
            ChildAction::Get => {
                renderer.log().debug(&format!(
                    "listing {}s for build {}/{}/{}",
                    K::KIND,
                    self.org,
                    self.repo,
                    self.build
                ));
                let opts = list_options(self.page, self.per_page)?;
                let items = K::list(client, &self.org, &self.repo, self.build, &opts).await?;
                renderer.list(format, items)
            }
            ChildAction::View => {
                renderer.log().debug(&format!(
                    "inspecting {} {}/{}/{}/{}",
                    K::KIND,
                    self.org,
                    self.repo,
                    self.build,
                    self.number
                ));
                let item = K::get(client, &self.org, &self.repo, self.build, self.number).await?;
                renderer.item(format, &item)
            }
        }
    }
}
