//! High-level client combining the JSON index and the XML-RPC surface

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::IndexConfig;
use crate::index::pypi::PypiJsonIndex;
use crate::index::registry::{PackageIndex, RpcTransport};
use crate::index::types::{BrowseResult, ProjectRole, ProjectVersion, Role, SearchResult, UserRole};
use crate::index::xmlrpc::XmlRpcClient;
use crate::shape::clean_pypi_dict;
use crate::version::error::{QypiError, TransportError};
use crate::version::resolver::{Project, ResolveOptions};
use crate::version::spec::VersionSpec;

/// Search fields that are spelled differently on the command line
const SEARCH_SYNONYMS: [(&str, &str); 5] = [
    ("homepage", "home_page"),
    ("url", "home_page"),
    ("long_description", "description"),
    ("readme", "description"),
    ("keyword", "keywords"),
];

/// Field searched by terms without a `field:` prefix
const DEFAULT_SEARCH_FIELD: &str = "description";

/// How the fields of a search are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchOperator {
    #[default]
    And,
    Or,
}

impl SearchOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOperator::And => "and",
            SearchOperator::Or => "or",
        }
    }
}

/// Field name to the values searched for in it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSpec(IndexMap<String, Vec<String>>);

impl SearchSpec {
    /// Build a spec from `field:value` and bare `value` terms
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields: IndexMap<String, Vec<String>> = IndexMap::new();
        for term in terms {
            let term = term.as_ref();
            let (field, value) = match term.split_once(':') {
                Some((field, value)) => (canonical_field(field), value),
                None => (DEFAULT_SEARCH_FIELD, term),
            };
            fields
                .entry(field.to_string())
                .or_default()
                .push(value.to_string());
        }
        Self(fields)
    }

    pub fn fields(&self) -> &IndexMap<String, Vec<String>> {
        &self.0
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(field, values)| (field.clone(), json!(values)))
                .collect(),
        )
    }
}

fn canonical_field(field: &str) -> &str {
    SEARCH_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == field)
        .map_or(field, |(_, canonical)| *canonical)
}

pub struct Qypi {
    index: Box<dyn PackageIndex>,
    rpc: Box<dyn RpcTransport>,
}

impl Qypi {
    /// Connect to the index at `config.index_url` over HTTP
    pub fn new(config: &IndexConfig) -> Result<Self, QypiError> {
        let client = config.http_client()?;
        Ok(Self::with_backends(
            Box::new(PypiJsonIndex::with_client(client.clone(), config.clone())),
            Box::new(XmlRpcClient::with_client(client, config)),
        ))
    }

    pub fn with_backends(index: Box<dyn PackageIndex>, rpc: Box<dyn RpcTransport>) -> Self {
        Self { index, rpc }
    }

    pub async fn get_project(&self, name: &str) -> Result<Project<'_>, QypiError> {
        debug!("Fetching project {}", name);
        let payload = self.index.fetch_project(name).await?;
        Ok(Project::new(self.index.as_ref(), payload))
    }

    /// Resolve a requirement token such as `foobar` or `foobar==1.0` to one release
    pub async fn get_requirement(
        &self,
        requirement: &str,
        options: ResolveOptions,
    ) -> Result<ProjectVersion, QypiError> {
        let spec = VersionSpec::parse(requirement)?;
        let mut project = self.get_project(spec.name()).await?;
        project.get_version_by_spec(&spec, options).await
    }

    /// Resolve a requirement token to every matching release, lowest first
    pub async fn get_all_requirements(
        &self,
        requirement: &str,
        options: ResolveOptions,
    ) -> Result<Vec<ProjectVersion>, QypiError> {
        let spec = VersionSpec::parse(requirement)?;
        let mut project = self.get_project(spec.name()).await?;
        project.get_all_versions_by_spec(&spec, options).await
    }

    pub async fn list_all_projects(&self) -> Result<Vec<String>, QypiError> {
        self.call("list_packages", vec![]).await
    }

    pub async fn get_project_roles(&self, project: &str) -> Result<Vec<ProjectRole>, QypiError> {
        let pairs: Vec<(Role, String)> = self.call("package_roles", vec![json!(project)]).await?;
        Ok(pairs
            .into_iter()
            .map(|(role, user)| ProjectRole { role, user })
            .collect())
    }

    pub async fn get_user_roles(&self, user: &str) -> Result<Vec<UserRole>, QypiError> {
        let pairs: Vec<(Role, String)> = self.call("user_packages", vec![json!(user)]).await?;
        Ok(pairs
            .into_iter()
            .map(|(role, project)| UserRole { project, role })
            .collect())
    }

    pub async fn search(
        &self,
        spec: &SearchSpec,
        operator: SearchOperator,
    ) -> Result<Vec<SearchResult>, QypiError> {
        info!("Searching {:?} ({})", spec.fields(), operator.as_str());
        let raw: Vec<Value> = self
            .call("search", vec![spec.to_value(), json!(operator.as_str())])
            .await?;

        raw.into_iter()
            .map(|hit| {
                let cleaned = match hit {
                    Value::Object(fields) => Value::Object(clean_pypi_dict(&fields)),
                    other => other,
                };
                serde_json::from_value(cleaned).map_err(|e| invalid_response("search", e))
            })
            .collect()
    }

    pub async fn browse(&self, classifiers: &[String]) -> Result<Vec<BrowseResult>, QypiError> {
        let pairs: Vec<(String, String)> = self.call("browse", vec![json!(classifiers)]).await?;
        Ok(pairs
            .into_iter()
            .map(|(name, version)| BrowseResult { name, version })
            .collect())
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T, QypiError> {
        let value = self.rpc.call(method, params).await?;
        serde_json::from_value(value).map_err(|e| invalid_response(method, e))
    }
}

fn invalid_response(method: &str, err: serde_json::Error) -> QypiError {
    TransportError::InvalidResponse(format!("unexpected {method} result: {err}")).into()
}
