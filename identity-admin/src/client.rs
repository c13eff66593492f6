use crate::error::Error;
use reqwest::blocking::{Client as ReqwestClient, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_USER_MANAGEMENT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_PROVIDER_CONFIG_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v2";

/// Settings for an [`AuthClient`]. Fields left as `None` take their defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientConfiguration {
    /// Project every resource belongs to. Required.
    pub project_id: String,
    /// Overrides the backend endpoint of both user management and provider
    /// configs, e.g. the base URL of a test server.
    pub endpoint: Option<String>,
    /// A pre-configured blocking reqwest client.
    pub http_client: Option<ReqwestClient>,
}

/// Client for the identity management backend, scoped either to a project or
/// to one tenant of a project.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: ReqwestClient,
    project_id: String,
    tenant_id: Option<String>,
    user_management_endpoint: String,
    provider_config_endpoint: String,
}

impl AuthClient {
    /// Validates `configuration` and creates a project-level client.
    ///
    /// # Errors
    /// Fails when the project id is empty or the endpoint isn't an absolute URL.
    pub fn new(configuration: ClientConfiguration) -> Result<Self, Error> {
        if configuration.project_id.is_empty() {
            return Err(Error::Configuration(String::from(
                "project id must be a non-empty string",
            )));
        }

        let (user_management_endpoint, provider_config_endpoint) = match configuration.endpoint {
            Some(endpoint) => {
                Url::parse(&endpoint)?;
                let endpoint = endpoint.trim_end_matches('/').to_string();
                (endpoint.clone(), endpoint)
            }
            None => (
                String::from(DEFAULT_USER_MANAGEMENT_ENDPOINT),
                String::from(DEFAULT_PROVIDER_CONFIG_ENDPOINT),
            ),
        };

        Ok(Self {
            http: configuration.http_client.unwrap_or_default(),
            project_id: configuration.project_id,
            tenant_id: None,
            user_management_endpoint,
            provider_config_endpoint,
        })
    }

    /// Returns a client whose every operation is scoped to `tenant_id`.
    ///
    /// # Errors
    /// Fails when `tenant_id` is empty.
    pub fn auth_for_tenant(&self, tenant_id: &str) -> Result<Self, Error> {
        if tenant_id.is_empty() {
            return Err(Error::invalid("tenant id must be a non-empty string"));
        }

        Ok(Self {
            tenant_id: Some(tenant_id.to_string()),
            ..self.clone()
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    fn resource_base(&self, endpoint: &str) -> String {
        match &self.tenant_id {
            Some(tenant_id) => format!("{}/projects/{}/tenants/{}", endpoint, self.project_id, tenant_id),
            None => format!("{}/projects/{}", endpoint, self.project_id),
        }
    }

    /// `resource` is appended verbatim, so it carries its own `/` or `:`.
    pub(crate) fn user_management_url(&self, resource: &str) -> String {
        format!("{}{}", self.resource_base(&self.user_management_endpoint), resource)
    }

    pub(crate) fn provider_config_url(&self, resource: &str) -> String {
        format!("{}{}", self.resource_base(&self.provider_config_endpoint), resource)
    }

    pub(crate) fn http(&self) -> &ReqwestClient {
        &self.http
    }

    /// Sends `request` and decodes a successful JSON response.
    pub(crate) fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let request = request.build()?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.http.execute(request)?;
        let status = response.status();
        let body = response.bytes()?;

        if !status.is_success() {
            let error = backend_error(status.as_u16(), &body);
            warn!(%error, "request failed");
            return Err(error);
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Maps a failed response to `Error::Backend`, using the leading word of
/// `error.message` as the code when the body carries one.
fn backend_error(status: u16, body: &[u8]) -> Error {
    let code = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| {
            envelope
                .error
                .message
                .split(|c: char| c == ' ' || c == ':')
                .next()
                .filter(|code| !code.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    Error::Backend { status, code }
}
