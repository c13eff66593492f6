use crate::{
    client::AuthClient,
    data::provider_configs::{
        ListOidcConfigsResponse, ListSamlConfigsResponse, OidcConfigResponse, SamlConfigResponse,
    },
    error::Error,
    iterator::{Page, PageIterator},
    user_mgt::validate_non_empty,
};
use serde::de::IgnoredAny;
use serde_json::{json, Map, Value};
use url::Url;

const OIDC_ID_PREFIX: &str = "oidc.";
const SAML_ID_PREFIX: &str = "saml.";
const MAX_LIST_CONFIGS_RESULTS: u32 = 100;

/// An OpenID Connect identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OidcProviderConfig {
    pub id: String,
    pub display_name: String,
    pub enabled: bool,
    pub client_id: String,
    pub issuer: String,
}

impl From<OidcConfigResponse> for OidcProviderConfig {
    fn from(response: OidcConfigResponse) -> Self {
        Self {
            id: resource_id(&response.name),
            display_name: response.display_name,
            enabled: response.enabled,
            client_id: response.client_id,
            issuer: response.issuer,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OidcProviderConfigToCreate {
    /// Must start with `oidc.`.
    pub id: String,
    pub display_name: Option<String>,
    pub enabled: Option<bool>,
    pub client_id: String,
    pub issuer: String,
}

impl OidcProviderConfigToCreate {
    fn to_request(&self) -> Result<Map<String, Value>, Error> {
        validate_config_id(&self.id, OIDC_ID_PREFIX)?;
        validate_non_empty("ClientID", &self.client_id)?;
        validate_url("Issuer", &self.issuer)?;

        let mut request = Map::new();
        if let Some(display_name) = &self.display_name {
            request.insert(String::from("displayName"), json!(display_name));
        }
        if let Some(enabled) = self.enabled {
            request.insert(String::from("enabled"), json!(enabled));
        }
        request.insert(String::from("clientId"), json!(self.client_id));
        request.insert(String::from("issuer"), json!(self.issuer));

        Ok(request)
    }
}

/// Changes to an OIDC provider. An empty display name clears it.
#[derive(Debug, Clone, Default)]
pub struct OidcProviderConfigToUpdate {
    pub display_name: Option<String>,
    pub enabled: Option<bool>,
    pub client_id: Option<String>,
    pub issuer: Option<String>,
}

impl OidcProviderConfigToUpdate {
    fn to_request(&self) -> Result<Map<String, Value>, Error> {
        let mut request = Map::new();

        if let Some(display_name) = &self.display_name {
            request.insert(String::from("displayName"), display_name_value(display_name));
        }
        if let Some(enabled) = self.enabled {
            request.insert(String::from("enabled"), json!(enabled));
        }
        if let Some(client_id) = &self.client_id {
            validate_non_empty("ClientID", client_id)?;
            request.insert(String::from("clientId"), json!(client_id));
        }
        if let Some(issuer) = &self.issuer {
            validate_url("Issuer", issuer)?;
            request.insert(String::from("issuer"), json!(issuer));
        }

        if request.is_empty() {
            return Err(Error::invalid("no parameters specified in the update request"));
        }

        Ok(request)
    }
}

/// A SAML identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamlProviderConfig {
    pub id: String,
    pub display_name: String,
    pub enabled: bool,
    pub idp_entity_id: String,
    pub sso_url: String,
    pub request_signing_enabled: bool,
    pub x509_certificates: Vec<String>,
    pub rp_entity_id: String,
    pub callback_url: String,
}

impl From<SamlConfigResponse> for SamlProviderConfig {
    fn from(response: SamlConfigResponse) -> Self {
        Self {
            id: resource_id(&response.name),
            display_name: response.display_name,
            enabled: response.enabled,
            idp_entity_id: response.idp_config.idp_entity_id,
            sso_url: response.idp_config.sso_url,
            request_signing_enabled: response.idp_config.sign_request,
            x509_certificates: response
                .idp_config
                .idp_certificates
                .into_iter()
                .map(|certificate| certificate.x509_certificate)
                .collect(),
            rp_entity_id: response.sp_config.sp_entity_id,
            callback_url: response.sp_config.callback_uri,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SamlProviderConfigToCreate {
    /// Must start with `saml.`.
    pub id: String,
    pub display_name: Option<String>,
    pub enabled: Option<bool>,
    pub idp_entity_id: String,
    pub sso_url: String,
    pub request_signing_enabled: Option<bool>,
    pub x509_certificates: Vec<String>,
    pub rp_entity_id: String,
    pub callback_url: String,
}

impl SamlProviderConfigToCreate {
    fn to_request(&self) -> Result<Map<String, Value>, Error> {
        validate_config_id(&self.id, SAML_ID_PREFIX)?;
        validate_non_empty("IDPEntityID", &self.idp_entity_id)?;
        validate_url("SSOURL", &self.sso_url)?;
        validate_certificates(&self.x509_certificates)?;
        validate_non_empty("RPEntityID", &self.rp_entity_id)?;
        validate_url("CallbackURL", &self.callback_url)?;

        let mut idp_config = Map::new();
        idp_config.insert(String::from("idpEntityId"), json!(self.idp_entity_id));
        idp_config.insert(String::from("ssoUrl"), json!(self.sso_url));
        idp_config.insert(
            String::from("idpCertificates"),
            certificates_value(&self.x509_certificates),
        );
        if let Some(sign_request) = self.request_signing_enabled {
            idp_config.insert(String::from("signRequest"), json!(sign_request));
        }

        let mut request = Map::new();
        if let Some(display_name) = &self.display_name {
            request.insert(String::from("displayName"), json!(display_name));
        }
        if let Some(enabled) = self.enabled {
            request.insert(String::from("enabled"), json!(enabled));
        }
        request.insert(String::from("idpConfig"), Value::Object(idp_config));
        request.insert(
            String::from("spConfig"),
            json!({
                "spEntityId": self.rp_entity_id,
                "callbackUri": self.callback_url
            }),
        );

        Ok(request)
    }
}

/// Changes to a SAML provider. An empty display name clears it.
#[derive(Debug, Clone, Default)]
pub struct SamlProviderConfigToUpdate {
    pub display_name: Option<String>,
    pub enabled: Option<bool>,
    pub idp_entity_id: Option<String>,
    pub sso_url: Option<String>,
    pub request_signing_enabled: Option<bool>,
    pub x509_certificates: Option<Vec<String>>,
    pub rp_entity_id: Option<String>,
    pub callback_url: Option<String>,
}

impl SamlProviderConfigToUpdate {
    fn to_request(&self) -> Result<Map<String, Value>, Error> {
        let mut request = Map::new();
        if let Some(display_name) = &self.display_name {
            request.insert(String::from("displayName"), display_name_value(display_name));
        }
        if let Some(enabled) = self.enabled {
            request.insert(String::from("enabled"), json!(enabled));
        }

        let mut idp_config = Map::new();
        if let Some(idp_entity_id) = &self.idp_entity_id {
            validate_non_empty("IDPEntityID", idp_entity_id)?;
            idp_config.insert(String::from("idpEntityId"), json!(idp_entity_id));
        }
        if let Some(sso_url) = &self.sso_url {
            validate_url("SSOURL", sso_url)?;
            idp_config.insert(String::from("ssoUrl"), json!(sso_url));
        }
        if let Some(sign_request) = self.request_signing_enabled {
            idp_config.insert(String::from("signRequest"), json!(sign_request));
        }
        if let Some(certificates) = &self.x509_certificates {
            validate_certificates(certificates)?;
            idp_config.insert(String::from("idpCertificates"), certificates_value(certificates));
        }
        if !idp_config.is_empty() {
            request.insert(String::from("idpConfig"), Value::Object(idp_config));
        }

        let mut sp_config = Map::new();
        if let Some(rp_entity_id) = &self.rp_entity_id {
            validate_non_empty("RPEntityID", rp_entity_id)?;
            sp_config.insert(String::from("spEntityId"), json!(rp_entity_id));
        }
        if let Some(callback_url) = &self.callback_url {
            validate_url("CallbackURL", callback_url)?;
            sp_config.insert(String::from("callbackUri"), json!(callback_url));
        }
        if !sp_config.is_empty() {
            request.insert(String::from("spConfig"), Value::Object(sp_config));
        }

        if request.is_empty() {
            return Err(Error::invalid("no parameters specified in the update request"));
        }

        Ok(request)
    }
}

impl AuthClient {
    pub fn oidc_provider_config(&self, id: &str) -> Result<OidcProviderConfig, Error> {
        validate_config_id(id, OIDC_ID_PREFIX)?;
        let request = self
            .http()
            .get(self.provider_config_url(&format!("/oauthIdpConfigs/{}", id)));
        let response: OidcConfigResponse = self.send(request)?;

        Ok(response.into())
    }

    pub fn create_oidc_provider_config(
        &self,
        config: &OidcProviderConfigToCreate,
    ) -> Result<OidcProviderConfig, Error> {
        let body = config.to_request()?;
        let request = self
            .http()
            .post(self.provider_config_url("/oauthIdpConfigs"))
            .query(&[("oauthIdpConfigId", config.id.as_str())])
            .json(&body);
        let response: OidcConfigResponse = self.send(request)?;

        Ok(response.into())
    }

    pub fn update_oidc_provider_config(
        &self,
        id: &str,
        config: &OidcProviderConfigToUpdate,
    ) -> Result<OidcProviderConfig, Error> {
        validate_config_id(id, OIDC_ID_PREFIX)?;
        let body = config.to_request()?;
        let request = self
            .http()
            .patch(self.provider_config_url(&format!("/oauthIdpConfigs/{}", id)))
            .query(&[("updateMask", update_mask(&body).join(","))])
            .json(&body);
        let response: OidcConfigResponse = self.send(request)?;

        Ok(response.into())
    }

    pub fn delete_oidc_provider_config(&self, id: &str) -> Result<(), Error> {
        validate_config_id(id, OIDC_ID_PREFIX)?;
        let request = self
            .http()
            .delete(self.provider_config_url(&format!("/oauthIdpConfigs/{}", id)));
        let _: IgnoredAny = self.send(request)?;

        Ok(())
    }

    /// Lists OIDC providers, starting at `page_token` (empty for the first page).
    pub fn oidc_provider_configs(&self, page_token: &str) -> PageIterator<'_, OidcProviderConfig> {
        PageIterator::new(page_token, move |token| {
            let response: ListOidcConfigsResponse =
                self.list_provider_configs_page("/oauthIdpConfigs", token)?;

            Ok(Page {
                items: response
                    .oauth_idp_configs
                    .into_iter()
                    .map(OidcProviderConfig::from)
                    .collect(),
                next_page_token: response.next_page_token,
            })
        })
    }

    pub fn saml_provider_config(&self, id: &str) -> Result<SamlProviderConfig, Error> {
        validate_config_id(id, SAML_ID_PREFIX)?;
        let request = self
            .http()
            .get(self.provider_config_url(&format!("/inboundSamlConfigs/{}", id)));
        let response: SamlConfigResponse = self.send(request)?;

        Ok(response.into())
    }

    pub fn create_saml_provider_config(
        &self,
        config: &SamlProviderConfigToCreate,
    ) -> Result<SamlProviderConfig, Error> {
        let body = config.to_request()?;
        let request = self
            .http()
            .post(self.provider_config_url("/inboundSamlConfigs"))
            .query(&[("inboundSamlConfigId", config.id.as_str())])
            .json(&body);
        let response: SamlConfigResponse = self.send(request)?;

        Ok(response.into())
    }

    pub fn update_saml_provider_config(
        &self,
        id: &str,
        config: &SamlProviderConfigToUpdate,
    ) -> Result<SamlProviderConfig, Error> {
        validate_config_id(id, SAML_ID_PREFIX)?;
        let body = config.to_request()?;
        let request = self
            .http()
            .patch(self.provider_config_url(&format!("/inboundSamlConfigs/{}", id)))
            .query(&[("updateMask", update_mask(&body).join(","))])
            .json(&body);
        let response: SamlConfigResponse = self.send(request)?;

        Ok(response.into())
    }

    pub fn delete_saml_provider_config(&self, id: &str) -> Result<(), Error> {
        validate_config_id(id, SAML_ID_PREFIX)?;
        let request = self
            .http()
            .delete(self.provider_config_url(&format!("/inboundSamlConfigs/{}", id)));
        let _: IgnoredAny = self.send(request)?;

        Ok(())
    }

    /// Lists SAML providers, starting at `page_token` (empty for the first page).
    pub fn saml_provider_configs(&self, page_token: &str) -> PageIterator<'_, SamlProviderConfig> {
        PageIterator::new(page_token, move |token| {
            let response: ListSamlConfigsResponse =
                self.list_provider_configs_page("/inboundSamlConfigs", token)?;

            Ok(Page {
                items: response
                    .inbound_saml_configs
                    .into_iter()
                    .map(SamlProviderConfig::from)
                    .collect(),
                next_page_token: response.next_page_token,
            })
        })
    }

    fn list_provider_configs_page<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        page_token: &str,
    ) -> Result<T, Error> {
        let mut query = vec![("pageSize", MAX_LIST_CONFIGS_RESULTS.to_string())];
        if !page_token.is_empty() {
            query.push(("pageToken", page_token.to_string()));
        }

        let request = self
            .http()
            .get(self.provider_config_url(resource))
            .query(&query);
        self.send(request)
    }
}

/// Dotted paths of every leaf in `request`, sorted. Non-empty objects are
/// descended into; everything else, arrays included, is a leaf.
pub(crate) fn update_mask(request: &Map<String, Value>) -> Vec<String> {
    let mut mask = Vec::new();

    for (key, value) in request {
        match value {
            Value::Object(child) if !child.is_empty() => {
                mask.extend(
                    update_mask(child)
                        .into_iter()
                        .map(|path| format!("{}.{}", key, path)),
                );
            }
            _ => mask.push(key.clone()),
        }
    }

    mask.sort();
    mask
}

fn resource_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or_default().to_string()
}

fn display_name_value(display_name: &str) -> Value {
    if display_name.is_empty() {
        Value::Null
    } else {
        json!(display_name)
    }
}

fn certificates_value(certificates: &[String]) -> Value {
    Value::Array(
        certificates
            .iter()
            .map(|certificate| json!({ "x509Certificate": certificate }))
            .collect(),
    )
}

fn validate_config_id(id: &str, prefix: &str) -> Result<(), Error> {
    if !id.starts_with(prefix) || id.len() == prefix.len() {
        return Err(Error::invalid(format!(
            "invalid provider config id: {:?}; must start with {:?}",
            id, prefix
        )));
    }
    // the id becomes a path segment
    if id.contains(&['/', '?', '#', '%'][..]) {
        return Err(Error::invalid(format!(
            "invalid provider config id: {:?}; must not contain '/', '?', '#' or '%'",
            id
        )));
    }
    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<(), Error> {
    match Url::parse(value) {
        Ok(url) if url.has_host() => Ok(()),
        _ => Err(Error::invalid(format!("failed to parse {}: {:?}", field, value))),
    }
}

fn validate_certificates(certificates: &[String]) -> Result<(), Error> {
    if certificates.is_empty() || certificates.iter().any(String::is_empty) {
        return Err(Error::invalid(
            "X509Certificates must be a non-empty list of non-empty strings",
        ));
    }
    Ok(())
}
