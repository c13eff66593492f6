use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OidcConfigResponse {
    /// Full resource name; the config id is its last segment.
    pub name: String,
    pub display_name: String,
    pub enabled: bool,
    pub client_id: String,
    pub issuer: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ListOidcConfigsResponse {
    pub oauth_idp_configs: Vec<OidcConfigResponse>,
    pub next_page_token: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IdpCertificate {
    pub x509_certificate: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IdpConfig {
    pub idp_entity_id: String,
    pub sso_url: String,
    pub sign_request: bool,
    pub idp_certificates: Vec<IdpCertificate>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SpConfig {
    pub sp_entity_id: String,
    pub callback_uri: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SamlConfigResponse {
    pub name: String,
    pub display_name: String,
    pub enabled: bool,
    pub idp_config: IdpConfig,
    pub sp_config: SpConfig,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ListSamlConfigsResponse {
    pub inbound_saml_configs: Vec<SamlConfigResponse>,
    pub next_page_token: String,
}
