//! Blocking client for a multi-tenant identity management backend.
//!
//! An [`AuthClient`] manages user accounts, session cookies, email action
//! links and OIDC/SAML provider configs, either project-wide or scoped to one
//! tenant with [`AuthClient::auth_for_tenant`].

mod client;
mod data;
mod email_action_links;
mod error;
mod iterator;
mod provider_config;
mod user_import;
mod user_mgt;

pub use client::{
    AuthClient, ClientConfiguration, DEFAULT_PROVIDER_CONFIG_ENDPOINT,
    DEFAULT_USER_MANAGEMENT_ENDPOINT,
};
pub use email_action_links::{ActionCodeSettings, AndroidSettings};
pub use error::Error;
pub use iterator::PageIterator;
pub use provider_config::{
    OidcProviderConfig, OidcProviderConfigToCreate, OidcProviderConfigToUpdate,
    SamlProviderConfig, SamlProviderConfigToCreate, SamlProviderConfigToUpdate,
};
pub use user_import::{HashConfig, ImportError, UserImportResult, UserToImport};
pub use user_mgt::{
    ExportedUserRecord, UserInfo, UserMetadata, UserRecord, UserToCreate, UserToUpdate,
};
