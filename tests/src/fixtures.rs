use echoback::{load_fixture, EchoServer};
use identity_admin::{
    ActionCodeSettings, AndroidSettings, AuthClient, ClientConfiguration, ExportedUserRecord,
    OidcProviderConfig, SamlProviderConfig, UserInfo, UserMetadata, UserRecord,
};
use serde_json::{json, Map, Value};

pub const PROJECT_ID: &str = "mock-project-id";
pub const TENANT_ID: &str = "tenantID";
pub const TEST_EMAIL: &str = "test@domain.com";
pub const TEST_ACTION_LINK: &str = "https://test.link";

pub const GET_USER_RESPONSE: &str = r#"{
    "kind": "identitytoolkit#GetAccountInfoResponse",
    "users": [
        {
            "localId": "testuser",
            "email": "testuser@example.com",
            "phoneNumber": "+1234567890",
            "emailVerified": true,
            "displayName": "Test User",
            "providerUserInfo": [
                {
                    "providerId": "password",
                    "displayName": "Test User",
                    "photoUrl": "http://www.example.com/testuser/photo.png",
                    "federatedId": "testuser@example.com",
                    "email": "testuser@example.com",
                    "rawId": "testuid"
                },
                {
                    "providerId": "phone",
                    "phoneNumber": "+1234567890",
                    "rawId": "testuid"
                }
            ],
            "photoUrl": "http://www.example.com/testuser/photo.png",
            "passwordHash": "passwordhash",
            "salt": "salt===",
            "validSince": "1494364393",
            "disabled": false,
            "createdAt": "1234567890000",
            "lastLoginAt": "1233211232000",
            "customAttributes": "{\"admin\": true, \"package\": \"gold\"}",
            "tenantId": "testTenant"
        }
    ]
}"#;

pub const ACTION_LINK_RESPONSE: &str = r#"{"oobLink": "https://test.link"}"#;

pub const OIDC_CONFIG_RESPONSE: &str = r#"{
    "name": "projects/mock-project-id/oauthIdpConfigs/oidc.provider",
    "clientId": "CLIENT_ID",
    "issuer": "http://oidc.com/issuer",
    "displayName": "oidcProviderName",
    "enabled": true
}"#;

pub const SAML_CONFIG_RESPONSE: &str = r#"{
    "name": "projects/mock-project-id/inboundSamlConfigs/saml.provider",
    "idpConfig": {
        "idpEntityId": "IDP_ENTITY_ID",
        "ssoUrl": "https://example.com/login",
        "signRequest": true,
        "idpCertificates": [
            {"x509Certificate": "CERT1"},
            {"x509Certificate": "CERT2"}
        ]
    },
    "spConfig": {
        "spEntityId": "RP_ENTITY_ID",
        "callbackUri": "https://projectId.firebaseapp.com/__/auth/handler"
    },
    "displayName": "samlProviderName",
    "enabled": true
}"#;

/// A tenant-scoped client talking to `server` only, whatever the proxy settings.
pub fn tenant_client(server: &EchoServer) -> AuthClient {
    let http = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("http client");

    AuthClient::new(ClientConfiguration {
        project_id: String::from(PROJECT_ID),
        endpoint: Some(server.base_url().to_string()),
        http_client: Some(http),
    })
    .and_then(|client| client.auth_for_tenant(TENANT_ID))
    .expect("tenant client")
}

pub fn tenant_path(resource: &str) -> String {
    format!("/projects/{}/tenants/{}{}", PROJECT_ID, TENANT_ID, resource)
}

pub fn list_users_response() -> Vec<u8> {
    load_fixture(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/list_users.json"))
        .expect("list_users.json")
}

/// Three copies of `config` on a single, final page.
pub fn config_listing(collection: &str, config: &str) -> String {
    format!(
        r#"{{"{}": [{}, {}, {}], "nextPageToken": ""}}"#,
        collection, config, config, config
    )
}

pub fn test_user() -> UserRecord {
    let mut claims = Map::new();
    claims.insert(String::from("admin"), json!(true));
    claims.insert(String::from("package"), json!("gold"));

    UserRecord {
        user_info: UserInfo {
            uid: String::from("testuser"),
            display_name: String::from("Test User"),
            email: String::from("testuser@example.com"),
            phone_number: String::from("+1234567890"),
            photo_url: String::from("http://www.example.com/testuser/photo.png"),
            provider_id: String::from("firebase"),
        },
        custom_claims: Some(claims),
        disabled: false,
        email_verified: true,
        provider_user_info: vec![
            UserInfo {
                uid: String::from("testuid"),
                display_name: String::from("Test User"),
                email: String::from("testuser@example.com"),
                photo_url: String::from("http://www.example.com/testuser/photo.png"),
                provider_id: String::from("password"),
                ..UserInfo::default()
            },
            UserInfo {
                uid: String::from("testuid"),
                phone_number: String::from("+1234567890"),
                provider_id: String::from("phone"),
                ..UserInfo::default()
            },
        ],
        tokens_valid_after_millis: 1_494_364_393_000,
        metadata: UserMetadata {
            creation_timestamp: 1_234_567_890_000,
            last_log_in_timestamp: 1_233_211_232_000,
        },
        tenant_id: String::from("testTenant"),
    }
}

pub fn listed_users() -> Vec<ExportedUserRecord> {
    (1..=3)
        .map(|n| ExportedUserRecord {
            user_record: test_user(),
            password_hash: format!("passwordhash{}", n),
            password_salt: format!("salt{}", n),
        })
        .collect()
}

pub fn oidc_provider_config() -> OidcProviderConfig {
    OidcProviderConfig {
        id: String::from("oidc.provider"),
        display_name: String::from("oidcProviderName"),
        enabled: true,
        client_id: String::from("CLIENT_ID"),
        issuer: String::from("http://oidc.com/issuer"),
    }
}

pub fn saml_provider_config() -> SamlProviderConfig {
    SamlProviderConfig {
        id: String::from("saml.provider"),
        display_name: String::from("samlProviderName"),
        enabled: true,
        idp_entity_id: String::from("IDP_ENTITY_ID"),
        sso_url: String::from("https://example.com/login"),
        request_signing_enabled: true,
        x509_certificates: vec![String::from("CERT1"), String::from("CERT2")],
        rp_entity_id: String::from("RP_ENTITY_ID"),
        callback_url: String::from("https://projectId.firebaseapp.com/__/auth/handler"),
    }
}

pub fn action_code_settings() -> ActionCodeSettings {
    ActionCodeSettings {
        url: String::from("https://example.dynamic.link"),
        handle_code_in_app: false,
        dynamic_link_domain: Some(String::from("custom.page.link")),
        ios_bundle_id: Some(String::from("com.example.ios")),
        android: Some(AndroidSettings {
            package_name: String::from("com.example.android"),
            minimum_version: Some(String::from("6")),
            install_app: true,
        }),
    }
}

/// The request fields `action_code_settings()` flattens into.
pub fn action_code_settings_fields() -> Map<String, Value> {
    match json!({
        "continueUrl": "https://example.dynamic.link",
        "canHandleCodeInApp": false,
        "dynamicLinkDomain": "custom.page.link",
        "iOSBundleId": "com.example.ios",
        "androidPackageName": "com.example.android",
        "androidInstallApp": true,
        "androidMinimumVersion": "6"
    }) {
        Value::Object(fields) => fields,
        _ => unreachable!(),
    }
}
