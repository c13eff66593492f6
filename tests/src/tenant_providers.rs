use crate::fixtures::{self, tenant_client, tenant_path};
use echoback::{echo_test, verify_iterator_contract, EchoServer, Mismatches, PageExpectation};
use identity_admin::{
    Error, OidcProviderConfigToCreate, OidcProviderConfigToUpdate, SamlProviderConfigToCreate,
    SamlProviderConfigToUpdate,
};
use serde_json::json;

fn oidc_listing() -> String {
    fixtures::config_listing("oauthIdpConfigs", fixtures::OIDC_CONFIG_RESPONSE)
}

fn saml_listing() -> String {
    fixtures::config_listing("inboundSamlConfigs", fixtures::SAML_CONFIG_RESPONSE)
}

fn saml_config_body() -> serde_json::Value {
    let config = fixtures::saml_provider_config();
    json!({
        "displayName": config.display_name,
        "enabled": config.enabled,
        "idpConfig": {
            "idpEntityId": config.idp_entity_id,
            "ssoUrl": config.sso_url,
            "signRequest": config.request_signing_enabled,
            "idpCertificates": [
                {"x509Certificate": "CERT1"},
                {"x509Certificate": "CERT2"}
            ]
        },
        "spConfig": {
            "spEntityId": config.rp_entity_id,
            "callbackUri": config.callback_url
        }
    })
}

#[echo_test(fixtures::OIDC_CONFIG_RESPONSE)]
fn gets_an_oidc_provider_config(server: &EchoServer) {
    let oidc = tenant_client(server)
        .oidc_provider_config("oidc.provider")
        .expect("oidc_provider_config");
    assert_eq!(oidc, fixtures::oidc_provider_config());

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    mismatches.check_method("oidc_provider_config", &request, "GET");
    mismatches.check_path(
        "oidc_provider_config",
        &request,
        &tenant_path("/oauthIdpConfigs/oidc.provider"),
    );
    mismatches.assert_none();
}

#[echo_test(fixtures::OIDC_CONFIG_RESPONSE)]
fn creates_an_oidc_provider_config(server: &EchoServer) {
    let want = fixtures::oidc_provider_config();
    let config = OidcProviderConfigToCreate {
        id: want.id.clone(),
        display_name: Some(want.display_name.clone()),
        enabled: Some(want.enabled),
        client_id: want.client_id.clone(),
        issuer: want.issuer.clone(),
    };

    let oidc = tenant_client(server)
        .create_oidc_provider_config(&config)
        .expect("create_oidc_provider_config");
    assert_eq!(oidc, want);

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    let context = "create_oidc_provider_config";
    mismatches.check_method(context, &request, "POST");
    mismatches.check_path(context, &request, &tenant_path("/oauthIdpConfigs"));
    mismatches.check_query(context, &request, "oauthIdpConfigId=oidc.provider");
    mismatches.check_json_body(
        context,
        &request,
        &json!({
            "clientId": want.client_id,
            "displayName": want.display_name,
            "enabled": want.enabled,
            "issuer": want.issuer
        }),
    );
    mismatches.assert_none();
}

#[echo_test(fixtures::OIDC_CONFIG_RESPONSE)]
fn updates_an_oidc_provider_config(server: &EchoServer) {
    let want = fixtures::oidc_provider_config();
    let update = OidcProviderConfigToUpdate {
        display_name: Some(want.display_name.clone()),
        enabled: Some(want.enabled),
        client_id: Some(want.client_id.clone()),
        issuer: Some(want.issuer.clone()),
    };

    let oidc = tenant_client(server)
        .update_oidc_provider_config("oidc.provider", &update)
        .expect("update_oidc_provider_config");
    assert_eq!(oidc, want);

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    let context = "update_oidc_provider_config";
    mismatches.check_method(context, &request, "PATCH");
    mismatches.check_path(
        context,
        &request,
        &tenant_path("/oauthIdpConfigs/oidc.provider"),
    );
    mismatches.check_eq(
        context,
        &request.query_param("updateMask"),
        &Some(String::from("clientId,displayName,enabled,issuer")),
    );
    mismatches.check_json_body(
        context,
        &request,
        &json!({
            "clientId": want.client_id,
            "displayName": want.display_name,
            "enabled": want.enabled,
            "issuer": want.issuer
        }),
    );
    mismatches.assert_none();
}

#[echo_test(fixtures::OIDC_CONFIG_RESPONSE)]
fn clearing_the_oidc_display_name_sends_null(server: &EchoServer) {
    let update = OidcProviderConfigToUpdate {
        display_name: Some(String::new()),
        ..OidcProviderConfigToUpdate::default()
    };

    tenant_client(server)
        .update_oidc_provider_config("oidc.provider", &update)
        .expect("update_oidc_provider_config");

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    mismatches.check_eq(
        "updateMask",
        &request.query_param("updateMask"),
        &Some(String::from("displayName")),
    );
    mismatches.check_json_body("body", &request, &json!({ "displayName": null }));
    mismatches.assert_none();
}

#[echo_test("{}")]
fn deletes_an_oidc_provider_config(server: &EchoServer) {
    tenant_client(server)
        .delete_oidc_provider_config("oidc.provider")
        .expect("delete_oidc_provider_config");

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    mismatches.check_method("delete_oidc_provider_config", &request, "DELETE");
    mismatches.check_path(
        "delete_oidc_provider_config",
        &request,
        &tenant_path("/oauthIdpConfigs/oidc.provider"),
    );
    mismatches.assert_none();
}

#[echo_test("{}")]
fn malformed_provider_ids_never_reach_the_backend(server: &EchoServer) {
    let client = tenant_client(server);

    assert!(matches!(
        client.oidc_provider_config("saml.provider"),
        Err(Error::InvalidArgument(_))
    ));
    assert!(client.delete_oidc_provider_config("").is_err());
    assert!(client.saml_provider_config("oidc.provider").is_err());
    assert!(client.delete_saml_provider_config("saml.").is_err());
    assert!(client.delete_oidc_provider_config("oidc.a/b").is_err());
    assert!(client.saml_provider_config("saml.provider?x=1").is_err());
    assert_eq!(server.request_count(), 0);
}

#[echo_test(oidc_listing())]
fn lists_oidc_provider_configs(server: &EchoServer) {
    let client = tenant_client(server);
    let want = vec![fixtures::oidc_provider_config(); 3];
    let path = tenant_path("/oauthIdpConfigs");

    let mut mismatches = verify_iterator_contract(
        "oidc_provider_configs(\"\")",
        server,
        client.oidc_provider_configs(""),
        &want,
        PageExpectation {
            path: &path,
            query: "pageSize=100",
        },
    );
    mismatches.extend(verify_iterator_contract(
        "oidc_provider_configs(\"pageToken\")",
        server,
        client.oidc_provider_configs("pageToken"),
        &want,
        PageExpectation {
            path: &path,
            query: "pageSize=100&pageToken=pageToken",
        },
    ));
    mismatches.assert_none();
}

#[echo_test(fixtures::SAML_CONFIG_RESPONSE)]
fn gets_a_saml_provider_config(server: &EchoServer) {
    let saml = tenant_client(server)
        .saml_provider_config("saml.provider")
        .expect("saml_provider_config");
    assert_eq!(saml, fixtures::saml_provider_config());

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    mismatches.check_method("saml_provider_config", &request, "GET");
    mismatches.check_path(
        "saml_provider_config",
        &request,
        &tenant_path("/inboundSamlConfigs/saml.provider"),
    );
    mismatches.assert_none();
}

#[echo_test(fixtures::SAML_CONFIG_RESPONSE)]
fn creates_a_saml_provider_config(server: &EchoServer) {
    let want = fixtures::saml_provider_config();
    let config = SamlProviderConfigToCreate {
        id: want.id.clone(),
        display_name: Some(want.display_name.clone()),
        enabled: Some(want.enabled),
        idp_entity_id: want.idp_entity_id.clone(),
        sso_url: want.sso_url.clone(),
        request_signing_enabled: Some(want.request_signing_enabled),
        x509_certificates: want.x509_certificates.clone(),
        rp_entity_id: want.rp_entity_id.clone(),
        callback_url: want.callback_url.clone(),
    };

    let saml = tenant_client(server)
        .create_saml_provider_config(&config)
        .expect("create_saml_provider_config");
    assert_eq!(saml, want);

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    let context = "create_saml_provider_config";
    mismatches.check_method(context, &request, "POST");
    mismatches.check_path(context, &request, &tenant_path("/inboundSamlConfigs"));
    mismatches.check_query(context, &request, "inboundSamlConfigId=saml.provider");
    mismatches.check_json_body(context, &request, &saml_config_body());
    mismatches.assert_none();
}

#[echo_test(fixtures::SAML_CONFIG_RESPONSE)]
fn updates_a_saml_provider_config(server: &EchoServer) {
    let want = fixtures::saml_provider_config();
    let update = SamlProviderConfigToUpdate {
        display_name: Some(want.display_name.clone()),
        enabled: Some(want.enabled),
        idp_entity_id: Some(want.idp_entity_id.clone()),
        sso_url: Some(want.sso_url.clone()),
        request_signing_enabled: Some(want.request_signing_enabled),
        x509_certificates: Some(want.x509_certificates.clone()),
        rp_entity_id: Some(want.rp_entity_id.clone()),
        callback_url: Some(want.callback_url.clone()),
    };

    let saml = tenant_client(server)
        .update_saml_provider_config("saml.provider", &update)
        .expect("update_saml_provider_config");
    assert_eq!(saml, want);

    let want_mask = [
        "displayName",
        "enabled",
        "idpConfig.idpCertificates",
        "idpConfig.idpEntityId",
        "idpConfig.signRequest",
        "idpConfig.ssoUrl",
        "spConfig.callbackUri",
        "spConfig.spEntityId",
    ]
    .join(",");

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    let context = "update_saml_provider_config";
    mismatches.check_method(context, &request, "PATCH");
    mismatches.check_path(
        context,
        &request,
        &tenant_path("/inboundSamlConfigs/saml.provider"),
    );
    mismatches.check_eq(context, &request.query_param("updateMask"), &Some(want_mask));
    mismatches.check_json_body(context, &request, &saml_config_body());
    mismatches.assert_none();
}

#[echo_test(fixtures::SAML_CONFIG_RESPONSE)]
fn empty_provider_updates_are_rejected(server: &EchoServer) {
    let client = tenant_client(server);

    assert!(client
        .update_oidc_provider_config("oidc.provider", &OidcProviderConfigToUpdate::default())
        .is_err());
    assert!(client
        .update_saml_provider_config("saml.provider", &SamlProviderConfigToUpdate::default())
        .is_err());
    assert_eq!(server.request_count(), 0);
}

#[echo_test("{}")]
fn deletes_a_saml_provider_config(server: &EchoServer) {
    tenant_client(server)
        .delete_saml_provider_config("saml.provider")
        .expect("delete_saml_provider_config");

    let request = server.last_request().expect("captured request");
    let mut mismatches = Mismatches::new();
    mismatches.check_method("delete_saml_provider_config", &request, "DELETE");
    mismatches.check_path(
        "delete_saml_provider_config",
        &request,
        &tenant_path("/inboundSamlConfigs/saml.provider"),
    );
    mismatches.assert_none();
}

#[echo_test(saml_listing())]
fn lists_saml_provider_configs(server: &EchoServer) {
    let client = tenant_client(server);
    let want = vec![fixtures::saml_provider_config(); 3];
    let path = tenant_path("/inboundSamlConfigs");

    let mut mismatches = verify_iterator_contract(
        "saml_provider_configs(\"\")",
        server,
        client.saml_provider_configs(""),
        &want,
        PageExpectation {
            path: &path,
            query: "pageSize=100",
        },
    );
    mismatches.extend(verify_iterator_contract(
        "saml_provider_configs(\"pageToken\")",
        server,
        client.saml_provider_configs("pageToken"),
        &want,
        PageExpectation {
            path: &path,
            query: "pageSize=100&pageToken=pageToken",
        },
    ));
    mismatches.assert_none();
}
