use crate::{
    client::AuthClient,
    data::users::OobLinkResponse,
    error::Error,
    user_mgt::{validate_email, validate_non_empty},
};
use serde_json::{json, Map, Value};
use url::Url;

/// Settings embedded in an email action link.
#[derive(Debug, Clone, Default)]
pub struct ActionCodeSettings {
    /// Continue URL, must be absolute.
    pub url: String,
    pub handle_code_in_app: bool,
    pub dynamic_link_domain: Option<String>,
    pub ios_bundle_id: Option<String>,
    pub android: Option<AndroidSettings>,
}

#[derive(Debug, Clone, Default)]
pub struct AndroidSettings {
    pub package_name: String,
    pub minimum_version: Option<String>,
    pub install_app: bool,
}

impl ActionCodeSettings {
    fn insert_into(&self, request: &mut Map<String, Value>) -> Result<(), Error> {
        let url = Url::parse(&self.url)
            .map_err(|_| Error::invalid(format!("malformed url string: {:?}", self.url)))?;
        if !url.has_host() {
            return Err(Error::invalid(format!("malformed url string: {:?}", self.url)));
        }

        request.insert(String::from("continueUrl"), json!(self.url));
        request.insert(String::from("canHandleCodeInApp"), json!(self.handle_code_in_app));

        if let Some(domain) = &self.dynamic_link_domain {
            request.insert(String::from("dynamicLinkDomain"), json!(domain));
        }
        if let Some(bundle_id) = &self.ios_bundle_id {
            request.insert(String::from("iOSBundleId"), json!(bundle_id));
        }
        if let Some(android) = &self.android {
            validate_non_empty("Android package name", &android.package_name)?;
            request.insert(String::from("androidPackageName"), json!(android.package_name));
            request.insert(String::from("androidInstallApp"), json!(android.install_app));
            if let Some(minimum_version) = &android.minimum_version {
                request.insert(String::from("androidMinimumVersion"), json!(minimum_version));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkType {
    EmailVerification,
    PasswordReset,
    EmailSignIn,
}

impl LinkType {
    fn request_type(self) -> &'static str {
        match self {
            LinkType::EmailVerification => "VERIFY_EMAIL",
            LinkType::PasswordReset => "PASSWORD_RESET",
            LinkType::EmailSignIn => "EMAIL_SIGNIN",
        }
    }
}

impl AuthClient {
    pub fn email_verification_link(
        &self,
        email: &str,
        settings: Option<&ActionCodeSettings>,
    ) -> Result<String, Error> {
        self.generate_email_action_link(LinkType::EmailVerification, email, settings)
    }

    pub fn password_reset_link(
        &self,
        email: &str,
        settings: Option<&ActionCodeSettings>,
    ) -> Result<String, Error> {
        self.generate_email_action_link(LinkType::PasswordReset, email, settings)
    }

    /// Sign-in links always need settings, the continue URL is where the
    /// sign-in completes.
    pub fn email_sign_in_link(
        &self,
        email: &str,
        settings: &ActionCodeSettings,
    ) -> Result<String, Error> {
        self.generate_email_action_link(LinkType::EmailSignIn, email, Some(settings))
    }

    fn generate_email_action_link(
        &self,
        link_type: LinkType,
        email: &str,
        settings: Option<&ActionCodeSettings>,
    ) -> Result<String, Error> {
        validate_email(email)?;

        let mut request = Map::new();
        request.insert(String::from("requestType"), json!(link_type.request_type()));
        request.insert(String::from("email"), json!(email));
        request.insert(String::from("returnOobLink"), json!(true));
        if let Some(settings) = settings {
            settings.insert_into(&mut request)?;
        }

        let request = self
            .http()
            .post(self.user_management_url("/accounts:sendOobCode"))
            .json(&request);
        let response: OobLinkResponse = self.send(request)?;

        Ok(response.oob_link)
    }
}
