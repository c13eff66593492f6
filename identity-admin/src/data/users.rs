use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderUserInfoResponse {
    pub provider_id: String,
    pub display_name: String,
    pub photo_url: String,
    pub email: String,
    pub phone_number: String,
    pub raw_id: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserResponse {
    pub local_id: String,
    pub display_name: String,
    pub email: String,
    pub phone_number: String,
    pub photo_url: String,
    pub email_verified: bool,
    pub disabled: bool,
    pub provider_user_info: Vec<ProviderUserInfoResponse>,
    pub password_hash: String,
    #[serde(rename = "salt")]
    pub password_salt: String,
    /// Seconds since the epoch, as a decimal string.
    pub valid_since: String,
    /// Milliseconds since the epoch, as a decimal string.
    pub created_at: String,
    pub last_login_at: String,
    pub custom_attributes: String,
    pub tenant_id: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct LookupResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub next_page_token: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdResponse {
    pub local_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookieResponse {
    pub session_cookie: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OobLinkResponse {
    pub oob_link: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ImportErrorResponse {
    pub index: usize,
    pub message: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ImportUsersResponse {
    pub error: Vec<ImportErrorResponse>,
}
