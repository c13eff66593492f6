use crate::{
    client::AuthClient,
    data::users::{
        ListUsersResponse, LocalIdResponse, LookupResponse, SessionCookieResponse, UserResponse,
    },
    error::Error,
    iterator::{Page, PageIterator},
};
use serde::de::IgnoredAny;
use serde_json::{json, Map, Value};
use std::time::Duration;

const MAX_UID_LENGTH: usize = 128;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_CLAIMS_PAYLOAD_SIZE: usize = 1000;
const MAX_LIST_USERS_RESULTS: u32 = 1000;
const DEFAULT_PROVIDER_ID: &str = "firebase";
/// The backend returns this in place of hashes the caller may not read.
const REDACTED_PASSWORD_HASH: &str = "UkVEQUNURUQ=";
const MIN_SESSION_COOKIE_DURATION: Duration = Duration::from_secs(5 * 60);
const MAX_SESSION_COOKIE_DURATION: Duration = Duration::from_secs(14 * 24 * 60 * 60);

const RESERVED_CLAIMS: &[&str] = &[
    "acr", "amr", "at_hash", "aud", "auth_time", "azp", "cnf", "c_hash", "exp", "firebase",
    "iat", "iss", "jti", "nbf", "nonce", "sub",
];

/// Profile attributes shared by a user and each of its linked providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub phone_number: String,
    pub photo_url: String,
    pub provider_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMetadata {
    /// Milliseconds since the epoch.
    pub creation_timestamp: i64,
    /// Milliseconds since the epoch, zero when the user never signed in.
    pub last_log_in_timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    pub user_info: UserInfo,
    pub custom_claims: Option<Map<String, Value>>,
    pub disabled: bool,
    pub email_verified: bool,
    pub provider_user_info: Vec<UserInfo>,
    /// Tokens issued before this instant (milliseconds) are revoked.
    pub tokens_valid_after_millis: i64,
    pub metadata: UserMetadata,
    pub tenant_id: String,
}

/// A user record as returned by a listing, including password material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportedUserRecord {
    pub user_record: UserRecord,
    pub password_hash: String,
    pub password_salt: String,
}

/// Attributes of a new user. Unset fields are left out of the request.
#[derive(Debug, Clone, Default)]
pub struct UserToCreate {
    pub uid: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub password: Option<String>,
    pub email_verified: Option<bool>,
    pub disabled: Option<bool>,
}

impl UserToCreate {
    pub(crate) fn to_request(&self) -> Result<Map<String, Value>, Error> {
        let mut request = Map::new();

        if let Some(uid) = &self.uid {
            validate_uid(uid)?;
            request.insert(String::from("localId"), json!(uid));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
            request.insert(String::from("email"), json!(email));
        }
        if let Some(phone_number) = &self.phone_number {
            validate_phone_number(phone_number)?;
            request.insert(String::from("phoneNumber"), json!(phone_number));
        }
        if let Some(display_name) = &self.display_name {
            validate_non_empty("display name", display_name)?;
            request.insert(String::from("displayName"), json!(display_name));
        }
        if let Some(photo_url) = &self.photo_url {
            validate_non_empty("photo url", photo_url)?;
            request.insert(String::from("photoUrl"), json!(photo_url));
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
            request.insert(String::from("password"), json!(password));
        }
        if let Some(email_verified) = self.email_verified {
            request.insert(String::from("emailVerified"), json!(email_verified));
        }
        if let Some(disabled) = self.disabled {
            request.insert(String::from("disabled"), json!(disabled));
        }

        Ok(request)
    }
}

/// Changes to an existing user. Unset fields are left untouched.
///
/// An empty display name or photo URL deletes that attribute, and an empty
/// phone number unlinks the phone provider.
#[derive(Debug, Clone, Default)]
pub struct UserToUpdate {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub password: Option<String>,
    pub email_verified: Option<bool>,
    pub disabled: Option<bool>,
    pub custom_claims: Option<Map<String, Value>>,
}

impl UserToUpdate {
    pub(crate) fn to_request(&self) -> Result<Map<String, Value>, Error> {
        let mut request = Map::new();
        let mut delete_attributes = Vec::new();

        match self.display_name.as_deref() {
            Some("") => delete_attributes.push("DISPLAY_NAME"),
            Some(display_name) => {
                request.insert(String::from("displayName"), json!(display_name));
            }
            None => {}
        }
        match self.photo_url.as_deref() {
            Some("") => delete_attributes.push("PHOTO_URL"),
            Some(photo_url) => {
                request.insert(String::from("photoUrl"), json!(photo_url));
            }
            None => {}
        }
        if !delete_attributes.is_empty() {
            request.insert(String::from("deleteAttribute"), json!(delete_attributes));
        }

        match self.phone_number.as_deref() {
            Some("") => {
                request.insert(String::from("deleteProvider"), json!(["phone"]));
            }
            Some(phone_number) => {
                validate_phone_number(phone_number)?;
                request.insert(String::from("phoneNumber"), json!(phone_number));
            }
            None => {}
        }

        if let Some(email) = &self.email {
            validate_email(email)?;
            request.insert(String::from("email"), json!(email));
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
            request.insert(String::from("password"), json!(password));
        }
        if let Some(email_verified) = self.email_verified {
            request.insert(String::from("emailVerified"), json!(email_verified));
        }
        if let Some(disabled) = self.disabled {
            request.insert(String::from("disabled"), json!(disabled));
        }
        if let Some(claims) = &self.custom_claims {
            request.insert(
                String::from("customAttributes"),
                json!(serialize_custom_claims(claims)?),
            );
        }

        if request.is_empty() {
            return Err(Error::invalid("update parameters must not be empty"));
        }

        Ok(request)
    }
}

impl AuthClient {
    /// Looks a user up by uid.
    ///
    /// # Errors
    /// `Error::UserNotFound` when no user has this uid.
    pub fn get_user(&self, uid: &str) -> Result<UserRecord, Error> {
        validate_uid(uid)?;
        self.lookup_user(json!({ "localId": [uid] }))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<UserRecord, Error> {
        validate_email(email)?;
        self.lookup_user(json!({ "email": [email] }))
    }

    pub fn get_user_by_phone_number(&self, phone_number: &str) -> Result<UserRecord, Error> {
        validate_phone_number(phone_number)?;
        self.lookup_user(json!({ "phoneNumber": [phone_number] }))
    }

    fn lookup_user(&self, query: Value) -> Result<UserRecord, Error> {
        let request = self
            .http()
            .post(self.user_management_url("/accounts:lookup"))
            .json(&query);
        let response: LookupResponse = self.send(request)?;

        match response.users.into_iter().next() {
            Some(user) => Ok(to_exported_user_record(user)?.user_record),
            None => Err(Error::UserNotFound),
        }
    }

    /// Lists every user, starting at `page_token` (empty for the first page).
    pub fn users(&self, page_token: &str) -> PageIterator<'_, ExportedUserRecord> {
        PageIterator::new(page_token, move |token| self.list_users_page(token))
    }

    fn list_users_page(&self, page_token: &str) -> Result<Page<ExportedUserRecord>, Error> {
        let mut query = vec![("maxResults", MAX_LIST_USERS_RESULTS.to_string())];
        if !page_token.is_empty() {
            query.push(("nextPageToken", page_token.to_string()));
        }

        let request = self
            .http()
            .get(self.user_management_url("/accounts:batchGet"))
            .query(&query);
        let response: ListUsersResponse = self.send(request)?;

        Ok(Page {
            items: response
                .users
                .into_iter()
                .map(to_exported_user_record)
                .collect::<Result<_, _>>()?,
            next_page_token: response.next_page_token,
        })
    }

    /// Creates a user and returns its uid.
    pub fn create_user(&self, user: &UserToCreate) -> Result<String, Error> {
        let request = self
            .http()
            .post(self.user_management_url("/accounts"))
            .json(&user.to_request()?);
        let response: LocalIdResponse = self.send(request)?;

        if response.local_id.is_empty() {
            return Err(Error::UnexpectedResponse(String::from(
                "failed to create new user",
            )));
        }

        Ok(response.local_id)
    }

    pub fn update_user(&self, uid: &str, update: &UserToUpdate) -> Result<(), Error> {
        validate_uid(uid)?;
        let mut request = update.to_request()?;
        request.insert(String::from("localId"), json!(uid));

        self.post_account_update(request)
    }

    /// Revokes every refresh token of the user issued before now.
    pub fn revoke_refresh_tokens(&self, uid: &str) -> Result<(), Error> {
        validate_uid(uid)?;
        let mut request = Map::new();
        request.insert(String::from("localId"), json!(uid));
        request.insert(
            String::from("validSince"),
            json!(chrono::Utc::now().timestamp().to_string()),
        );

        self.post_account_update(request)
    }

    /// Replaces the custom claims of the user. `None` clears them.
    pub fn set_custom_user_claims(
        &self,
        uid: &str,
        claims: Option<&Map<String, Value>>,
    ) -> Result<(), Error> {
        validate_uid(uid)?;
        let empty = Map::new();
        let mut request = Map::new();
        request.insert(String::from("localId"), json!(uid));
        request.insert(
            String::from("customAttributes"),
            json!(serialize_custom_claims(claims.unwrap_or(&empty))?),
        );

        self.post_account_update(request)
    }

    fn post_account_update(&self, request: Map<String, Value>) -> Result<(), Error> {
        let request = self
            .http()
            .post(self.user_management_url("/accounts:update"))
            .json(&request);
        let _: IgnoredAny = self.send(request)?;

        Ok(())
    }

    pub fn delete_user(&self, uid: &str) -> Result<(), Error> {
        validate_uid(uid)?;
        let request = self
            .http()
            .post(self.user_management_url("/accounts:delete"))
            .json(&json!({ "localId": uid }));
        let _: IgnoredAny = self.send(request)?;

        Ok(())
    }

    /// Exchanges an ID token for a session cookie valid for `expires_in`.
    ///
    /// # Errors
    /// Fails when the ID token is empty or `expires_in` lies outside
    /// 5 minutes to 14 days.
    pub fn session_cookie(&self, id_token: &str, expires_in: Duration) -> Result<String, Error> {
        validate_non_empty("id token", id_token)?;
        if expires_in < MIN_SESSION_COOKIE_DURATION || expires_in > MAX_SESSION_COOKIE_DURATION {
            return Err(Error::invalid(
                "expiry duration must be between 5 minutes and 14 days",
            ));
        }

        let request = self
            .http()
            .post(self.user_management_url(":createSessionCookie"))
            .json(&json!({
                "idToken": id_token,
                "validDuration": expires_in.as_secs()
            }));
        let response: SessionCookieResponse = self.send(request)?;

        if response.session_cookie.is_empty() {
            return Err(Error::UnexpectedResponse(String::from(
                "failed to create session cookie",
            )));
        }

        Ok(response.session_cookie)
    }
}

pub(crate) fn to_exported_user_record(user: UserResponse) -> Result<ExportedUserRecord, Error> {
    let custom_claims = if user.custom_attributes.is_empty() {
        None
    } else {
        let claims: Map<String, Value> = serde_json::from_str(&user.custom_attributes)?;
        Some(claims).filter(|claims| !claims.is_empty())
    };

    let tokens_valid_after_millis = parse_timestamp("validSince", &user.valid_since)?
        .checked_mul(1000)
        .ok_or_else(|| {
            Error::UnexpectedResponse(format!("validSince is out of range: {:?}", user.valid_since))
        })?;
    let metadata = UserMetadata {
        creation_timestamp: parse_timestamp("createdAt", &user.created_at)?,
        last_log_in_timestamp: parse_timestamp("lastLoginAt", &user.last_login_at)?,
    };

    let provider_user_info = user
        .provider_user_info
        .into_iter()
        .map(|info| UserInfo {
            uid: info.raw_id,
            display_name: info.display_name,
            email: info.email,
            phone_number: info.phone_number,
            photo_url: info.photo_url,
            provider_id: info.provider_id,
        })
        .collect();

    let password_hash = if user.password_hash == REDACTED_PASSWORD_HASH {
        String::new()
    } else {
        user.password_hash
    };

    Ok(ExportedUserRecord {
        user_record: UserRecord {
            user_info: UserInfo {
                uid: user.local_id,
                display_name: user.display_name,
                email: user.email,
                phone_number: user.phone_number,
                photo_url: user.photo_url,
                provider_id: String::from(DEFAULT_PROVIDER_ID),
            },
            custom_claims,
            disabled: user.disabled,
            email_verified: user.email_verified,
            provider_user_info,
            tokens_valid_after_millis,
            metadata,
            tenant_id: user.tenant_id,
        },
        password_hash,
        password_salt: user.password_salt,
    })
}

fn parse_timestamp(field: &str, value: &str) -> Result<i64, Error> {
    if value.is_empty() {
        return Ok(0);
    }

    value
        .parse()
        .map_err(|_| Error::UnexpectedResponse(format!("{} is not a timestamp: {:?}", field, value)))
}

pub(crate) fn serialize_custom_claims(claims: &Map<String, Value>) -> Result<String, Error> {
    if let Some(reserved) = claims
        .keys()
        .find(|key| RESERVED_CLAIMS.contains(&key.as_str()))
    {
        return Err(Error::invalid(format!(
            "claim {:?} is reserved and must not be set",
            reserved
        )));
    }

    let serialized = serde_json::to_string(claims)?;
    if serialized.len() > MAX_CLAIMS_PAYLOAD_SIZE {
        return Err(Error::invalid(format!(
            "serialized custom claims must not exceed {} characters",
            MAX_CLAIMS_PAYLOAD_SIZE
        )));
    }

    Ok(serialized)
}

pub(crate) fn validate_uid(uid: &str) -> Result<(), Error> {
    if uid.is_empty() || uid.chars().count() > MAX_UID_LENGTH {
        return Err(Error::invalid(
            "uid must be a non-empty string with no more than 128 characters",
        ));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), Error> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };

    if !well_formed {
        return Err(Error::invalid(format!("malformed email string: {:?}", email)));
    }
    Ok(())
}

pub(crate) fn validate_phone_number(phone_number: &str) -> Result<(), Error> {
    if !phone_number.starts_with('+') || !phone_number.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::invalid(
            "phone number must be a valid, E.164 compliant identifier",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), Error> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::invalid("password must be at least 6 characters long"));
    }
    Ok(())
}

pub(crate) fn validate_non_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::invalid(format!("{} must be a non-empty string", field)));
    }
    Ok(())
}
