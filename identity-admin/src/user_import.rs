use crate::{
    client::AuthClient,
    data::users::ImportUsersResponse,
    error::Error,
    user_mgt::{serialize_custom_claims, validate_email, validate_phone_number, validate_uid},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Map, Value};

const MAX_IMPORT_USERS: usize = 1000;

/// A user to import, with optional password material.
#[derive(Debug, Clone, Default)]
pub struct UserToImport {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: Option<bool>,
    pub disabled: Option<bool>,
    pub password_hash: Option<Vec<u8>>,
    pub password_salt: Option<Vec<u8>>,
    pub custom_claims: Option<Map<String, Value>>,
}

impl UserToImport {
    pub fn with_uid<S: Into<String>>(uid: S) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }

    fn to_request(&self) -> Result<Value, Error> {
        validate_uid(&self.uid)?;
        let mut user = Map::new();
        user.insert(String::from("localId"), json!(self.uid));

        if let Some(email) = &self.email {
            validate_email(email)?;
            user.insert(String::from("email"), json!(email));
        }
        if let Some(display_name) = &self.display_name {
            user.insert(String::from("displayName"), json!(display_name));
        }
        if let Some(phone_number) = &self.phone_number {
            validate_phone_number(phone_number)?;
            user.insert(String::from("phoneNumber"), json!(phone_number));
        }
        if let Some(photo_url) = &self.photo_url {
            user.insert(String::from("photoUrl"), json!(photo_url));
        }
        if let Some(email_verified) = self.email_verified {
            user.insert(String::from("emailVerified"), json!(email_verified));
        }
        if let Some(disabled) = self.disabled {
            user.insert(String::from("disabled"), json!(disabled));
        }
        if let Some(hash) = &self.password_hash {
            user.insert(String::from("passwordHash"), json!(URL_SAFE_NO_PAD.encode(hash)));
        }
        if let Some(salt) = &self.password_salt {
            user.insert(String::from("salt"), json!(URL_SAFE_NO_PAD.encode(salt)));
        }
        if let Some(claims) = &self.custom_claims {
            user.insert(
                String::from("customAttributes"),
                json!(serialize_custom_claims(claims)?),
            );
        }

        Ok(Value::Object(user))
    }
}

/// The password hashing scheme of imported users. Key material is sent as
/// given, so callers encode it the way the backend expects.
#[derive(Debug, Clone, Default)]
pub struct HashConfig {
    pub algorithm: String,
    pub signer_key: Option<String>,
    pub salt_separator: Option<String>,
    pub rounds: Option<u32>,
    pub memory_cost: Option<u32>,
}

impl HashConfig {
    fn insert_into(&self, request: &mut Map<String, Value>) -> Result<(), Error> {
        if self.algorithm.is_empty() {
            return Err(Error::invalid("hash algorithm must be a non-empty string"));
        }

        request.insert(String::from("hashAlgorithm"), json!(self.algorithm));
        if let Some(signer_key) = &self.signer_key {
            request.insert(String::from("signerKey"), json!(signer_key));
        }
        if let Some(salt_separator) = &self.salt_separator {
            request.insert(String::from("saltSeparator"), json!(salt_separator));
        }
        if let Some(rounds) = self.rounds {
            request.insert(String::from("rounds"), json!(rounds));
        }
        if let Some(memory_cost) = self.memory_cost {
            request.insert(String::from("memoryCost"), json!(memory_cost));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    /// Position of the failed user in the imported slice.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserImportResult {
    pub success_count: usize,
    pub failure_count: usize,
    pub errors: Vec<ImportError>,
}

impl AuthClient {
    /// Imports up to 1000 users in one request.
    ///
    /// # Errors
    /// Fails when `users` is empty or too large, when a user is invalid, or when
    /// a user carries a password hash but no `hash` config was given.
    pub fn import_users(
        &self,
        users: &[UserToImport],
        hash: Option<&HashConfig>,
    ) -> Result<UserImportResult, Error> {
        if users.is_empty() || users.len() > MAX_IMPORT_USERS {
            return Err(Error::invalid(
                "users list must not be empty or contain more than 1000 users",
            ));
        }

        let mut request = Map::new();
        match hash {
            Some(hash) => hash.insert_into(&mut request)?,
            None if users.iter().any(|user| user.password_hash.is_some()) => {
                return Err(Error::invalid(
                    "hash config is required when importing users with passwords",
                ));
            }
            None => {}
        }
        request.insert(
            String::from("users"),
            Value::Array(
                users
                    .iter()
                    .map(UserToImport::to_request)
                    .collect::<Result<_, _>>()?,
            ),
        );

        let request = self
            .http()
            .post(self.user_management_url("/accounts:batchCreate"))
            .json(&request);
        let response: ImportUsersResponse = self.send(request)?;

        let errors: Vec<ImportError> = response
            .error
            .into_iter()
            .map(|error| ImportError {
                index: error.index,
                reason: error.message,
            })
            .collect();

        Ok(UserImportResult {
            success_count: users.len().saturating_sub(errors.len()),
            failure_count: errors.len(),
            errors,
        })
    }
}
