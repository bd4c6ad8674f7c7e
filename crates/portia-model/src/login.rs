//! Login fields derived from `init_requests`
//!
//! A spider logs in before crawling when its `init_requests` list holds a
//! login descriptor. The editor shows four plain fields (enabled flag, URL,
//! user, password); none of them has storage of its own. Reads and writes
//! go to element 0 of the list, which stays the single source of truth.
//! At most one login descriptor is expected.

use crate::entity::Entity;
use crate::error::ModelError;
use crate::spider::SpiderKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// List field holding the pre-crawl requests
pub const INIT_REQUESTS: &str = "init_requests";

/// Descriptor type tag for a login request
pub const LOGIN_TYPE: &str = "login";

const LOGIN_URL_KEY: &str = "loginurl";
const USERNAME_KEY: &str = "username";
const PASSWORD_KEY: &str = "password";
const CREDENTIAL_KEYS: [&str; 3] = [LOGIN_URL_KEY, USERNAME_KEY, PASSWORD_KEY];

/// Typed view of one `init_requests` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitRequest {
    /// Descriptor type, e.g. `"login"`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "loginurl", default, skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl InitRequest {
    /// Empty login descriptor
    #[inline]
    #[must_use]
    pub fn login() -> Self {
        Self {
            kind: LOGIN_TYPE.to_owned(),
            login_url: None,
            username: None,
            password: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_login(&self) -> bool {
        self.kind == LOGIN_TYPE
    }
}

impl Entity<SpiderKind> {
    /// True iff `init_requests` is non-empty
    #[must_use]
    pub fn perform_login(&self) -> bool {
        self.get_list(INIT_REQUESTS)
            .is_some_and(|reqs| !reqs.is_empty())
    }

    /// Enable or disable login
    ///
    /// Enabling replaces the whole list with a single `{"type": "login"}`
    /// descriptor. Disabling blanks the credentials, then empties the list.
    ///
    /// # Errors
    /// Returns `ModelError::NotAList` if `init_requests` was overwritten
    /// with a non-list value
    pub fn set_perform_login(&mut self, enabled: bool) -> Result<(), ModelError> {
        self.edit_list(INIT_REQUESTS, |reqs| {
            if enabled {
                reqs.clear();
                reqs.push(json!({ "type": LOGIN_TYPE }));
            } else {
                if let Some(Value::Object(first)) = reqs.first_mut() {
                    for key in CREDENTIAL_KEYS {
                        first.insert(key.to_owned(), Value::String(String::new()));
                    }
                }
                reqs.clear();
            }
        })
    }

    #[must_use]
    pub fn login_url(&self) -> Option<String> {
        self.login_credential(LOGIN_URL_KEY)
    }

    #[must_use]
    pub fn login_user(&self) -> Option<String> {
        self.login_credential(USERNAME_KEY)
    }

    #[must_use]
    pub fn login_password(&self) -> Option<String> {
        self.login_credential(PASSWORD_KEY)
    }

    /// # Errors
    /// `ModelError::EmptyInitRequests` when login is not enabled
    pub fn set_login_url(&mut self, url: impl Into<String>) -> Result<(), ModelError> {
        self.set_login_credential(LOGIN_URL_KEY, url.into())
    }

    /// # Errors
    /// `ModelError::EmptyInitRequests` when login is not enabled
    pub fn set_login_user(&mut self, user: impl Into<String>) -> Result<(), ModelError> {
        self.set_login_credential(USERNAME_KEY, user.into())
    }

    /// # Errors
    /// `ModelError::EmptyInitRequests` when login is not enabled
    pub fn set_login_password(&mut self, password: impl Into<String>) -> Result<(), ModelError> {
        self.set_login_credential(PASSWORD_KEY, password.into())
    }

    /// Typed view of the first init request, if it parses
    #[must_use]
    pub fn login_request(&self) -> Option<InitRequest> {
        let first = self.get_list(INIT_REQUESTS)?.first()?;
        serde_json::from_value(first.clone()).ok()
    }

    fn login_credential(&self, key: &str) -> Option<String> {
        self.get_list(INIT_REQUESTS)?
            .first()?
            .get(key)?
            .as_str()
            .map(ToOwned::to_owned)
    }

    fn set_login_credential(&mut self, key: &str, value: String) -> Result<(), ModelError> {
        self.edit_list(INIT_REQUESTS, |reqs| match reqs.first_mut() {
            None => Err(ModelError::EmptyInitRequests),
            Some(Value::Object(first)) => {
                first.insert(key.to_owned(), Value::String(value));
                Ok(())
            }
            Some(_) => Err(ModelError::MalformedElement {
                field: INIT_REQUESTS.to_owned(),
                index: 0,
            }),
        })?
    }
}
