use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Status code expected when a case does not set one.
pub const DEFAULT_STATUS_CODE: u16 = 200;
/// Method used when a request leaves it blank.
pub const DEFAULT_METHOD: &str = "GET";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestSuite {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api: String,
    #[serde(default)]
    pub items: Vec<TestCase>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub request: Request,
    #[serde(default)]
    pub expect: Response,
    #[serde(default, skip_serializing_if = "Prepare::is_empty")]
    pub prepare: Prepare,
}

impl TestCase {
    /// Prefixes a suite-relative API (`/path`) with the suite base API.
    ///
    /// Applying it twice is a no-op: once prefixed, the API no longer starts
    /// with `/` unless the base itself is empty.
    pub fn resolve_api(&mut self, base_api: &str) {
        if self.request.api.starts_with('/') {
            self.request.api = format!("{}{}", base_api, self.request.api);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    pub api: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body_from_file: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub form: BTreeMap<String, String>,
}

impl Request {
    /// Looks up a header value with a case-insensitive name match.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.header
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Replaces a header, dropping any existing entry that differs only in case.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.header.retain(|key, _| !key.eq_ignore_ascii_case(name));
        self.header.insert(name.to_owned(), value);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schema: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header: BTreeMap<String, String>,
}

impl Response {
    /// Fills in defaults for unset expectations.
    pub fn render(&mut self) {
        if self.status_code == 0 {
            self.status_code = DEFAULT_STATUS_CODE;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Prepare {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kubernetes: Vec<String>,
}

impl Prepare {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kubernetes.is_empty()
    }
}
