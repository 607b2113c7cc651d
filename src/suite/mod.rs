//! Test suite model, loading and request preparation.
mod body;
mod parser;
mod render;
mod schema;
mod types;


pub use body::{CONTENT_TYPE, FORM_URLENCODED, MULTIPART_FORM_DATA, RequestBody};
pub use parser::{load_suite, parse, parse_from_data, parse_test_case_from_data};
pub use render::{CONTEXT_SCOPE, render};
pub use schema::{SUITE_SCHEMA, validate_suite_document};
pub use types::{
    DEFAULT_METHOD, DEFAULT_STATUS_CODE, Prepare, Request, Response, TestCase, TestSuite,
};

pub(crate) use schema::schema_errors;

/// Sample suite printed by `atest sample`.
pub const SAMPLE_SUITE: &str = include_str!("sample.yaml");
