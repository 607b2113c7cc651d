use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::{CaseError, error_chain};
use crate::report::{ReportResult, TestReporter};
use crate::suite::{CONTENT_TYPE, RequestBody, Response, TestCase, schema_errors};

use super::{CaseContext, CaseRunner};

/// Runs cases over HTTP and records every outcome in a reporter.
#[derive(Clone)]
pub struct HttpCaseRunner {
    client: Client,
    reporter: Arc<dyn TestReporter>,
}

impl HttpCaseRunner {
    #[must_use]
    pub const fn new(client: Client, reporter: Arc<dyn TestReporter>) -> Self {
        Self { client, reporter }
    }

    async fn execute(
        &self,
        case: &mut TestCase,
        context: &CaseContext<'_>,
        status: &mut Option<u16>,
    ) -> Result<Value, CaseError> {
        case.resolve_api(context.base_api);
        case.request.render(context.data)?;
        case.expect.render();
        let body = case.request.body()?;

        let method_name = case.request.method.trim().to_ascii_uppercase();
        let method = Method::from_bytes(method_name.as_bytes()).map_err(|_invalid| {
            CaseError::InvalidMethod {
                method: case.request.method.clone(),
            }
        })?;
        let api = case.request.api.clone();
        let url = Url::parse(&api).map_err(|err| CaseError::InvalidUrl {
            url: api.clone(),
            source: err,
        })?;

        let mut builder = self.client.request(method, url);
        if !context.timeout.is_zero() {
            builder = builder.timeout(context.timeout);
        }
        let multipart = matches!(body, RequestBody::Multipart(_));
        for (name, value) in &case.request.header {
            // The multipart builder sets its own Content-Type with the boundary.
            if multipart && name.eq_ignore_ascii_case(CONTENT_TYPE) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Bytes(bytes) => builder.body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form),
        };
        let request = builder
            .build()
            .map_err(|err| CaseError::BuildRequest { source: err })?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| transport_error(&api, context.timeout, &err))?;
        let actual = response.status().as_u16();
        *status = Some(actual);
        let headers = response.headers().clone();
        let bytes = read_body(response).await.map_err(|err| {
            if err.is_timeout() {
                CaseError::Timeout {
                    url: api.clone(),
                    timeout: context.timeout,
                }
            } else {
                CaseError::ReadResponse {
                    url: api.clone(),
                    source: err,
                }
            }
        })?;

        verify_response(&case.expect, actual, &headers, &bytes)?;
        Ok(decode_output(&bytes))
    }
}

#[async_trait]
impl CaseRunner for HttpCaseRunner {
    async fn run_case(
        &self,
        case: &mut TestCase,
        context: CaseContext<'_>,
    ) -> Result<Value, CaseError> {
        let started = Instant::now();
        let mut status = None;
        let outcome = tokio::select! {
            biased;
            () = context.cancel.triggered() => Err(CaseError::Cancelled),
            outcome = self.execute(case, &context, &mut status) => outcome,
        };
        let duration = started.elapsed();
        debug!(
            "Case '{}' {} {} finished in {:?}",
            case.name, case.request.method, case.request.api, duration
        );

        self.reporter.put_record(ReportResult {
            suite: context.suite.to_owned(),
            name: case.name.clone(),
            api: case.request.api.clone(),
            method: case.request.method.clone(),
            duration,
            status,
            error: outcome.as_ref().err().map(ToString::to_string),
        });
        outcome
    }
}

fn transport_error(url: &str, timeout: Duration, err: &reqwest::Error) -> CaseError {
    if err.is_timeout() {
        CaseError::Timeout {
            url: url.to_owned(),
            timeout,
        }
    } else {
        CaseError::Transport {
            url: url.to_owned(),
            message: error_chain(err),
        }
    }
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}

fn verify_response(
    expect: &Response,
    status: u16,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), CaseError> {
    if status != expect.status_code {
        return Err(CaseError::StatusMismatch {
            expected: expect.status_code,
            actual: status,
        });
    }

    for (name, expected) in &expect.header {
        let Some(value) = headers.get(name.as_str()) else {
            return Err(CaseError::HeaderMissing { name: name.clone() });
        };
        let actual = String::from_utf8_lossy(value.as_bytes());
        if actual != expected.as_str() {
            return Err(CaseError::HeaderMismatch {
                name: name.clone(),
                expected: expected.clone(),
                actual: actual.into_owned(),
            });
        }
    }

    if expect.schema.trim().is_empty() {
        return Ok(());
    }
    let schema: Value = serde_json::from_str(&expect.schema)
        .map_err(|err| CaseError::SchemaParse { source: err })?;
    let validator = jsonschema::validator_for(&schema).map_err(|err| CaseError::SchemaCompile {
        message: err.to_string(),
    })?;
    let instance: Value =
        serde_json::from_slice(body).map_err(|err| CaseError::ResponseNotJson { source: err })?;
    let errors = schema_errors(&validator, &instance);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CaseError::SchemaMismatch {
            errors: errors.join("; "),
        })
    }
}

/// JSON when the body parses as JSON, the text otherwise, null when empty.
fn decode_output(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_not_json| Value::String(String::from_utf8_lossy(body).into_owned()))
}
