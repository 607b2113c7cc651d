use std::time::Duration;

use reqwest::{Client, redirect};

use crate::args::DEFAULT_USER_AGENT;

const MAX_REDIRECTS: usize = 10;

/// Builds the client shared by every case of an invocation.
///
/// The per-request timeout is applied on each request; here it only bounds
/// connection establishment.
///
/// # Errors
///
/// Returns an error when the TLS backend cannot be initialized.
pub fn build_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .redirect(redirect::Policy::limited(MAX_REDIRECTS));
    if !request_timeout.is_zero() {
        builder = builder.connect_timeout(request_timeout);
    }
    builder.build()
}
