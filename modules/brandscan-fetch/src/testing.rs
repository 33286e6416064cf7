//! Scripted fetcher for tests. Routes are matched by URL prefix in
//! insertion order; unmatched URLs get a 404 with an empty body.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{FetchError, FetchOptions, FetchResult, Fetcher, Result};

#[derive(Clone)]
enum Outcome {
    Response { status: u16, body: String },
    Failure(String),
}

#[derive(Default)]
pub struct StaticFetcher {
    routes: Vec<(String, Outcome)>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `status` and `body` for any URL starting with `prefix`.
    pub fn ok(mut self, prefix: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            prefix.to_string(),
            Outcome::Response {
                status,
                body: body.to_string(),
            },
        ));
        self
    }

    /// Fail at the transport level for any URL starting with `prefix`.
    pub fn err(mut self, prefix: &str, reason: &str) -> Self {
        self.routes
            .push((prefix.to_string(), Outcome::Failure(reason.to_string())));
        self
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str, opts: &FetchOptions) -> Result<FetchResult> {
        for (prefix, outcome) in &self.routes {
            if url.starts_with(prefix.as_str()) {
                return match outcome {
                    Outcome::Response { status, body } => Ok(FetchResult {
                        status: *status,
                        headers: HashMap::new(),
                        body: match opts.method {
                            crate::Method::Head => String::new(),
                            crate::Method::Get => body.clone(),
                        },
                        final_url: url.to_string(),
                    }),
                    Outcome::Failure(reason) => Err(FetchError::Transport(reason.clone())),
                };
            }
        }

        Ok(FetchResult {
            status: 404,
            headers: HashMap::new(),
            body: String::new(),
            final_url: url.to_string(),
        })
    }
}
