//! HTTP client with rate limiting, timeouts and cookie support

use crate::core::rate_limit::RateLimiter;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use anyhow::Result;
use reqwest::{header, redirect::Policy, Client};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct HttpClient {
    client: Client,
    limiter: RateLimiter,
    default_headers: HashMap<String, String>,
    cookies: Option<String>,
}

impl HttpClient {
    pub fn new(limiter: RateLimiter, timeout: Duration) -> Result<Self> {
        Self::with_auth(limiter, timeout, None, HashMap::new())
    }

    /// Create HTTP client with cookies and custom headers
    pub fn with_auth(
        limiter: RateLimiter,
        timeout: Duration,
        cookies: Option<String>,
        headers: HashMap<String, String>,
    ) -> Result<Self> {
        // gzip/brotli/deflate decoding comes from the enabled reqwest features
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            limiter,
            default_headers: headers,
            cookies,
        })
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse> {
        self.limiter.wait().await;

        let start = Instant::now();

        let mut request = self
            .client
            .request(req.method, req.url.clone())
            .headers(req.headers.clone());

        for (key, value) in &self.default_headers {
            if let Ok(header_name) = header::HeaderName::from_bytes(key.as_bytes()) {
                if let Ok(header_value) = header::HeaderValue::from_str(value) {
                    request = request.header(header_name, header_value);
                }
            }
        }

        if let Some(ref cookies) = self.cookies {
            request = request.header(header::COOKIE, cookies);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            body,
            elapsed_ms: start.elapsed().as_millis(),
        })
    }
}
