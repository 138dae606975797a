//! TALLY Core Engine
//!
//! Wires transport, oracle, extractor and reporting together for one run.

use crate::core::context::Context;
use crate::core::rate_limit::RateLimiter;
use crate::extract::Extractor;
use crate::http::client::HttpClient;
use crate::oracle::posts::PostsOracle;
use crate::reporting::model::ExtractionReport;
use crate::reporting::reporter::Reporter;
use std::time::Instant;

pub struct Engine {
    ctx: Context,
}

impl Engine {
    pub fn new(ctx: Context) -> anyhow::Result<Self> {
        Ok(Self { ctx })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let ctx = self.ctx;

        tracing::info!("[*] Starting extraction against {}", ctx.target.url);
        tracing::info!(
            "Injection: {}[lt|equals]  alphabet: {} chars",
            ctx.target.param,
            ctx.extraction.alphabet.len()
        );
        if ctx.rate_limit > 0 {
            tracing::info!("Rate limit: {} req/sec", ctx.rate_limit);
        }

        let limiter = RateLimiter::new(ctx.rate_limit);

        let client = if ctx.cookies.is_some() || !ctx.headers.is_empty() {
            tracing::info!("Using authenticated session");
            if ctx.cookies.is_some() {
                tracing::info!("  Cookie: <redacted>");
            }
            if !ctx.headers.is_empty() {
                tracing::info!("  Custom headers: {}", ctx.headers.len());
            }
            HttpClient::with_auth(limiter, ctx.timeout, ctx.cookies.clone(), ctx.headers.clone())?
        } else {
            HttpClient::new(limiter, ctx.timeout)?
        };

        let oracle = PostsOracle::new(client, ctx.target.clone(), ctx.retries);
        let alphabet = ctx.extraction.alphabet.to_string();
        let mut extractor = Extractor::new(oracle, ctx.extraction.clone());

        let start = Instant::now();
        let secrets = match extractor.discover_all().await {
            Ok(secrets) => secrets,
            Err(e) => {
                tracing::error!(
                    "[!] Extraction aborted after {} queries: {}",
                    extractor.stats().total(),
                    e
                );
                return Err(e.into());
            }
        };

        tracing::info!("[***] Discovered secret(s): {}", serde_json::to_string(&secrets)?);

        let report = ExtractionReport::new(
            ctx.target.url.as_str(),
            &ctx.target.param,
            &alphabet,
            secrets,
            extractor.stats().clone(),
            start.elapsed().as_millis(),
        );

        Reporter::new(ctx.output_format, ctx.output_file.clone()).emit(&report)?;

        tracing::info!("[*] Done after {} queries", report.queries.total());
        Ok(())
    }
}
