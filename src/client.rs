use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::cookie::Jar;
use serde_json::Value;

use crate::config::HarnessConfig;

mod exchange;
pub use self::exchange::Exchange;

/// Identity a request is sent under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    /// Through the shared session; carries whatever cookies signin merged in.
    Session,
    /// Through a cookie-less client that never sees the session jar.
    Anonymous,
}

pub struct ApiClient {
    api_base: String,
    jar: Arc<Jar>,
    session: reqwest::blocking::Client,
    anonymous: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(cfg: &HarnessConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let timeout = cfg.request_timeout_secs.map(Duration::from_secs);

        let mut session = reqwest::blocking::Client::builder()
            .user_agent("drawcheck")
            .cookie_provider(jar.clone());
        let mut anonymous = reqwest::blocking::Client::builder().user_agent("drawcheck");
        if let Some(t) = timeout {
            session = session.timeout(t);
            anonymous = anonymous.timeout(t);
        }

        Ok(Self {
            api_base: cfg.api_base(),
            jar,
            session: session.build().context("build session client")?,
            anonymous: anonymous.build().context("build anonymous client")?,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Issue one request and read the full response.
    ///
    /// Any status code is an `Ok`; only transport problems (connect, timeout,
    /// body read) are errors.
    pub fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        auth: Auth,
    ) -> Result<Exchange> {
        let url = self.url(path);
        let client = match auth {
            Auth::Session => &self.session,
            Auth::Anonymous => &self.anonymous,
        };

        let mut req = client.request(method.clone(), &url);
        if let Some(b) = body {
            req = req.json(b);
        }

        tracing::debug!(%method, %url, ?auth, "sending request");
        let resp = req
            .send()
            .with_context(|| format!("{} {}", method, url))?;
        let exchange =
            Exchange::read(resp).with_context(|| format!("read response of {} {}", method, url))?;
        tracing::debug!(
            %method,
            %url,
            status = exchange.status().as_u16(),
            "received response"
        );
        Ok(exchange)
    }

    /// Merge the `Set-Cookie` headers of `exchange` into the session jar.
    /// Returns how many cookies were offered to the jar.
    pub fn adopt_cookies(&self, exchange: &Exchange) -> Result<usize> {
        let url: reqwest::Url = self
            .api_base
            .parse()
            .with_context(|| format!("parse api base {}", self.api_base))?;
        let cookies = exchange.set_cookies();
        for c in cookies {
            self.jar.add_cookie_str(c, &url);
        }
        tracing::debug!(count = cookies.len(), "merged session cookies");
        Ok(cookies.len())
    }
}
