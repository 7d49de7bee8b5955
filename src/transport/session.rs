//! Portal client and the two-step login handshake.
//!
//! 1. Anonymous GET of the login page to obtain the session cookie.
//! 2. Form POST of `sn` / `pass` carrying that cookie.
//!
//! One attempt each, bounded by the configured request timeout.

use std::future::Future;
use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::StatusCode;

use crate::config::UpstreamConfig;
use crate::error::{AttendanceError, Stage};
use crate::logging::structured::LogContext;
use crate::security::cookie_names;
use crate::storage::models::Credentials;

use super::cookies::SessionCookie;

/// Anything that can log a device in and hand back its listing payload.
///
/// The production implementation is [`PortalClient`]; tests substitute
/// scripted sources.
pub trait AttendanceSource {
    fn authenticate(
        &self,
        credentials: &Credentials,
        ctx: &LogContext,
    ) -> impl Future<Output = Result<SessionCookie, AttendanceError>> + Send;

    fn fetch_payload(
        &self,
        cookie: &SessionCookie,
        ctx: &LogContext,
    ) -> impl Future<Output = Result<String, AttendanceError>> + Send;
}

/// HTTP client for the legacy portal.
///
/// Holds no cookie store: every fetch builds its own [`SessionCookie`].
#[derive(Debug, Clone)]
pub struct PortalClient {
    pub(super) http: reqwest::Client,
    pub(super) config: UpstreamConfig,
}

impl PortalClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    pub(super) fn timeout(&self) -> Duration {
        self.config.request_timeout
    }

    /// Run the login handshake and return the merged session cookie.
    pub async fn login(
        &self,
        credentials: &Credentials,
        ctx: &LogContext,
    ) -> Result<SessionCookie, AttendanceError> {
        let url = self.config.login_url();
        let mut cookie = SessionCookie::new();

        log::debug!("{} LOGIN_PAGE_REQUEST url={}", ctx, url);
        let page = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AttendanceError::from_transport(Stage::LoginPage, e, self.timeout()))?;
        cookie.merge_headers(page.headers());
        log::info!(
            "{} LOGIN_PAGE_OK status={} cookies={:?}",
            ctx,
            page.status().as_u16(),
            cookie_names(cookie.as_str())
        );

        let mut submit = self
            .http
            .post(&url)
            .form(&[
                ("sn", credentials.serial_number.as_str()),
                ("pass", credentials.password.as_str()),
            ]);
        if !cookie.is_empty() {
            submit = submit.header(COOKIE, cookie.as_str());
        }

        let response = submit
            .send()
            .await
            .map_err(|e| AttendanceError::from_transport(Stage::LoginSubmit, e, self.timeout()))?;

        let status = response.status();
        if status != StatusCode::OK {
            log::warn!("{} LOGIN_REJECTED status={}", ctx, status.as_u16());
            return Err(AttendanceError::AuthRejected(status.as_u16()));
        }

        cookie.merge_headers(response.headers());
        log::info!(
            "{} LOGIN_OK cookies={:?}",
            ctx,
            cookie_names(cookie.as_str())
        );
        Ok(cookie)
    }
}

impl AttendanceSource for PortalClient {
    async fn authenticate(
        &self,
        credentials: &Credentials,
        ctx: &LogContext,
    ) -> Result<SessionCookie, AttendanceError> {
        self.login(credentials, ctx).await
    }

    async fn fetch_payload(
        &self,
        cookie: &SessionCookie,
        ctx: &LogContext,
    ) -> Result<String, AttendanceError> {
        self.fetch_listing(cookie, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_from_default_config() {
        let client = PortalClient::new(UpstreamConfig::default()).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert!(client.config().login_url().ends_with("/sc_pro.asp"));
    }
}
