//! Authenticated GET of the attendance listing page.

use reqwest::header::COOKIE;
use reqwest::StatusCode;

use crate::error::{AttendanceError, Stage};
use crate::logging::structured::LogContext;

use super::cookies::SessionCookie;
use super::session::PortalClient;

impl PortalClient {
    /// Fetch the listing page with the session cookie and return its body.
    ///
    /// The body is not assumed to be well-formed HTML; invalid UTF-8 is
    /// replaced rather than rejected.
    pub async fn fetch_listing(
        &self,
        cookie: &SessionCookie,
        ctx: &LogContext,
    ) -> Result<String, AttendanceError> {
        let url = self.config.listing_url();
        log::debug!("{} LISTING_REQUEST url={}", ctx, url);

        let response = self
            .http
            .get(&url)
            .header(COOKIE, cookie.as_str())
            .send()
            .await
            .map_err(|e| AttendanceError::from_transport(Stage::Listing, e, self.timeout()))?;

        let status = response.status();
        if status != StatusCode::OK {
            log::warn!("{} LISTING_REJECTED status={}", ctx, status.as_u16());
            return Err(AttendanceError::FetchRejected(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AttendanceError::from_transport(Stage::Listing, e, self.timeout()))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        log::info!("{} PAYLOAD_RECEIVED bytes={}", ctx, body.len());
        Ok(body)
    }
}
