//! Per-fetch context for logging and timing.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for one fetch-attendance invocation.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub fetch_id: String,
    pub serial_number: String,
    pub started_at: DateTime<Utc>,
}

impl FetchContext {
    pub fn new(serial_number: &str) -> Self {
        Self {
            fetch_id: format!("fetch-{}", &Uuid::new_v4().simple().to_string()[..8]),
            serial_number: serial_number.to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.fetch_id).with_device(&self.serial_number)
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_ids_are_short_and_distinct() {
        let a = FetchContext::new("SN001");
        let b = FetchContext::new("SN001");
        assert!(a.fetch_id.starts_with("fetch-"));
        assert_eq!(a.fetch_id.len(), "fetch-".len() + 8);
        assert_ne!(a.fetch_id, b.fetch_id);
    }

    #[test]
    fn test_log_context_carries_device() {
        let ctx = FetchContext::new("SN001");
        let rendered = ctx.log_context().to_string();
        assert!(rendered.contains(&ctx.fetch_id));
        assert!(rendered.contains("[sn=SN001]"));
        assert!(ctx.elapsed_ms() >= 0);
    }
}
