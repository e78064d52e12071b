//! Newsletter "unread" badge.
//!
//! The badge shows when the latest daily digest is newer than the last
//! one the reader viewed. Dates compare as `YYYY-MM-DD` strings. Any
//! failure leaves the badge off.

use super::state::KeyValueStore;
use crate::digest::DigestService;
use tracing::debug;

/// Storage key holding the last viewed publish date.
pub const LAST_VIEWED_KEY: &str = "lastViewedNewsletter";

/// True when nothing was viewed yet or the latest date is newer.
pub fn is_unread(last_viewed: Option<&str>, latest_publish_date: &str) -> bool {
    match last_viewed {
        None => true,
        Some(seen) => seen < latest_publish_date,
    }
}

/// Checks the remote store for a newer digest than the stored one.
pub async fn check_unread<S: KeyValueStore>(service: &DigestService, store: &S) -> bool {
    if !service.is_configured() {
        return false;
    }

    match service.latest_daily().await {
        Ok(latest) if !latest.publish_date.is_empty() => {
            let last_viewed = store.get(LAST_VIEWED_KEY);
            is_unread(last_viewed.as_deref(), &latest.publish_date)
        }
        Ok(_) => false,
        Err(e) => {
            debug!("Badge check failed: {}", e);
            false
        }
    }
}

/// Records the latest digest as viewed. Returns the stored date.
pub async fn mark_as_read<S: KeyValueStore>(
    service: &DigestService,
    store: &mut S,
) -> Option<String> {
    if !service.is_configured() {
        return None;
    }

    let latest = match service.latest_daily().await {
        Ok(latest) if !latest.publish_date.is_empty() => latest,
        Ok(_) => return None,
        Err(e) => {
            debug!("Mark as read failed: {}", e);
            return None;
        }
    };

    match store.set(LAST_VIEWED_KEY, &latest.publish_date) {
        Ok(()) => Some(latest.publish_date),
        Err(e) => {
            debug!("Failed to store last viewed date: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::MemoryStore;
    use crate::config::RemoteConfig;

    #[test]
    fn test_is_unread() {
        assert!(is_unread(None, "2026-01-12"));
        assert!(is_unread(Some("2026-01-11"), "2026-01-12"));
        assert!(!is_unread(Some("2026-01-12"), "2026-01-12"));
        assert!(!is_unread(Some("2026-02-01"), "2026-01-12"));
    }

    #[test]
    fn test_unconfigured_service_keeps_badge_off() {
        let service = DigestService::new(&RemoteConfig::default()).unwrap();
        let mut store = MemoryStore::new();

        assert!(!tokio_test::block_on(check_unread(&service, &store)));
        assert_eq!(tokio_test::block_on(mark_as_read(&service, &mut store)), None);
        assert!(store.get(LAST_VIEWED_KEY).is_none());
    }
}
