//! @ai:module:intent Chronologically sortable report identifiers
//! @ai:module:layer domain
//! @ai:module:public_api ReportIdGenerator, IssuedId
//! @ai:module:stateless false

use crate::report::types::ReportKind;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// @ai:intent An identifier and the second it is stamped with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedId {
    pub id: String,
    pub issued_at: DateTime<Utc>,
}

/// @ai:intent Issues `{kind}_report_{YYYYMMDDHHMMSS}[_{language}]` identifiers
///
/// The timestamp is second-resolution UTC. A second is never issued twice: a
/// request landing in an already used second takes the next free one, so
/// identifiers are unique and sort in issue order.
#[derive(Debug, Default)]
pub struct ReportIdGenerator {
    last_second: Mutex<Option<i64>>,
}

impl ReportIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Issue an identifier stamped with the current time
    /// @ai:effects state:write, time
    pub fn issue(&self, kind: ReportKind, language: Option<&str>) -> IssuedId {
        self.issue_at(kind, language, Utc::now())
    }

    /// @ai:intent Issue an identifier for an explicit instant
    /// @ai:post id sorts after every identifier issued before it
    /// @ai:post issued_at is the second encoded in id, possibly later than `now`
    /// @ai:effects state:write
    pub fn issue_at(&self, kind: ReportKind, language: Option<&str>, now: DateTime<Utc>) -> IssuedId {
        let second = {
            let mut last = self.last_second.lock().unwrap_or_else(PoisonError::into_inner);
            let second = match *last {
                Some(previous) if now.timestamp() <= previous => previous + 1,
                _ => now.timestamp(),
            };
            *last = Some(second);
            second
        };

        let issued_at = DateTime::<Utc>::from_timestamp(second, 0).unwrap_or(now);
        let mut id = format!("{}_report_{}", kind.as_str(), issued_at.format(STAMP_FORMAT));

        if let (ReportKind::Template, Some(language)) = (kind, language) {
            id.push('_');
            id.push_str(language);
        }
        IssuedId { id, issued_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::ReportType;
    use chrono::TimeZone;
    use regex::Regex;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, h, m, s).unwrap()
    }

    #[test]
    fn test_template_id_shape() {
        let ids = ReportIdGenerator::new();
        let issued = ids.issue_at(ReportKind::Template, Some("en"), at(9, 5, 7));
        assert_eq!(issued.id, "template_report_20261016090507_en");
        assert_eq!(issued.issued_at, at(9, 5, 7));

        let pattern = Regex::new(r"^template_report_\d{14}_en$").unwrap();
        assert!(pattern.is_match(&ids.issue(ReportKind::Template, Some("en")).id));
    }

    #[test]
    fn test_standard_id_has_no_language() {
        let ids = ReportIdGenerator::new();
        let issued = ids.issue_at(ReportKind::Standard(ReportType::Financial), Some("en"), at(12, 0, 0));
        assert_eq!(issued.id, "financial_report_20261016120000");
    }

    #[test]
    fn test_same_second_ids_are_unique_and_ordered() {
        let ids = ReportIdGenerator::new();
        let now = at(12, 0, 0);
        let issued: Vec<String> = (0..5)
            .map(|_| ids.issue_at(ReportKind::Template, Some("kn"), now).id)
            .collect();

        for pair in issued.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
        assert_eq!(issued[4], "template_report_20261016120004_kn");
    }

    #[test]
    fn test_ids_across_seconds_sort_chronologically() {
        let ids = ReportIdGenerator::new();
        let first = ids.issue_at(ReportKind::Template, Some("en"), at(23, 59, 59)).id;
        let second = ids
            .issue_at(ReportKind::Template, Some("en"), at(23, 59, 59) + chrono::Duration::seconds(1))
            .id;
        let third = ids
            .issue_at(ReportKind::Template, Some("en"), at(23, 59, 59) + chrono::Duration::days(40))
            .id;
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn test_clock_going_backwards_keeps_order() {
        let ids = ReportIdGenerator::new();
        let later = ids.issue_at(ReportKind::Template, Some("en"), at(12, 0, 10)).id;
        let earlier_clock = ids.issue_at(ReportKind::Template, Some("en"), at(12, 0, 3)).id;
        assert!(later < earlier_clock);
    }

    #[test]
    fn test_bumped_second_is_reported_as_issue_time() {
        let ids = ReportIdGenerator::new();
        let now = at(12, 0, 0);
        ids.issue_at(ReportKind::Template, Some("en"), now);
        let bumped = ids.issue_at(ReportKind::Template, Some("en"), now);

        assert_eq!(bumped.issued_at, at(12, 0, 1));
        assert_eq!(bumped.id, format!("template_report_{}_en", bumped.issued_at.format(STAMP_FORMAT)));
    }
}
