/// Admin viewer state
///
/// The viewer fetches the visitor collection once and keeps it as an
/// immutable in-memory snapshot. Search and date filtering are always
/// recomputed from that original snapshot, never from a previously
/// filtered view, so narrowing and widening a filter both work.
use chrono::{Duration, NaiveDateTime};

use crate::api::VisitorRecord;

/// The date window applied on top of the text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    /// No date constraint
    #[default]
    All,
    /// Visits whose calendar date is today's calendar date
    Today,
    /// Visits within the last 7 days, inclusive, up through now
    ThisWeek,
}

impl DateFilter {
    /// The options offered by the filter drop-down, in display order.
    pub const OPTIONS: [DateFilter; 3] = [DateFilter::All, DateFilter::Today, DateFilter::ThisWeek];
}

impl std::fmt::Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DateFilter::All => "All dates",
            DateFilter::Today => "Today",
            DateFilter::ThisWeek => "This week",
        };
        f.write_str(label)
    }
}

/// Everything the admin window tracks.
pub struct AdminState {
    /// The cached collection, in the order the server returned it.
    /// Refreshed only by an explicit reload.
    visitors: Vec<VisitorRecord>,
    /// Live search text, matched against name and purpose
    pub search: String,
    pub date_filter: DateFilter,
    /// The record currently shown in the detail modal, if any
    pub selected: Option<VisitorRecord>,
}

impl Default for AdminState {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminState {
    pub fn new() -> Self {
        AdminState {
            visitors: Vec::new(),
            search: String::new(),
            date_filter: DateFilter::All,
            selected: None,
        }
    }

    /// Replace the cached collection with a freshly loaded one.
    pub fn set_visitors(&mut self, visitors: Vec<VisitorRecord>) {
        self.visitors = visitors;
    }

    /// Drop the cached collection, e.g. after logging out.
    pub fn clear(&mut self) {
        self.visitors.clear();
        self.selected = None;
    }

    /// The full cached collection, unfiltered.
    pub fn visitors(&self) -> &[VisitorRecord] {
        &self.visitors
    }

    /// Recompute the filtered view from the original cached collection.
    ///
    /// Both predicates must hold: a case-insensitive substring match
    /// against name or purpose, and the date window. Order is
    /// preserved. `now` is passed in so the window edges are exact
    /// and testable.
    pub fn filtered(&self, now: NaiveDateTime) -> Vec<&VisitorRecord> {
        let term = self.search.to_lowercase();
        self.visitors
            .iter()
            .filter(|v| matches_search(v, &term) && matches_date(v, self.date_filter, now))
            .collect()
    }

    /// Open the detail modal for one record.
    pub fn open_detail(&mut self, record: VisitorRecord) {
        self.selected = Some(record);
    }

    /// Dismiss the detail modal.
    pub fn close_detail(&mut self) {
        self.selected = None;
    }
}

fn matches_search(record: &VisitorRecord, term: &str) -> bool {
    term.is_empty()
        || record.full_name.to_lowercase().contains(term)
        || record.purpose.to_lowercase().contains(term)
}

fn matches_date(record: &VisitorRecord, filter: DateFilter, now: NaiveDateTime) -> bool {
    match filter {
        DateFilter::All => true,
        DateFilter::Today => record.created_at.date() == now.date(),
        DateFilter::ThisWeek => {
            let week_ago = now - Duration::days(7);
            record.created_at >= week_ago && record.created_at <= now
        }
    }
}

/// The one canonical timestamp rendering, shared by the table and the
/// detail modal.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(full_name: &str, purpose: &str, created_at: NaiveDateTime) -> VisitorRecord {
        VisitorRecord {
            full_name: full_name.into(),
            email: Some("visitor@example.com".into()),
            phone: Some("1234567890".into()),
            purpose: purpose.into(),
            finding: "Front desk".into(),
            created_at,
            photo_download: None,
            pdf_download: None,
        }
    }

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample_state() -> (AdminState, NaiveDateTime) {
        let now = at(2026, 8, 6, 12);
        let mut state = AdminState::new();
        state.set_visitors(vec![
            record("Ada Lovelace", "Meeting", now),
            record("Grace Hopper", "Interview", at(2026, 8, 3, 9)),
            record("Alan Turing", "Tour", at(2026, 7, 27, 12)),
        ]);
        (state, now)
    }

    #[test]
    fn test_no_filters_returns_everything_in_order() {
        let (state, now) = sample_state();
        let filtered = state.filtered(now);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].full_name, "Ada Lovelace");
        assert_eq!(filtered[2].full_name, "Alan Turing");
    }

    #[test]
    fn test_search_matches_name_or_purpose_case_insensitively() {
        let (mut state, now) = sample_state();

        state.search = "GRACE".into();
        let by_name = state.filtered(now);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].full_name, "Grace Hopper");

        state.search = "tour".into();
        let by_purpose = state.filtered(now);
        assert_eq!(by_purpose.len(), 1);
        assert_eq!(by_purpose[0].full_name, "Alan Turing");

        state.search = "nobody".into();
        assert!(state.filtered(now).is_empty());
    }

    #[test]
    fn test_today_filter_matches_calendar_date() {
        let (mut state, now) = sample_state();
        state.date_filter = DateFilter::Today;

        let filtered = state.filtered(now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].full_name, "Ada Lovelace");

        // A visit late tonight still counts as today.
        state.set_visitors(vec![record("Night Owl", "Meeting", at(2026, 8, 6, 23))]);
        assert_eq!(state.filtered(now).len(), 1);
    }

    #[test]
    fn test_this_week_window_is_seven_days_inclusive() {
        let (mut state, now) = sample_state();
        state.date_filter = DateFilter::ThisWeek;

        // Ada (now) and Grace (3 days ago) are in; Alan (10 days ago) is out.
        let filtered = state.filtered(now);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].full_name, "Ada Lovelace");
        assert_eq!(filtered[1].full_name, "Grace Hopper");

        // Exactly on the window edges.
        state.set_visitors(vec![
            record("Edge Early", "Meeting", now - Duration::days(7)),
            record("Edge Late", "Meeting", now),
            record("Too Early", "Meeting", now - Duration::days(7) - Duration::seconds(1)),
        ]);
        let edges = state.filtered(now);
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let (mut state, now) = sample_state();
        state.search = "meeting".into();
        state.date_filter = DateFilter::ThisWeek;

        // Grace is in the window but is an Interview; only Ada matches both.
        let filtered = state.filtered(now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].full_name, "Ada Lovelace");
    }

    #[test]
    fn test_filtering_never_mutates_the_cache() {
        let (mut state, now) = sample_state();
        state.search = "nobody".into();
        assert!(state.filtered(now).is_empty());
        assert_eq!(state.visitors().len(), 3);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(at(2026, 8, 6, 9)), "2026-08-06 09:00:00");
    }
}
