//! Session history mirror
//!
//! Tracks the surface's back stack from page-start events, for engines whose
//! embedding API has no `canGoBack` query. It is a fallback: when the engine
//! can report its own history position, that answer wins.
//!
//! The mirror reconciles itself against what the engine actually does:
//! - a page-start for the entry behind the current one is a traversal back,
//!   whoever initiated it (back gesture or the page's own `history.back()`)
//! - a back traversal that produces no page-start before the next back
//!   request did nothing in the engine, so the mirror collapses to the
//!   current entry

use url::Url;

#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<Url>,
    pending_back: bool,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page-start for `url`
    pub fn record_start(&mut self, url: &Url) {
        self.pending_back = false;

        let len = self.entries.len();
        if len > 1 && self.entries[len - 2] == *url {
            self.entries.pop();
            tracing::trace!(url = %url, depth = self.entries.len(), "History traversed back");
            return;
        }

        // Reload of the current entry
        if self.entries.last() == Some(url) {
            return;
        }

        self.entries.push(url.clone());
        tracing::trace!(url = %url, depth = self.entries.len(), "History entry pushed");
    }

    /// Settle a back traversal that never produced a page-start: the engine
    /// had nothing behind the current entry, so neither does the mirror.
    pub fn reconcile(&mut self) {
        if !self.pending_back {
            return;
        }
        self.pending_back = false;
        if let Some(current) = self.entries.pop() {
            self.entries.clear();
            self.entries.push(current);
        }
        tracing::debug!("Previous back traversal had no effect; history collapsed");
    }

    /// Mark that a back traversal is about to be issued.
    ///
    /// Returns false when there is nothing to go back to, after settling any
    /// unanswered previous traversal.
    pub fn begin_back(&mut self) -> bool {
        self.reconcile();

        if !self.can_go_back() {
            return false;
        }
        self.pending_back = true;
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn current(&self) -> Option<&Url> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending_back = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn stack(urls: &[&str]) -> HistoryStack {
        let mut history = HistoryStack::new();
        for u in urls {
            history.record_start(&url(u));
        }
        history
    }

    #[test]
    fn test_initial_page_has_no_back() {
        let mut history = HistoryStack::new();
        assert!(!history.can_go_back());

        history.record_start(&url("https://example.com/app"));
        assert_eq!(history.len(), 1);
        assert!(!history.can_go_back());
        assert!(!history.begin_back());
    }

    #[test]
    fn test_link_navigation_grows_stack() {
        let history = stack(&["https://example.com/app", "https://example.com/app/page2"]);

        assert_eq!(history.len(), 2);
        assert!(history.can_go_back());
        assert_eq!(
            history.current().unwrap().as_str(),
            "https://example.com/app/page2"
        );
    }

    #[test]
    fn test_reload_does_not_push() {
        let history = stack(&["https://example.com/app", "https://example.com/app"]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_back_traversal_pops() {
        let mut history = stack(&["https://example.com/app", "https://example.com/app/page2"]);

        assert!(history.begin_back());
        history.record_start(&url("https://example.com/app"));

        assert_eq!(history.len(), 1);
        assert_eq!(history.current().unwrap().as_str(), "https://example.com/app");
        assert!(!history.can_go_back());

        // Next forward navigation pushes again
        history.record_start(&url("https://example.com/app/page3"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_page_initiated_back_pops() {
        // The page calls history.back() itself; no back gesture involved
        let mut history = stack(&[
            "https://example.com/app",
            "https://example.com/app/page2",
            "https://example.com/app",
        ]);

        assert_eq!(history.len(), 1);
        assert!(!history.can_go_back());
        assert!(!history.begin_back());
    }

    #[test]
    fn test_back_without_effect_collapses() {
        let mut history = stack(&["https://example.com/app", "https://example.com/app/page2"]);

        // The engine ignores the traversal: no page-start follows
        assert!(history.begin_back());

        // Next back request finds the previous one unanswered
        assert!(!history.begin_back());
        assert_eq!(history.len(), 1);
        assert!(!history.can_go_back());
        assert_eq!(
            history.current().unwrap().as_str(),
            "https://example.com/app/page2"
        );

        // And the one after that still has nothing to go back to
        assert!(!history.begin_back());
    }

    #[test]
    fn test_reconcile_without_pending_back_keeps_entries() {
        let mut history = stack(&["https://example.com/app", "https://example.com/app/page2"]);
        history.reconcile();
        assert_eq!(history.len(), 2);

        assert!(history.begin_back());
        history.reconcile();
        assert_eq!(history.len(), 1);
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_link_after_unanswered_back_pushes() {
        let mut history = stack(&["https://example.com/app", "https://example.com/app/page2"]);

        assert!(history.begin_back());
        history.record_start(&url("https://example.com/app/page3"));

        assert_eq!(history.len(), 3);
        // The pending traversal was settled by the page-start
        assert!(history.begin_back());
        history.record_start(&url("https://example.com/app/page2"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut history = stack(&["https://example.com/app", "https://example.com/app/page2"]);
        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_go_back());
    }
}
