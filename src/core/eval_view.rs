// src/core/eval_view.rs
use crate::types::{EvalFilter, EvaluationPanel, SignalEvaluation};
use tracing::{debug, warn};

/// Issued on every filter change that needs an authoritative re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub filter: EvalFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer filter change or snapshot superseded the request.
    Stale,
    /// The re-fetch failed; the local filter result stays on screen.
    KeptLocal,
}

/// Filter state and selection of the evaluation timeline.
///
/// The full set is kept exactly as supplied, so going back to `All` never
/// re-derives it from a filtered subset.
#[derive(Debug, Default)]
pub struct EvaluationView {
    full: Vec<SignalEvaluation>,
    displayed: Vec<SignalEvaluation>,
    filter: EvalFilter,
    selected: Option<String>,
    generation: u64,
    /// The displayed rows are a server answer for the current filter.
    authoritative: bool,
}

impl EvaluationView {
    pub fn new(evaluations: Vec<SignalEvaluation>) -> Self {
        let mut view = Self::default();
        view.install(evaluations);
        view
    }

    pub fn filter(&self) -> EvalFilter {
        self.filter
    }

    pub fn displayed(&self) -> &[SignalEvaluation] {
        &self.displayed
    }

    pub fn selected(&self) -> Option<&SignalEvaluation> {
        let id = self.selected.as_deref()?;
        self.displayed.iter().find(|e| e.id == id)
    }

    /// Installs a fresh snapshot. In-flight refreshes become stale, and a
    /// filtered view gets a new ticket so the server set is fetched again.
    ///
    /// A filtered view already showing a server answer keeps its rows and
    /// selection until the renewed answer lands.
    #[must_use]
    pub fn replace_full(&mut self, evaluations: Vec<SignalEvaluation>) -> Option<RefreshTicket> {
        self.generation += 1;
        if self.authoritative && self.filter != EvalFilter::All {
            self.full = evaluations;
        } else {
            self.install(evaluations);
        }
        self.ticket()
    }

    /// Applies `filter` locally right away and resets the selection.
    ///
    /// Returns a ticket when the server should be asked for the authoritative
    /// set; `All` is served from the original set and needs none.
    pub fn set_filter(&mut self, filter: EvalFilter) -> Option<RefreshTicket> {
        self.filter = filter;
        self.generation += 1;
        self.authoritative = false;
        self.apply_local();
        self.select_first();
        debug!(
            "Evaluation filter -> {} ({} rows, generation {})",
            filter.label(),
            self.displayed.len(),
            self.generation
        );

        self.ticket()
    }

    /// Applies a re-fetch result if it still answers the latest filter change.
    pub fn apply_refresh<E: std::fmt::Display>(
        &mut self,
        generation: u64,
        result: Result<Vec<SignalEvaluation>, E>,
    ) -> RefreshOutcome {
        if generation != self.generation {
            debug!(
                "Dropping stale evaluation refresh (generation {} < {})",
                generation, self.generation
            );
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(rows) => {
                self.displayed = rows;
                self.authoritative = true;
                if self.selected().is_none() {
                    self.select_first();
                }
                RefreshOutcome::Applied
            }
            Err(e) => {
                warn!(
                    "Evaluation refresh for '{}' failed, keeping local filter: {}",
                    self.filter.label(),
                    e
                );
                RefreshOutcome::KeptLocal
            }
        }
    }

    /// Selects `id` if it is on screen.
    pub fn select(&mut self, id: &str) -> bool {
        if self.displayed.iter().any(|e| e.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        self.step(1);
    }

    pub fn select_prev(&mut self) {
        self.step(-1);
    }

    pub fn panel(&self) -> EvaluationPanel {
        EvaluationPanel {
            filter: self.filter,
            rows: self.displayed.clone(),
            selected: self.selected.clone(),
        }
    }

    fn ticket(&self) -> Option<RefreshTicket> {
        match self.filter {
            EvalFilter::All => None,
            filter => Some(RefreshTicket {
                generation: self.generation,
                filter,
            }),
        }
    }

    fn install(&mut self, evaluations: Vec<SignalEvaluation>) {
        self.full = evaluations;
        self.apply_local();
        if self.selected().is_none() {
            self.select_first();
        }
    }

    fn apply_local(&mut self) {
        self.displayed = match self.filter {
            EvalFilter::All => self.full.clone(),
            filter => self
                .full
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect(),
        };
    }

    fn select_first(&mut self) {
        self.selected = self.displayed.first().map(|e| e.id.clone());
    }

    fn step(&mut self, delta: isize) {
        if self.displayed.is_empty() {
            return;
        }
        let last = self.displayed.len() - 1;
        let current = self
            .selected
            .as_deref()
            .and_then(|id| self.displayed.iter().position(|e| e.id == id));
        let next = match current {
            Some(i) => i.saturating_add_signed(delta).min(last),
            None => 0,
        };
        let id = self.displayed[next].id.clone();
        self.select(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::rejections::tests::evaluation;
    use crate::types::EvaluationResult;

    fn sample() -> Vec<SignalEvaluation> {
        vec![
            evaluation("e1", EvaluationResult::Rejected, vec![]),
            evaluation("e2", EvaluationResult::SignalLong, vec![]),
            evaluation("e3", EvaluationResult::Rejected, vec![]),
            evaluation("e4", EvaluationResult::SignalShort, vec![]),
        ]
    }

    fn ids(rows: &[SignalEvaluation]) -> Vec<&str> {
        rows.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn local_filter_applies_immediately_and_resets_selection() {
        let mut view = EvaluationView::new(sample());
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e1"));

        let ticket = view.set_filter(EvalFilter::Signals).unwrap();
        assert_eq!(ticket.filter, EvalFilter::Signals);
        assert_eq!(ids(view.displayed()), vec!["e2", "e4"]);
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e2"));
    }

    #[test]
    fn back_to_all_restores_original_set() {
        let original = sample();
        let mut view = EvaluationView::new(original.clone());

        let ticket = view.set_filter(EvalFilter::Rejected).unwrap();
        // Server returns a differently shaped set for the rejected filter.
        let server = vec![evaluation("e9", EvaluationResult::Rejected, vec![])];
        assert_eq!(
            view.apply_refresh::<String>(ticket.generation, Ok(server)),
            RefreshOutcome::Applied
        );
        assert_eq!(ids(view.displayed()), vec!["e9"]);

        assert!(view.set_filter(EvalFilter::All).is_none());
        assert_eq!(ids(view.displayed()), ids(&original));
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e1"));
    }

    #[test]
    fn failed_refresh_keeps_local_result() {
        let mut view = EvaluationView::new(sample());
        let ticket = view.set_filter(EvalFilter::Rejected).unwrap();
        let outcome = view.apply_refresh(ticket.generation, Err("API 502: bad gateway"));
        assert_eq!(outcome, RefreshOutcome::KeptLocal);
        assert_eq!(ids(view.displayed()), vec!["e1", "e3"]);
    }

    #[test]
    fn stale_refresh_is_discarded() {
        let mut view = EvaluationView::new(sample());
        let first = view.set_filter(EvalFilter::Rejected).unwrap();
        let second = view.set_filter(EvalFilter::Signals).unwrap();
        assert!(second.generation > first.generation);

        let late = vec![evaluation("old", EvaluationResult::Rejected, vec![])];
        assert_eq!(
            view.apply_refresh::<String>(first.generation, Ok(late)),
            RefreshOutcome::Stale
        );
        assert_eq!(ids(view.displayed()), vec!["e2", "e4"]);
    }

    #[test]
    fn new_snapshot_invalidates_pending_refresh() {
        let mut view = EvaluationView::new(sample());
        let ticket = view.set_filter(EvalFilter::Signals).unwrap();
        let renewed = view.replace_full(sample()).unwrap();
        assert_eq!(renewed.filter, EvalFilter::Signals);
        assert_eq!(
            view.apply_refresh::<String>(ticket.generation, Ok(vec![])),
            RefreshOutcome::Stale
        );
        assert_eq!(view.filter(), EvalFilter::Signals);
        assert_eq!(ids(view.displayed()), vec!["e2", "e4"]);
    }

    #[test]
    fn snapshot_keeps_server_rows_and_selection_of_filtered_view() {
        let mut view = EvaluationView::new(sample());
        let ticket = view.set_filter(EvalFilter::Rejected).unwrap();
        let server = vec![
            evaluation("e1", EvaluationResult::Rejected, vec![]),
            evaluation("e9", EvaluationResult::Rejected, vec![]),
        ];
        view.apply_refresh::<String>(ticket.generation, Ok(server));
        assert!(view.select("e9"));

        let renewed = view.replace_full(sample()).unwrap();
        assert_eq!(ids(view.displayed()), vec!["e1", "e9"]);
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e9"));

        let refreshed = vec![
            evaluation("e0", EvaluationResult::Rejected, vec![]),
            evaluation("e9", EvaluationResult::Rejected, vec![]),
        ];
        assert_eq!(
            view.apply_refresh::<String>(renewed.generation, Ok(refreshed)),
            RefreshOutcome::Applied
        );
        assert_eq!(ids(view.displayed()), vec!["e0", "e9"]);
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e9"));

        // Back to All still shows the latest snapshot.
        view.set_filter(EvalFilter::All);
        assert_eq!(ids(view.displayed()), vec!["e1", "e2", "e3", "e4"]);
    }

    #[test]
    fn snapshot_before_any_server_answer_refilters_locally() {
        let mut view = EvaluationView::new(sample());
        view.set_filter(EvalFilter::Signals);
        view.select("e4");
        let mut next = sample();
        next.push(evaluation("e5", EvaluationResult::SignalLong, vec![]));
        assert!(view.replace_full(next).is_some());
        assert_eq!(ids(view.displayed()), vec!["e2", "e4", "e5"]);
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e4"));
    }

    #[test]
    fn selection_moves_and_clamps() {
        let mut view = EvaluationView::new(sample());
        view.select_prev();
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e1"));
        view.select_next();
        view.select_next();
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e3"));
        for _ in 0..10 {
            view.select_next();
        }
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e4"));

        assert!(view.select("e2"));
        assert!(!view.select("missing"));
        assert_eq!(view.selected().map(|e| e.id.as_str()), Some("e2"));
    }

    #[test]
    fn empty_view_has_no_selection() {
        let mut view = EvaluationView::new(Vec::new());
        view.select_next();
        assert!(view.selected().is_none());
        assert!(view.set_filter(EvalFilter::Rejected).is_some());
        assert!(view.panel().rows.is_empty());
    }
}
