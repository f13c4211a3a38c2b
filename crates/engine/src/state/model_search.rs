//! Pending model-search state
//!
//! The interpreter owns exactly one pending search slot. Each dispatched
//! search gets a fresh token; a reply is only accepted while its token is
//! still the live one, so cancellation cannot race a late reply.

use shared::{ModelHit, ModelSearchResponse};

/// Search lifecycle: idle → searching → awaiting-selection → idle
#[derive(Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching {
        token: u64,
        query: String,
        pending_position: [f32; 3],
    },
    AwaitingSelection {
        query: String,
        results: ModelSearchResponse,
        pending_position: [f32; 3],
    },
}

#[derive(Default)]
pub struct ModelSearchState {
    phase: SearchPhase,
    next_token: u64,
}

impl ModelSearchState {
    /// Enter the searching phase, returning the token the reply must carry
    pub fn begin(&mut self, query: &str, pending_position: [f32; 3]) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.phase = SearchPhase::Searching {
            token,
            query: query.to_string(),
            pending_position,
        };
        token
    }

    /// Accept a catalog reply. Returns `false` (discarding the reply) when
    /// `token` no longer matches the live search.
    pub fn complete(&mut self, token: u64, results: ModelSearchResponse) -> bool {
        match &self.phase {
            SearchPhase::Searching {
                token: live,
                query,
                pending_position,
            } if *live == token => {
                self.phase = SearchPhase::AwaitingSelection {
                    query: query.clone(),
                    results,
                    pending_position: *pending_position,
                };
                true
            }
            _ => {
                tracing::debug!(token, "stale model-search reply discarded");
                false
            }
        }
    }

    /// Take the candidate at `index` (0-based) and the retained position,
    /// returning to idle. `None` if not awaiting selection or out of range.
    pub fn pick(&mut self, index: usize) -> Option<(ModelHit, [f32; 3])> {
        match &self.phase {
            SearchPhase::AwaitingSelection {
                results,
                pending_position,
                ..
            } => {
                let hit = results.models.get(index)?.clone();
                let position = *pending_position;
                self.phase = SearchPhase::Idle;
                Some((hit, position))
            }
            _ => None,
        }
    }

    /// Drop a failed or empty search, but only if `token` is still the
    /// live one (a newer search is left alone)
    pub fn abort(&mut self, token: u64) {
        if matches!(self.phase, SearchPhase::Searching { token: live, .. } if live == token) {
            self.phase = SearchPhase::Idle;
        }
    }

    /// Discard any pending search state
    pub fn cancel(&mut self) {
        self.phase = SearchPhase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, SearchPhase::Idle)
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.phase, SearchPhase::Searching { .. })
    }

    /// Results currently offered for selection, if any
    pub fn results(&self) -> Option<&ModelSearchResponse> {
        match &self.phase {
            SearchPhase::AwaitingSelection { results, .. } => Some(results),
            _ => None,
        }
    }

    pub fn query(&self) -> Option<&str> {
        match &self.phase {
            SearchPhase::Searching { query, .. } => Some(query),
            SearchPhase::AwaitingSelection { query, .. } => Some(query),
            SearchPhase::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(names: &[&str]) -> ModelSearchResponse {
        ModelSearchResponse {
            models: names
                .iter()
                .map(|n| ModelHit {
                    name: n.to_string(),
                    url: format!("https://models.test/{n}.glb"),
                    thumbnail: None,
                    description: None,
                    source: "catalog".to_string(),
                })
                .collect(),
            total: names.len(),
            error: None,
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut s = ModelSearchState::default();
        assert!(s.is_idle());

        let token = s.begin("car", [1.0, 0.0, 0.0]);
        assert!(s.is_searching());
        assert_eq!(s.query(), Some("car"));

        assert!(s.complete(token, response(&["Sports Car", "Family Car"])));
        assert_eq!(s.results().unwrap().models.len(), 2);

        let (hit, position) = s.pick(1).unwrap();
        assert_eq!(hit.name, "Family Car");
        assert_eq!(position, [1.0, 0.0, 0.0]);
        assert!(s.is_idle());
    }

    #[test]
    fn test_stale_reply_discarded() {
        let mut s = ModelSearchState::default();
        let first = s.begin("car", [0.0; 3]);
        let second = s.begin("house", [0.0; 3]);
        assert!(!s.complete(first, response(&["Sports Car"])));
        assert!(s.is_searching());
        assert!(s.complete(second, response(&["Cottage"])));
        assert_eq!(s.results().unwrap().models[0].name, "Cottage");
    }

    #[test]
    fn test_cancel_discards_pending_and_reply() {
        let mut s = ModelSearchState::default();
        let token = s.begin("tree", [0.0; 3]);
        s.cancel();
        assert!(s.is_idle());
        assert!(!s.complete(token, response(&["Oak"])));
        assert!(s.is_idle());
        assert!(s.pick(0).is_none());
    }

    #[test]
    fn test_abort_only_drops_own_token() {
        let mut s = ModelSearchState::default();
        let stale = s.begin("car", [0.0; 3]);
        let live = s.begin("house", [0.0; 3]);
        s.abort(stale);
        assert!(s.is_searching());
        s.abort(live);
        assert!(s.is_idle());
    }

    #[test]
    fn test_pick_out_of_range() {
        let mut s = ModelSearchState::default();
        let token = s.begin("car", [0.0; 3]);
        s.complete(token, response(&["Sports Car"]));
        assert!(s.pick(3).is_none());
        // still awaiting selection after a bad pick
        assert!(s.results().is_some());
    }
}
