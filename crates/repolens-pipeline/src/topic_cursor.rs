use std::collections::HashMap;
use std::sync::Mutex;

use repolens_core::DEFAULT_TOPICS;

/// Pages cycle through `1..=MAX_PAGE` per topic.
pub const MAX_PAGE: u32 = 10;

/// One discovery query: which topic and which 1-based result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub topic: String,
    pub page: u32,
}

#[derive(Debug, Default)]
struct CursorState {
    counter: u64,
    pages: HashMap<String, u32>,
}

/// Round-robin topic selector with a page cursor per topic.
///
/// State lives only in memory; a restart begins again at the first topic,
/// page 1.
#[derive(Debug)]
pub struct TopicCursor {
    topics: Vec<String>,
    state: Mutex<CursorState>,
}

impl Default for TopicCursor {
    fn default() -> Self {
        Self::new(DEFAULT_TOPICS.iter().map(|t| (*t).to_string()).collect())
    }
}

impl TopicCursor {
    /// Creates a cursor over `topics`. An empty list yields no selections.
    #[must_use]
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            state: Mutex::new(CursorState::default()),
        }
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Picks the next topic in rotation and returns its current page,
    /// advancing that topic's page (10 wraps to 1) before returning.
    pub fn next_selection(&self) -> Option<Selection> {
        if self.topics.is_empty() {
            return None;
        }
        // A poisoned lock only means another selection panicked mid-update;
        // the counter and page map are still individually valid.
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let len = self.topics.len() as u64;
        let idx = usize::try_from(state.counter % len).unwrap_or(0);
        state.counter = state.counter.wrapping_add(1);

        let topic = self.topics[idx].clone();
        let page = state.pages.get(&topic).copied().unwrap_or(1);
        let next = if page >= MAX_PAGE { 1 } else { page + 1 };
        state.pages.insert(topic.clone(), next);

        Some(Selection { topic, page })
    }
}
