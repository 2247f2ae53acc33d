use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::MatchMode;
use crate::fallback::FallbackResponder;
use crate::matcher::Matcher;

/// Answers a symptom description from the catalog, or from the fallback model when the
/// catalog has nothing for it.
#[derive(Clone)]
pub struct HealthChatbot {
    matcher: Arc<Matcher>,
    fallback: FallbackResponder,
    mode: MatchMode,
}

impl HealthChatbot {
    pub fn new(matcher: Arc<Matcher>, fallback: FallbackResponder, mode: MatchMode) -> Self {
        Self {
            matcher,
            fallback,
            mode,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Catalog answer formatted as markdown, or the fallback text (possibly `Error: ...`).
    pub async fn answer(&self, input: &str) -> String {
        if let Some(text) = self.catalog_answer(input).await {
            return text;
        }
        debug!(mode = %self.mode, "no catalog match, using fallback");
        self.fallback.respond(input).await
    }

    async fn catalog_answer(&self, input: &str) -> Option<String> {
        match self.mode {
            MatchMode::Exact => self.matcher.exact_match(input).map(|r| r.to_markdown()),
            MatchMode::Semantic => match self.matcher.find(input).await {
                Ok(result) => result.record().map(|r| r.to_markdown()),
                Err(e) => {
                    warn!(error = %e, "semantic match failed, falling back");
                    None
                }
            },
        }
    }
}
