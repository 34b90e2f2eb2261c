//! Declarative route-to-descriptor invalidation tables.
//!
//! Each action declares, as data, which descriptors it always touches and
//! which it touches only on particular screens. The table is resolved once
//! against the current screen; the mutation wrapper receives plain descriptor
//! lists and never inspects the route itself.

use crate::navigation::ScreenKind;
use query_cache::QueryDescriptor;

/// Route-dependent descriptor table for one action.
#[derive(Debug, Clone, Default)]
pub struct InvalidationPlan {
    base: Vec<QueryDescriptor>,
    by_screen: Vec<(ScreenKind, Vec<QueryDescriptor>)>,
}

impl InvalidationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor touched on every screen.
    pub fn always(mut self, descriptor: QueryDescriptor) -> Self {
        self.base.push(descriptor);
        self
    }

    /// Descriptors touched only on the given screen.
    pub fn on(mut self, screen: ScreenKind, descriptors: Vec<QueryDescriptor>) -> Self {
        self.by_screen.push((screen, descriptors));
        self
    }

    /// Descriptors for the current screen, base entries first, deduplicated.
    pub fn resolve(&self, screen: ScreenKind) -> Vec<QueryDescriptor> {
        let mut resolved: Vec<QueryDescriptor> = Vec::with_capacity(self.base.len());
        let mut push = |out: &mut Vec<QueryDescriptor>, d: &QueryDescriptor| {
            if !out.contains(d) {
                out.push(d.clone());
            }
        };
        for descriptor in &self.base {
            push(&mut resolved, descriptor);
        }
        for (kind, descriptors) in &self.by_screen {
            if *kind == screen {
                for descriptor in descriptors {
                    push(&mut resolved, descriptor);
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries;

    #[test]
    fn test_base_applies_everywhere() {
        let plan = InvalidationPlan::new()
            .always(queries::timeline())
            .always(queries::infinite_timeline());

        for screen in [ScreenKind::Home, ScreenKind::Search, ScreenKind::Other] {
            assert_eq!(
                plan.resolve(screen),
                vec![queries::timeline(), queries::infinite_timeline()]
            );
        }
    }

    #[test]
    fn test_screen_entries_only_on_their_screen() {
        let plan = InvalidationPlan::new()
            .always(queries::timeline())
            .on(
                ScreenKind::TweetDetail,
                vec![queries::single_tweet("t1"), queries::tweet_replies("t1")],
            )
            .on(ScreenKind::Bookmarks, vec![queries::user_bookmarks()]);

        assert_eq!(
            plan.resolve(ScreenKind::TweetDetail),
            vec![
                queries::timeline(),
                queries::single_tweet("t1"),
                queries::tweet_replies("t1"),
            ]
        );
        assert_eq!(
            plan.resolve(ScreenKind::Bookmarks),
            vec![queries::timeline(), queries::user_bookmarks()]
        );
        assert_eq!(plan.resolve(ScreenKind::Home), vec![queries::timeline()]);
    }

    #[test]
    fn test_resolution_dedupes_adjacent() {
        let plan = InvalidationPlan::new()
            .always(queries::timeline())
            .on(ScreenKind::Home, vec![queries::timeline()]);
        assert_eq!(plan.resolve(ScreenKind::Home), vec![queries::timeline()]);
    }
}
