use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::facility::Facility;

use super::super::{FinderCache, ViewModel};

const FINDER_LIMIT: usize = 50;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Facility indices whose name fuzzy-matches `query`, best first.
fn rank_by_name(facilities: &[Facility], query: &str) -> Vec<usize> {
    let matcher = SkimMatcherV2::default();
    let mut scored = facilities
        .iter()
        .enumerate()
        .filter_map(|(index, facility)| {
            fuzzy_match_score(&matcher, &facility.name, query).map(|score| (index, score))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(FINDER_LIMIT);
    scored.into_iter().map(|(index, _)| index).collect()
}

impl ViewModel {
    pub(in crate::app) fn finder_matches(&mut self) -> Vec<usize> {
        let query = self.finder_query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let cached = self
            .finder_cache
            .as_ref()
            .is_some_and(|cache| cache.query == query);
        if !cached {
            self.finder_cache = Some(FinderCache {
                query: query.to_owned(),
                matches: rank_by_name(&self.facilities, query),
            });
        }

        self.finder_cache
            .as_ref()
            .map(|cache| {
                cache
                    .matches
                    .iter()
                    .copied()
                    .filter(|&index| self.is_visible(index))
                    .collect()
            })
            .unwrap_or_default()
    }
}
