use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

use crate::metrics::ScanMetrics;

static PATTERN_CACHE: Lazy<DashMap<String, CompiledPattern>> = Lazy::new(DashMap::new);

/// Compile outcome for a single pattern string
#[derive(Debug, Clone)]
enum CompiledPattern {
    Usable(Arc<Regex>),
    /// Malformed pattern; kept as a never-matching slot
    Rejected,
}

/// Tests lines against a pattern set, racing all patterns concurrently.
///
/// Every pattern is compiled once, case-insensitively, when the matcher
/// is constructed. A pattern that fails to compile is not an error: it is
/// logged, counted, and treated as one that never matches, so one bad
/// pattern cannot block the rest of the set.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    patterns: Vec<CompiledPattern>,
    rejected: usize,
    metrics: Arc<ScanMetrics>,
}

impl LineMatcher {
    /// Creates a new LineMatcher for the given patterns
    pub fn new(patterns: Vec<String>) -> Self {
        Self::with_metrics(patterns, Arc::new(ScanMetrics::new()))
    }

    /// Creates a new LineMatcher with the specified metrics
    pub fn with_metrics(patterns: Vec<String>, metrics: Arc<ScanMetrics>) -> Self {
        let mut compiled = Vec::with_capacity(patterns.len());
        let mut rejected = 0;

        for pattern in patterns {
            let entry = if let Some(entry) = PATTERN_CACHE.get(&pattern) {
                metrics.record_cache_operation(true);
                entry.clone()
            } else {
                let entry = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(regex) => CompiledPattern::Usable(Arc::new(regex)),
                    Err(e) => {
                        warn!("Ignoring malformed pattern {:?}: {}", pattern, e);
                        CompiledPattern::Rejected
                    }
                };
                metrics.record_cache_operation(false);
                PATTERN_CACHE.insert(pattern, entry.clone());
                entry
            };
            if matches!(entry, CompiledPattern::Rejected) {
                rejected += 1;
            }
            compiled.push(entry);
        }

        Self {
            patterns: compiled,
            rejected,
            metrics,
        }
    }

    /// Gets the current metrics
    pub fn metrics(&self) -> &Arc<ScanMetrics> {
        &self.metrics
    }

    /// Total number of patterns in the set, malformed ones included
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of patterns that failed to compile
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    /// Returns true iff any pattern matches somewhere within `line`.
    ///
    /// One task per usable pattern is spawned onto the current rayon
    /// pool. The shared flag is both the completion slot (first writer
    /// wins) and the cancellation signal: a task that finds it already
    /// set skips its evaluation entirely, while tasks already evaluating
    /// run to completion. Joining the scope is what establishes the
    /// negative outcome; the call never returns false with a task still
    /// pending.
    pub fn is_match(&self, line: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let found = AtomicBool::new(false);
        let metrics = &self.metrics;

        rayon::scope(|scope| {
            for compiled in &self.patterns {
                if let CompiledPattern::Usable(regex) = compiled {
                    let found = &found;
                    scope.spawn(move |_| {
                        if found.load(Ordering::Acquire) {
                            metrics.record_short_circuit();
                            return;
                        }
                        metrics.record_evaluation();
                        if regex.is_match(line) {
                            found.store(true, Ordering::Release);
                        }
                    });
                }
            }
        });

        found.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match() {
        let matcher = LineMatcher::new(vec!["foo".to_string()]);
        assert!(matcher.is_match("Foobar"));
        assert!(matcher.is_match("FOO"));
        assert!(!matcher.is_match("qux"));
    }

    #[test]
    fn test_substring_search_semantics() {
        // Patterns match anywhere within the line, not the whole line
        let matcher = LineMatcher::new(vec!["ba[rz]".to_string()]);
        assert!(matcher.is_match("BAZ!!"));
        assert!(matcher.is_match("rebar rally"));
        assert!(!matcher.is_match("nothing here"));
    }

    #[test]
    fn test_any_of_multiple_patterns() {
        let matcher = LineMatcher::new(vec!["foo".to_string(), "ba[rz]".to_string()]);
        assert!(matcher.is_match("Foobar"));
        assert!(matcher.is_match("BAZ!!"));
        assert!(!matcher.is_match("qux"));
        assert!(!matcher.is_match("nothing here"));
    }

    #[test]
    fn test_empty_pattern_set_never_matches() {
        let matcher = LineMatcher::new(vec![]);
        assert!(!matcher.is_match("anything at all"));
        assert!(!matcher.is_match(""));
    }

    #[test]
    fn test_malformed_pattern_does_not_block_valid_one() {
        let matcher = LineMatcher::new(vec!["(".to_string(), "cat".to_string()]);
        assert_eq!(matcher.rejected_count(), 1);
        assert!(matcher.is_match("concatenate"));
    }

    #[test]
    fn test_all_malformed_patterns_never_match() {
        let matcher = LineMatcher::new(vec!["(".to_string(), "[z-".to_string()]);
        assert_eq!(matcher.pattern_count(), 2);
        assert_eq!(matcher.rejected_count(), 2);
        assert!(!matcher.is_match("cat"));
        assert!(!matcher.is_match(""));
    }

    #[test]
    fn test_empty_pattern_string_matches_everything() {
        // An empty line in a pattern file is a valid regex that matches
        // any input, same as the empty pattern in other regex engines
        let matcher = LineMatcher::new(vec![String::new()]);
        assert!(matcher.is_match("anything"));
        assert!(matcher.is_match(""));
    }

    #[test]
    fn test_matcher_shared_across_threads() {
        let matcher = Arc::new(LineMatcher::new(vec![
            "foo".to_string(),
            "ba[rz]".to_string(),
        ]));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let matcher = Arc::clone(&matcher);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(matcher.is_match("Foobar"));
                        assert!(!matcher.is_match(&format!("nothing here {}", i)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_pattern_caching() {
        // Use a unique pattern for this test to avoid interference from other tests
        let unique_pattern = format!(
            "cache_probe_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );

        let metrics = Arc::new(ScanMetrics::new());

        // First creation should miss the cache
        let _matcher1 = LineMatcher::with_metrics(vec![unique_pattern.clone()], metrics.clone());
        assert_eq!(metrics.cache_hits(), 0);
        assert_eq!(metrics.cache_misses(), 1);

        // Second creation should hit it
        let _matcher2 = LineMatcher::with_metrics(vec![unique_pattern.clone()], metrics.clone());
        assert_eq!(metrics.cache_hits(), 1);
        assert_eq!(metrics.cache_misses(), 1);

        // A rejected compile is cached too
        let bad_pattern = format!("({}", unique_pattern);
        let _matcher3 = LineMatcher::with_metrics(vec![bad_pattern.clone()], metrics.clone());
        let _matcher4 = LineMatcher::with_metrics(vec![bad_pattern], metrics.clone());
        assert_eq!(metrics.cache_hits(), 2);
        assert_eq!(metrics.cache_misses(), 2);
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        // The cancellation signal must not leak between lines
        let matcher = LineMatcher::new(vec!["match".to_string()]);
        assert!(matcher.is_match("a match here"));
        assert!(!matcher.is_match("but not here"));
        assert!(matcher.is_match("and a MATCH again"));
    }
}
