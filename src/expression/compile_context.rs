use std::sync::{atomic::{AtomicU64, Ordering}, Arc};

use crate::Config;

/// Monotonic counters behind generated derived-table aliases.
///
/// Share one counter between contexts that render into the same statement.
#[derive(Debug, Default)]
pub struct AliasCounter {
    subquery: AtomicU64,
    union: AtomicU64,
}

impl AliasCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_subquery(&self) -> u64 {
        self.subquery.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn next_union(&self) -> u64 {
        self.union.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// State threaded through one rendering pass.
#[derive(Debug, Clone)]
pub struct CompileContext {
    counter: Arc<AliasCounter>,
    subquery_prefix: String,
    union_prefix: String,
    semantic_check: bool,
}

impl CompileContext {
    pub fn new(config: &Config) -> Self {
        Self::with_counter(config, Arc::new(AliasCounter::new()))
    }

    pub fn with_counter(config: &Config, counter: Arc<AliasCounter>) -> Self {
        Self {
            counter,
            subquery_prefix: config.subquery_alias_prefix.clone(),
            union_prefix: config.union_alias_prefix.clone(),
            semantic_check: config.semantic_check,
        }
    }

    pub fn counter(&self) -> Arc<AliasCounter> {
        self.counter.clone()
    }

    pub fn semantic_check(&self) -> bool {
        self.semantic_check
    }

    pub fn subquery_alias(&self) -> String {
        format!("`{}{:x}`", self.subquery_prefix, self.counter.next_subquery())
    }

    pub fn union_alias(&self) -> String {
        format!("`{}{:x}`", self.union_prefix, self.counter.next_union())
    }
}
