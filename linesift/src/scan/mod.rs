/// Concurrent line scanning.
///
/// For every input line the whole pattern set is raced at once: one task
/// per pattern, a first-writer-wins completion flag that doubles as the
/// cancellation signal for sibling tasks, and the scope join to establish
/// a negative outcome once every task has reported. The pattern set is
/// compiled once and shared read-only across all lines.
pub mod engine;
pub mod matcher;

pub use engine::scan;
pub use matcher::LineMatcher;
