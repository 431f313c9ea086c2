//! Per-run violation accumulation and instance path tracking.

use crate::error::Violation;

/// Collects violations during a single validation run and tracks the current
/// JSON-Pointer path into the instance tree.
///
/// The path stack mirrors traversal depth: the walker pushes a segment when
/// descending into an object property or array element and pops it on return,
/// so a segment is never left dangling after a descent completes.
#[derive(Clone, Debug, Default)]
pub struct Context {
    violations: Vec<Violation>,
    path: Vec<String>,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    /// The current path as a JSON-Pointer string (`""` at the root).
    pub fn pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            out.push('/');
            out.push_str(segment);
        }
        out
    }

    pub fn push_segment(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    pub fn pop_segment(&mut self) {
        self.path.pop();
    }

    /// Record a violation of `keyword` at the current path.
    pub fn add_violation(&mut self, keyword: &str, message: String) {
        self.violations.push(Violation {
            keyword: keyword.to_string(),
            path: self.pointer(),
            message,
        });
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// A disposable child context for trial walks (composition constraints):
    /// same current path, empty violation list. The caller inspects the
    /// fork's outcome before deciding whether to [`merge`](Context::merge)
    /// it back.
    pub fn fork(&self) -> Context {
        Context {
            violations: Vec::new(),
            path: self.path.clone(),
        }
    }

    /// Append all violations recorded in a fork.
    pub fn merge(&mut self, fork: Context) {
        self.violations.extend(fork.violations);
    }
}
