//! Explicit audit identity for persistence writes.

/// Actor recorded when a request carries no identity.
pub const SYSTEM_ACTOR: &str = "system";

/// Longest actor name the stores keep (the audit columns are `VARCHAR(100)`).
pub const MAX_ACTOR_CHARS: usize = 100;

/// Who is performing a write.
///
/// Passed explicitly into every store mutation; stores stamp it into the
/// created-by / updated-by columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuditContext {
    actor: String,
}

impl AuditContext {
    /// Audit context for a named actor.
    ///
    /// Blank names fall back to [`SYSTEM_ACTOR`]; longer names are cut to
    /// [`MAX_ACTOR_CHARS`] characters.
    pub fn new(actor: impl Into<String>) -> Self {
        let actor = actor.into();
        let clamped: String = actor.trim().chars().take(MAX_ACTOR_CHARS).collect();
        let actor = clamped.trim_end();
        if actor.is_empty() {
            Self::system()
        } else {
            Self {
                actor: actor.to_string(),
            }
        }
    }

    pub fn system() -> Self {
        Self {
            actor: SYSTEM_ACTOR.to_string(),
        }
    }

    /// Resolve an optional identity, defaulting to `fallback` when absent.
    pub fn or_fallback(actor: Option<&str>, fallback: &AuditContext) -> Self {
        match actor {
            Some(a) if !a.trim().is_empty() => Self::new(a),
            _ => fallback.clone(),
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }
}

impl Default for AuditContext {
    fn default() -> Self {
        Self::system()
    }
}
