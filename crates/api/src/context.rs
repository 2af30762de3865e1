use taproom_core::AuditContext;
use uuid::Uuid;

/// Per-request context, inserted by [`crate::middleware::request_context`].
///
/// Immutable; handlers read it through `Extension<RequestContext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Uuid,
    audit: AuditContext,
}

impl RequestContext {
    pub fn new(request_id: Uuid, audit: AuditContext) -> Self {
        Self { request_id, audit }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Who store writes made by this request are attributed to.
    pub fn audit(&self) -> &AuditContext {
        &self.audit
    }
}
