use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// A structured audit event for a state-changing tracker operation.
///
/// Emitted through `tracing`, so it lands wherever the subscriber ships logs.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: &'static str,
    pub activity_id: Uuid,
    pub actor: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: &'static str, activity_id: Uuid, actor: Option<Uuid>) -> Self {
        Self {
            action,
            activity_id,
            actor,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn emit(&self) {
        info!(
            audit.action = self.action,
            audit.activity_id = %self.activity_id,
            audit.actor = ?self.actor,
            audit.details = ?self.details,
            "audit event"
        );
    }
}
