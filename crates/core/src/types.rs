/// Workflow primary keys are server-assigned UUIDs.
pub type WorkflowId = uuid::Uuid;

/// Project ids are issued by the upstream account service and treated as opaque.
pub type ProjectId = String;

/// Stable actor identifier (the `did` claim of a verified token).
pub type ActorId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
