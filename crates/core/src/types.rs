/// Proof requests are keyed by random UUIDs.
pub type ProofId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
