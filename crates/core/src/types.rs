/// Opaque node identity, stable across moves.
pub type NodeId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh node id.
pub fn new_node_id() -> NodeId {
    uuid::Uuid::new_v4().to_string()
}
