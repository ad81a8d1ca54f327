use crate::types::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Node not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: NodeId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
