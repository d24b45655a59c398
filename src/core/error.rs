use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(crate::ecs::entity::Entity),

    #[error("Component not found for entity: {0}")]
    ComponentNotFound(String),

    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("Insufficient resources: {0}")]
    InsufficientResources(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
