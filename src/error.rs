//! Crate-wide error type.
//!
//! Environmental errors (I/O, network, asset loading) are always recovered
//! locally by the caller; the variants here exist so that recovery sites can
//! log a structured reason rather than a bare string. Programmer-error
//! variants (`EntityDoesNotExist`, `ComponentAlreadyPresent`) are expected to
//! propagate to whatever system triggered them.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to read/write chunk file: {0}")]
    ChunkIoFailed(String),

    #[error("chunk file had {found} bytes, expected {expected}")]
    ChunkCorrupt { found: usize, expected: usize },

    #[error("entity {0:?} does not exist")]
    EntityDoesNotExist(crate::ecs::entity::Entity),

    #[error("component already present on entity {0:?}")]
    ComponentAlreadyPresent(crate::ecs::entity::Entity),

    #[error("failed to decode network packet: {0}")]
    PacketDecodeFailed(String),

    #[error("texture atlas is missing a region for the requested block/face")]
    TextureAtlasIncomplete,

    #[error("window/context initialization failed: {0}")]
    WindowInitFailed(String),

    #[error("config error: {0}")]
    Config(String),
}
