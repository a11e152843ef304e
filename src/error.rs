//! Error types for ovenboard.

use thiserror::Error;

use crate::model::OvenStatus;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no oven numbered {0} on this board")]
    UnknownOven(u32),

    #[error("invalid state transition for oven {oven}: {from} -> {to}")]
    InvalidTransition {
        oven: u32,
        from: OvenStatus,
        to: OvenStatus,
    },

    #[error("cooking time left must be a positive number of minutes, got {0}")]
    NonPositiveMinutes(i64),

    #[error("oven {oven} cooked {cooked} chickens but {left} were reported left")]
    LeftoversExceedBatch { oven: u32, cooked: u32, left: u32 },

    #[error("remote state claims status {status} but is missing batch fields")]
    MalformedState { status: OvenStatus },

    #[error("store returned HTTP {status}")]
    Store { status: u16 },

    #[error("store request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
