//! Error types returned by the checked entry points.

use std::io;
use thiserror::Error;

/// Precondition violations reported by the checked vector operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaneError {
    #[error("buffer too short: need {needed} lanes, got {got}")]
    ShortBuffer { needed: usize, got: usize },

    #[error("address {addr:#x} is not {align}-byte aligned")]
    Misaligned { addr: usize, align: usize },

    #[error("operand lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Errors raised while reading `.npy` operand files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("malformed npy payload: {0}")]
    Npy(String),

    #[error("unexpected array shape {found:?}, expected {expected}")]
    Shape {
        expected: &'static str,
        found: Vec<u64>,
    },
}
