// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shell error types.

use thiserror::Error;

/// Errors surfaced by the window shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The window configuration failed to parse.
    #[error("config error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// No monitor was reported to place the window on.
    #[error("no monitor available")]
    NoMonitor,

    /// The render thread could not be started.
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The render thread panicked before it could be joined.
    #[error("render thread panicked")]
    RenderThreadPanicked,

    /// A render sink could not present a frame.
    #[error("render sink rejected frame: {0}")]
    Sink(String),
}

/// Result alias for shell operations.
pub type Result<T> = core::result::Result<T, ShellError>;
