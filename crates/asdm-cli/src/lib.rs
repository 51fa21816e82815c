//! Library side of the `asdm` maintenance tool.

#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
