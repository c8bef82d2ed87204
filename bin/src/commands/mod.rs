//! CLI subcommand implementations.

pub(crate) mod intervals;
pub(crate) mod replay;
