//! The two stream-model engines: [`insertion`] for insertion-only
//! streams, [`id`] for insertion-deletion streams.

pub mod id;
pub mod insertion;
