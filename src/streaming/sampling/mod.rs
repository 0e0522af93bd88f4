//! Sampling primitives built on sparse recovery: [`l0_sampler`] for
//! insertion-deletion streams, [`reservoir`] for insertion-only streams.

pub mod l0_sampler;
pub mod reservoir;
