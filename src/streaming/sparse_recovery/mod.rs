//! Sparse recovery: `1`-sparse and `s`-sparse recoverers over a stream
//! of signed `(index, delta)` tokens.

pub mod one_sparse;
pub mod s_sparse;
