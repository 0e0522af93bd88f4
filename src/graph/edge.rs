//! Edge updates and the edge-id encoding used by the edge-id variant of
//! [`crate::engine::id::IdEngine`].
//!
//! The triangular encode/decode formula is carried over directly from
//! the teacher's `Edge::from_d1`/`Edge::to_d1` (`src/graph/edge.rs` in
//! `g-raph`), which already implements "an edge in `N^2` space to `N`
//! space" for an undirected pair — exactly spec.md §4.6's edge-id
//! scheme — generalized here from `u32` to `u64` vertex ids and from a
//! search loop to the closed-form triangular-number formula spec.md
//! gives explicitly.

use crate::vertex::VertexId;

/// A single edge-stream record: an undirected pair plus a sign.
///
/// `sign` is always `+1` for insertion-only streams; insertion-deletion
/// streams use `-1` for a `D` record. Duplicates are meaningful: an
/// insertion-only stream treats a repeated edge as adding a new parallel
/// edge to the running degree count (spec.md §1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeUpdate {
    pub u: VertexId,
    pub v: VertexId,
    pub sign: i8,
}

impl EdgeUpdate {
    pub fn insertion(u: VertexId, v: VertexId) -> Self {
        Self { u, v, sign: 1 }
    }

    pub fn deletion(u: VertexId, v: VertexId) -> Self {
        Self { u, v, sign: -1 }
    }

    /// The endpoint other than `from`, if `from` is incident to this edge.
    pub fn other(&self, from: VertexId) -> Option<VertexId> {
        if self.u == from {
            Some(self.v)
        } else if self.v == from {
            Some(self.u)
        } else {
            None
        }
    }

    /// The pair in canonical `(min, max)` order.
    pub fn ordered(&self) -> (VertexId, VertexId) {
        if self.u < self.v {
            (self.u, self.v)
        } else {
            (self.v, self.u)
        }
    }
}

/// Encode the unordered pair `{u, v}` (`u < v`, both in `[0, n)`) as a
/// unique integer id in `[0, n(n-1)/2)`, per spec.md §4.6's formula:
///
/// `id = n(n-1)/2 - (n-u)(n-u-1)/2 + (v-u-1)`
pub fn encode_edge_id(n: u64, u: u64, v: u64) -> u64 {
    debug_assert!(u < v && v < n, "edge_id requires 0 <= u < v < n");
    let total = n * (n - 1) / 2;
    let remaining_after_u = (n - u) * (n - u - 1) / 2;
    total - remaining_after_u + (v - u - 1)
}

/// Decode an id produced by [`encode_edge_id`] back into `(u, v)`, `u < v`.
///
/// Inverts the triangular formula by locating `u` as the largest vertex
/// whose "edges starting here" block contains `id`, then reading off the
/// offset within that block.
pub fn decode_edge_id(n: u64, id: u64) -> (u64, u64) {
    let total = n * (n - 1) / 2;
    debug_assert!(id < total, "edge id {id} out of range for n={n}");
    let mut u = 0u64;
    loop {
        let block_start = total - (n - u) * (n - u - 1) / 2;
        let block_size = n - u - 1;
        if id < block_start + block_size {
            let v = u + 1 + (id - block_start);
            return (u, v);
        }
        u += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scenario_5_edge_id_round_trip() {
        let n = 5;
        assert_eq!(encode_edge_id(n, 0, 1), 0);
        assert_eq!(encode_edge_id(n, 0, 4), 3);
        assert_eq!(encode_edge_id(n, 3, 4), 9);
        assert_eq!(decode_edge_id(n, 0), (0, 1));
        assert_eq!(decode_edge_id(n, 3), (0, 4));
        assert_eq!(decode_edge_id(n, 9), (3, 4));
    }

    proptest! {
        #[test]
        fn round_trip_is_a_bijection(n in 2u64..60, seed in 0u64..10_000) {
            let u = seed % (n - 1);
            let v = u + 1 + (seed / (n - 1)) % (n - 1 - u);
            let id = encode_edge_id(n, u, v);
            prop_assert!(id < n * (n - 1) / 2);
            prop_assert_eq!(decode_edge_id(n, id), (u, v));
        }
    }
}
