/*!
Derivations over a completed LSDB.

This module defines:
- `neighbors`: the per-router adjacency model and its kind-erased
  neighbor-set variant used for diffing.
- `graph`: the node/link description consumed by the force-directed layout.
- `diff`: adjacency-change lines between two neighbor-set snapshots.
*/

pub mod diff;
pub mod graph;
pub mod neighbors;
