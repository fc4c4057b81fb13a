use std::collections::BTreeSet;

use crate::lsdb::lsa::RouterId;
use crate::topology::neighbors::NeighborSets;

/// Compare two neighbor-set snapshots and produce human-readable change
/// lines: new routers first, then new adjacencies, then removed routers,
/// then removed adjacencies. The log front end keys on the leading word,
/// so every line starts with `New` or `Removed`.
///
/// Adjacencies are canonicalized as unordered pairs so an edge discovered
/// from both endpoints is reported once, and collected into ordered sets so
/// emission order is deterministic. An adjacency whose far endpoint itself
/// appeared or disappeared is folded into that router's own line.
pub fn diff_neighbor_sets(new: &NeighborSets, old: &NeighborSets) -> Vec<String> {
    let mut new_router_lines = Vec::new();
    let mut new_pairs: BTreeSet<(RouterId, RouterId)> = BTreeSet::new();
    for (router, neighbors) in new {
        match old.get(router) {
            None => new_router_lines.push(router_line("New", router, neighbors)),
            Some(old_neighbors) => {
                for neighbor in neighbors.difference(old_neighbors) {
                    if only_in_first(neighbor, new, old) {
                        continue;
                    }
                    new_pairs.insert(canonical_pair(router, neighbor));
                }
            }
        }
    }

    let mut removed_router_lines = Vec::new();
    let mut removed_pairs: BTreeSet<(RouterId, RouterId)> = BTreeSet::new();
    for (router, neighbors) in old {
        match new.get(router) {
            None => removed_router_lines.push(router_line("Removed", router, neighbors)),
            Some(new_neighbors) => {
                for neighbor in neighbors.difference(new_neighbors) {
                    if only_in_first(neighbor, old, new) {
                        continue;
                    }
                    removed_pairs.insert(canonical_pair(router, neighbor));
                }
            }
        }
    }

    let mut lines = new_router_lines;
    lines.extend(
        new_pairs
            .into_iter()
            .map(|(a, b)| format!("New adjacency {a} <-> {b}")),
    );
    lines.extend(removed_router_lines);
    lines.extend(
        removed_pairs
            .into_iter()
            .map(|(a, b)| format!("Removed adjacency {a} <-> {b}")),
    );
    lines
}

/// True when the router keyed `id` exists only in the first snapshot, i.e.
/// it appeared (new pass) or disappeared (removed pass) and already gets a
/// router line of its own.
fn only_in_first(id: &RouterId, first: &NeighborSets, second: &NeighborSets) -> bool {
    first.contains_key(id) && !second.contains_key(id)
}

fn canonical_pair(a: &RouterId, b: &RouterId) -> (RouterId, RouterId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

fn router_line(event: &str, router: &RouterId, neighbors: &BTreeSet<RouterId>) -> String {
    if neighbors.is_empty() {
        return format!("{event} router {router}");
    }
    let joined = neighbors
        .iter()
        .map(RouterId::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{event} router {router} (neighbors: {joined})")
}
