//! The Path Matcher: realises a parsed path pattern against the Graph API.
//!
//! Two sub-algorithms, picked per relationship: a plain one-hop neighbour
//! lookup for fixed-length relationships, and a bounded breadth-first
//! sub-matcher for variable-length (`*min..max`) ones.

use crate::ast::{Direction, NodePattern, PathPattern, RelationshipPattern};
use crate::error::Result;
use graphdb_storage::{GraphEngine, Neighbor};
use std::collections::HashSet;
use std::collections::VecDeque;

/// One realised path: `node_ids[i]` is the binding for `pattern.nodes[i]`;
/// `hops[i]` is the full chain of node ids (inclusive of both endpoints)
/// realising `pattern.rels[i]`, with `hop_types[i]` the edge type walked at
/// each step of that chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPath {
    pub node_ids: Vec<String>,
    pub hops: Vec<Vec<String>>,
    pub hop_types: Vec<Vec<String>>,
}

/// Runs the matcher over the whole pattern, returning every realised path
/// sorted by last-node id (ties broken lexicographically on the full id
/// sequence). Duplicate raw paths are not suppressed here — suppression of
/// identical *projected* rows happens in the executor.
pub fn match_pattern(engine: &GraphEngine, pattern: &PathPattern) -> Result<Vec<MatchedPath>> {
    let mut out = Vec::new();
    for id in candidate_ids(engine, &pattern.nodes[0])? {
        if node_matches(engine, &id, &pattern.nodes[0])? {
            extend(engine, pattern, 0, vec![id], Vec::new(), Vec::new(), &mut out)?;
        }
    }
    out.sort_by(|a, b| {
        a.node_ids
            .last()
            .cmp(&b.node_ids.last())
            .then_with(|| a.node_ids.cmp(&b.node_ids))
    });
    Ok(out)
}

fn extend(
    engine: &GraphEngine,
    pattern: &PathPattern,
    k: usize,
    node_ids: Vec<String>,
    hops: Vec<Vec<String>>,
    hop_types: Vec<Vec<String>>,
    out: &mut Vec<MatchedPath>,
) -> Result<()> {
    if k == pattern.rels.len() {
        out.push(MatchedPath {
            node_ids,
            hops,
            hop_types,
        });
        return Ok(());
    }

    let rel = &pattern.rels[k];
    let last = node_ids.last().unwrap().clone();
    let next_pattern = &pattern.nodes[k + 1];

    if rel.is_fixed_single_hop() {
        for nb in fixed_hop_neighbors(engine, &last, rel)? {
            if node_matches(engine, &nb.id, next_pattern)? {
                let mut node_ids = node_ids.clone();
                node_ids.push(nb.id.clone());
                let mut hops = hops.clone();
                hops.push(vec![last.clone(), nb.id.clone()]);
                let mut hop_types = hop_types.clone();
                hop_types.push(vec![nb.type_.clone()]);
                extend(engine, pattern, k + 1, node_ids, hops, hop_types, out)?;
            }
        }
    } else {
        for (chain, types) in variable_length_matches(engine, &last, rel, next_pattern)? {
            let mut node_ids = node_ids.clone();
            node_ids.push(chain.last().unwrap().clone());
            let mut hops = hops.clone();
            hops.push(chain);
            let mut hop_types = hop_types.clone();
            hop_types.push(types);
            extend(engine, pattern, k + 1, node_ids, hops, hop_types, out)?;
        }
    }
    Ok(())
}

fn candidate_ids(engine: &GraphEngine, np: &NodePattern) -> Result<Vec<String>> {
    if let Some(id) = &np.id {
        return Ok(vec![id.clone()]);
    }
    if let Some(label) = &np.label {
        return Ok(engine.get_nodes_by_label(label)?);
    }
    Ok(engine.get_all_nodes()?)
}

/// A node pattern with no label accepts any label here (the first node, and
/// every fixed-hop node, is unconstrained unless the query says otherwise).
fn node_matches(engine: &GraphEngine, id: &str, np: &NodePattern) -> Result<bool> {
    if let Some(label) = &np.label {
        if engine.get_node_label(id)?.as_deref() != Some(label.as_str()) {
            return Ok(false);
        }
    }
    if let Some(expected_id) = &np.id {
        if id != expected_id {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Same check used inside the variable-length sub-matcher, where a node
/// pattern with no label defaults to requiring label `Person` rather than
/// accepting any label — a reference-implementation quirk preserved
/// deliberately rather than silently generalised away.
fn node_matches_variable_length(engine: &GraphEngine, id: &str, np: &NodePattern) -> Result<bool> {
    let effective_label = np.label.as_deref().unwrap_or("Person");
    match engine.get_node_label(id)? {
        Some(l) if l == effective_label => {}
        _ => return Ok(false),
    }
    if let Some(expected_id) = &np.id {
        if id != expected_id {
            return Ok(false);
        }
    }
    Ok(true)
}

fn fixed_hop_neighbors(
    engine: &GraphEngine,
    node: &str,
    rel: &RelationshipPattern,
) -> Result<Vec<Neighbor>> {
    Ok(match rel.direction {
        Direction::Outgoing => match &rel.type_ {
            Some(t) => engine.get_outgoing(node, t)?,
            None => engine.get_all_outgoing(node)?,
        },
        Direction::Incoming => match &rel.type_ {
            Some(t) => engine.get_incoming(node, t)?,
            None => engine.get_all_incoming(node)?,
        },
        Direction::Undirected => {
            let mut combined = match &rel.type_ {
                Some(t) => engine.get_outgoing(node, t)?,
                None => engine.get_all_outgoing(node)?,
            };
            let incoming = match &rel.type_ {
                Some(t) => engine.get_incoming(node, t)?,
                None => engine.get_all_incoming(node)?,
            };
            let seen: HashSet<&str> = combined.iter().map(|n| n.id.as_str()).collect();
            for nb in incoming {
                if !seen.contains(nb.id.as_str()) {
                    combined.push(nb);
                }
            }
            combined
        }
    })
}

/// The bounded BFS sub-matcher for a `*min..max` relationship. Returns one
/// `(chain, edge_types)` pair per valid terminal node reached — `chain`
/// includes `start` as its first element and the terminal as its last.
fn variable_length_matches(
    engine: &GraphEngine,
    start: &str,
    rel: &RelationshipPattern,
    next_pattern: &NodePattern,
) -> Result<Vec<(Vec<String>, Vec<String>)>> {
    let mut out = Vec::new();
    let mut queue: VecDeque<(Vec<String>, Vec<String>, u32)> = VecDeque::new();
    queue.push_back((vec![start.to_string()], Vec::new(), 0));

    while let Some((chain, types, local_hops)) = queue.pop_front() {
        let last = chain.last().unwrap().clone();
        if local_hops >= rel.min_hops
            && local_hops <= rel.max_hops
            && node_matches_variable_length(engine, &last, next_pattern)?
        {
            out.push((chain.clone(), types.clone()));
        }
        if local_hops < rel.max_hops {
            for nb in fixed_hop_neighbors(engine, &last, rel)? {
                if chain.contains(&nb.id) {
                    continue;
                }
                let mut chain = chain.clone();
                chain.push(nb.id.clone());
                let mut types = types.clone();
                types.push(nb.type_);
                queue.push_back((chain, types, local_hops + 1));
            }
        }
    }
    Ok(out)
}
