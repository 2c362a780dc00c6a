//! Query Executor: dispatches a parsed query against the Graph API and
//! assembles the structured result.

use crate::ast::{Direction, Filter, PathPattern, Query, QueryKind, ReturnItem};
use crate::error::Result;
use crate::matcher::{self, MatchedPath};
use crate::parser;
use graphdb_api::{EdgeRef, NodeRef, QueryResult, Row};
use graphdb_storage::GraphEngine;

/// Parses and runs `query_text` against `engine`. A parse failure is logged
/// and reported as an empty result rather than propagated — the query
/// surface never faults on bad input.
pub fn execute(engine: &mut GraphEngine, query_text: &str) -> Result<QueryResult> {
    let query = match parser::parse(query_text) {
        Ok(query) => query,
        Err(err) => {
            tracing::warn!(%err, "unparsable query");
            return Ok(QueryResult::empty());
        }
    };

    match &query.kind {
        QueryKind::Create => execute_create(engine, &query.pattern),
        QueryKind::Delete(items) => execute_delete(engine, &query, items),
        QueryKind::Return(items) => execute_return(engine, &query, items),
    }
}

fn execute_create(engine: &mut GraphEngine, pattern: &PathPattern) -> Result<QueryResult> {
    for np in &pattern.nodes {
        if let (Some(id), Some(label)) = (&np.id, &np.label) {
            engine.add_node(id, label)?;
        }
    }
    for (i, rel) in pattern.rels.iter().enumerate() {
        let left = &pattern.nodes[i];
        let right = &pattern.nodes[i + 1];
        if let (Some(left_id), Some(right_id)) = (&left.id, &right.id) {
            let type_ = rel.type_.as_deref().unwrap_or("");
            let (from, to) = match rel.direction {
                Direction::Incoming => (right_id, left_id),
                Direction::Outgoing | Direction::Undirected => (left_id, right_id),
            };
            engine.add_edge(from, to, type_)?;
        }
    }
    Ok(QueryResult::empty())
}

fn execute_delete(
    engine: &mut GraphEngine,
    query: &Query,
    items: &[crate::ast::DeleteItem],
) -> Result<QueryResult> {
    let matches = matcher::match_pattern(engine, &query.pattern)?;
    for m in &matches {
        if !passes_filters(engine, &query.pattern, m, &query.filters)? {
            continue;
        }
        for crate::ast::DeleteItem::Variable(name) in items {
            if let Some(ni) = node_index(&query.pattern, name) {
                engine.delete_node(&m.node_ids[ni])?;
            } else if let Some(ri) = rel_index(&query.pattern, name) {
                delete_edges_for_rel(engine, &query.pattern, m, ri)?;
            }
        }
    }
    Ok(QueryResult::empty())
}

fn execute_return(
    engine: &GraphEngine,
    query: &Query,
    items: &[ReturnItem],
) -> Result<QueryResult> {
    let matches = matcher::match_pattern(engine, &query.pattern)?;
    let mut rows: Vec<Row> = Vec::new();
    for m in &matches {
        if !passes_filters(engine, &query.pattern, m, &query.filters)? {
            continue;
        }
        let row = project_row(engine, &query.pattern, m, items)?;
        if !rows.contains(&row) {
            rows.push(row);
        }
    }
    Ok(QueryResult { rows })
}

fn node_index(pattern: &PathPattern, var: &str) -> Option<usize> {
    pattern.nodes.iter().position(|n| n.var.as_deref() == Some(var))
}

fn rel_index(pattern: &PathPattern, var: &str) -> Option<usize> {
    pattern.rels.iter().position(|r| r.var.as_deref() == Some(var))
}

fn delete_edges_for_rel(
    engine: &mut GraphEngine,
    pattern: &PathPattern,
    m: &MatchedPath,
    ri: usize,
) -> Result<()> {
    let rel = &pattern.rels[ri];
    let type_ = m.hop_types[ri].first().cloned().unwrap_or_default();
    let a = &m.node_ids[ri];
    let b = &m.node_ids[ri + 1];
    match rel.direction {
        Direction::Outgoing => engine.delete_edge(a, b, &type_)?,
        Direction::Incoming => engine.delete_edge(b, a, &type_)?,
        Direction::Undirected => {
            engine.delete_edge(a, b, &type_)?;
            engine.delete_edge(b, a, &type_)?;
        }
    }
    Ok(())
}

fn passes_filters(
    engine: &GraphEngine,
    pattern: &PathPattern,
    m: &MatchedPath,
    filters: &[Filter],
) -> Result<bool> {
    for f in filters {
        if !filter_matches(engine, pattern, m, f)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn filter_matches(
    engine: &GraphEngine,
    pattern: &PathPattern,
    m: &MatchedPath,
    f: &Filter,
) -> Result<bool> {
    if let Some(ni) = node_index(pattern, &f.var) {
        return Ok(match f.prop.as_str() {
            "id" => m.node_ids[ni] == f.value,
            "label" => engine.get_node_label(&m.node_ids[ni])?.as_deref() == Some(f.value.as_str()),
            _ => false,
        });
    }
    if let Some(ri) = rel_index(pattern, &f.var) {
        return Ok(match f.prop.as_str() {
            "type" => m.hop_types[ri].first().map(|t| t == &f.value).unwrap_or(false),
            _ => false,
        });
    }
    // An unresolved variable fails the row rather than erroring the query.
    Ok(false)
}

fn project_row(
    engine: &GraphEngine,
    pattern: &PathPattern,
    m: &MatchedPath,
    items: &[ReturnItem],
) -> Result<Row> {
    let mut row = Row::new();
    for item in items {
        match item {
            ReturnItem::Variable(name) => {
                if let Some(ni) = node_index(pattern, name) {
                    row.nodes.push(NodeRef {
                        var: Some(name.clone()),
                        id: m.node_ids[ni].clone(),
                        label: None,
                    });
                } else if let Some(ri) = rel_index(pattern, name) {
                    row.edges.push(EdgeRef {
                        var: Some(name.clone()),
                        from_id: String::new(),
                        to_id: String::new(),
                        type_: m.hop_types[ri].first().cloned().unwrap_or_default(),
                    });
                }
            }
            ReturnItem::Property(var, prop) => {
                if let Some(ni) = node_index(pattern, var) {
                    let (id, label) = match prop.as_str() {
                        "id" => (m.node_ids[ni].clone(), None),
                        "label" => (String::new(), engine.get_node_label(&m.node_ids[ni])?),
                        _ => (String::new(), None),
                    };
                    row.nodes.push(NodeRef {
                        var: Some(var.clone()),
                        id,
                        label,
                    });
                } else if let Some(ri) = rel_index(pattern, var) {
                    let type_ = match prop.as_str() {
                        "type" => m.hop_types[ri].first().cloned().unwrap_or_default(),
                        _ => String::new(),
                    };
                    row.edges.push(EdgeRef {
                        var: Some(var.clone()),
                        from_id: String::new(),
                        to_id: String::new(),
                        type_,
                    });
                }
            }
            ReturnItem::Path(_) => {
                for (i, id) in m.node_ids.iter().enumerate() {
                    row.nodes.push(NodeRef {
                        var: pattern.nodes[i].var.clone(),
                        id: id.clone(),
                        label: engine.get_node_label(id)?,
                    });
                }
                for (i, hop) in m.hops.iter().enumerate() {
                    for w in 0..hop.len() - 1 {
                        row.edges.push(EdgeRef {
                            var: pattern.rels[i].var.clone(),
                            from_id: hop[w].clone(),
                            to_id: hop[w + 1].clone(),
                            type_: m.hop_types[i][w].clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphdb_storage::AdapterOptions;
    use tempfile::tempdir;

    fn fixture() -> (tempfile::TempDir, GraphEngine) {
        let dir = tempdir().unwrap();
        let mut engine = GraphEngine::open(dir.path(), AdapterOptions::default()).unwrap();
        for (id, label) in [
            ("Mark", "Person"),
            ("Alex", "Person"),
            ("Felipe", "Person"),
            ("research@felipebonetto.com", "Email"),
        ] {
            engine.add_node(id, label).unwrap();
        }
        for (from, to, ty) in [
            ("Mark", "Alex", "FRIEND"),
            ("Mark", "Felipe", "FRIEND"),
            ("Alex", "Felipe", "FRIEND"),
            ("Felipe", "Mark", "UNCLE"),
            ("Felipe", "Alex", "COUSIN"),
            ("Felipe", "research@felipebonetto.com", "CONTACT_INFO"),
        ] {
            engine.add_edge(from, to, ty).unwrap();
        }
        (dir, engine)
    }

    fn ids(result: &QueryResult) -> Vec<String> {
        let mut out: Vec<String> = result
            .rows
            .iter()
            .flat_map(|r| r.nodes.iter().map(|n| n.id.clone()))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn returns_direct_friends() {
        let (_dir, mut engine) = fixture();
        let result =
            execute(&mut engine, "MATCH (a)-[:FRIEND]->(b) WHERE a.id = 'Mark' RETURN b.id")
                .unwrap();
        assert_eq!(ids(&result), vec!["Alex".to_string(), "Felipe".to_string()]);
    }

    #[test]
    fn returns_contact_info_with_label() {
        let (_dir, mut engine) = fixture();
        let result = execute(
            &mut engine,
            "MATCH (a:Person)-[:CONTACT_INFO]->(b:Email) WHERE a.id = 'Felipe' RETURN b.id, b.label",
        )
        .unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].nodes[0].id, "research@felipebonetto.com");
        assert_eq!(result.rows[0].nodes[1].label.as_deref(), Some("Email"));
    }

    #[test]
    fn create_then_match_round_trips() {
        let (_dir, mut engine) = fixture();
        execute(&mut engine, "CREATE (n:Person {id:'NewPerson'})").unwrap();
        let result = execute(
            &mut engine,
            "MATCH (n:Person) WHERE n.id='NewPerson' RETURN n.id, n.label",
        )
        .unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].nodes[0].id, "NewPerson");
        assert_eq!(result.rows[0].nodes[1].label.as_deref(), Some("Person"));
    }

    #[test]
    fn delete_relationship_removes_it_from_later_matches() {
        let (_dir, mut engine) = fixture();
        execute(
            &mut engine,
            "MATCH (a)-[r:FRIEND]->(b) WHERE a.id='Mark' DELETE r",
        )
        .unwrap();
        let result =
            execute(&mut engine, "MATCH (a)-[:FRIEND]->(b) WHERE a.id='Mark' RETURN b.id")
                .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn two_hop_friend_chain() {
        let (_dir, mut engine) = fixture();
        let result = execute(
            &mut engine,
            "MATCH (a:Person)-[:FRIEND]->(b:Person)-[:FRIEND]->(c:Person) WHERE a.id='Mark' RETURN a.id,b.id,c.id",
        )
        .unwrap();
        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        let got: Vec<_> = row.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(got, vec!["Mark".to_string(), "Alex".to_string(), "Felipe".to_string()]);
    }

    #[test]
    fn variable_length_reaches_one_and_two_hops() {
        let (_dir, mut engine) = fixture();
        let result = execute(
            &mut engine,
            "MATCH (a)-[*1..2]->(b) WHERE a.id='Mark' RETURN b.id",
        )
        .unwrap();
        assert_eq!(ids(&result), vec!["Alex".to_string(), "Felipe".to_string()]);
    }

    #[test]
    fn unparsable_query_returns_an_empty_result_not_an_error() {
        let (_dir, mut engine) = fixture();
        let result = execute(&mut engine, "SELECT * FROM nowhere").unwrap();
        assert!(result.is_empty());
    }
}
