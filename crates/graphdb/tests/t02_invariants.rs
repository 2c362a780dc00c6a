//! The invariants and round-trip properties of §8, exercised through the
//! public facade rather than the internal storage/query crates directly.

use graphdb::{Database, Options};
use tempfile::tempdir;

fn open() -> (tempfile::TempDir, Database) {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path(), Options::default()).unwrap();
    (dir, db)
}

#[test]
fn t08_outgoing_and_incoming_indices_stay_mirrored() {
    let (_dir, mut db) = open();
    db.add_node("Mark", "Person").unwrap();
    db.add_node("Alex", "Person").unwrap();
    db.add_edge("Mark", "Alex", "FRIEND").unwrap();

    let out = db.get_outgoing("Mark", "FRIEND").unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "Alex");

    let inc = db.get_incoming("Alex", "FRIEND").unwrap();
    assert_eq!(inc.len(), 1);
    assert_eq!(inc[0].id, "Mark");
}

#[test]
fn t09_node_label_is_defined_iff_node_is_enumerated() {
    let (_dir, mut db) = open();
    assert!(db.get_node_label("Ghost").unwrap().is_none());
    assert!(!db.get_all_nodes().unwrap().contains(&"Ghost".to_string()));

    db.add_node("Mark", "Person").unwrap();
    assert_eq!(db.get_node_label("Mark").unwrap(), Some("Person".to_string()));
    assert!(db.get_all_nodes().unwrap().contains(&"Mark".to_string()));
}

#[test]
fn t10_label_index_membership_matches_the_current_label() {
    let (_dir, mut db) = open();
    db.add_node("Mark", "Person").unwrap();
    assert!(db.get_nodes_by_label("Person").unwrap().contains(&"Mark".to_string()));
    assert!(!db.get_nodes_by_label("Robot").unwrap().contains(&"Mark".to_string()));
}

#[test]
fn t11_delete_node_removes_it_and_every_touching_edge() {
    let (_dir, mut db) = open();
    db.add_node("Mark", "Person").unwrap();
    db.add_node("Alex", "Person").unwrap();
    db.add_node("Felipe", "Person").unwrap();
    db.add_edge("Mark", "Alex", "FRIEND").unwrap();
    db.add_edge("Felipe", "Mark", "UNCLE").unwrap();

    db.delete_node("Mark").unwrap();

    assert!(!db.get_all_nodes().unwrap().contains(&"Mark".to_string()));
    assert!(db.get_outgoing("Mark", "FRIEND").unwrap().is_empty());
    assert!(db.get_incoming("Alex", "FRIEND").unwrap().is_empty());
    assert!(db.get_outgoing("Felipe", "UNCLE").unwrap().is_empty());
    assert!(db.get_incoming("Mark", "UNCLE").unwrap().is_empty());
}

#[test]
fn t12_shortest_path_from_a_node_to_itself_is_the_singleton_path() {
    let (_dir, db) = open();
    let path = db.find_shortest_path("Mark", "Mark", "KNOWS").unwrap();
    assert_eq!(path, Some(vec!["Mark".to_string()]));
}

#[test]
fn t13_shortest_path_every_consecutive_pair_is_connected_forward() {
    let (_dir, mut db) = open();
    db.add_edge("Mark", "Alex", "KNOWS").unwrap();
    db.add_edge("Alex", "Felipe", "KNOWS").unwrap();

    let path = db.find_shortest_path("Mark", "Felipe", "KNOWS").unwrap().unwrap();
    for pair in path.windows(2) {
        let neighbors = db.get_outgoing(&pair[0], "KNOWS").unwrap();
        assert!(neighbors.iter().any(|n| n.id == pair[1]));
    }
}

#[test]
fn t14_add_node_twice_is_idempotent_up_to_label_overwrite() {
    let (_dir, mut db) = open();
    db.add_node("Mark", "Person").unwrap();
    db.add_node("Mark", "Person").unwrap();
    assert_eq!(db.get_all_nodes().unwrap(), vec!["Mark".to_string()]);
}

#[test]
fn t15_add_edge_twice_is_idempotent() {
    let (_dir, mut db) = open();
    db.add_edge("Mark", "Alex", "FRIEND").unwrap();
    db.add_edge("Mark", "Alex", "FRIEND").unwrap();
    assert_eq!(db.get_outgoing("Mark", "FRIEND").unwrap().len(), 1);
}

#[test]
fn t16_delete_edge_on_an_absent_edge_is_a_no_op() {
    let (_dir, mut db) = open();
    db.delete_edge("Mark", "Alex", "FRIEND").unwrap();
    assert!(db.get_outgoing("Mark", "FRIEND").unwrap().is_empty());
}
