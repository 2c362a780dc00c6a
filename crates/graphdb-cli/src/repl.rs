use graphdb::{Database, QueryResult, Row};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use std::time::Instant;

fn render_node(node: &graphdb::NodeRef) -> String {
    match &node.label {
        Some(label) => format!("{}:{label}", node.id),
        None => node.id.clone(),
    }
}

/// Renders a whole-path row as `(id:label)-[:type]->(id:label)-...`, the
/// textual form §4.7 asks for when a `pathvar` is returned.
fn render_path_row(row: &Row) -> String {
    let mut out = String::new();
    for (i, node) in row.nodes.iter().enumerate() {
        out.push('(');
        out.push_str(&render_node(node));
        out.push(')');
        if let Some(edge) = row.edges.get(i) {
            out.push_str(&format!("-[:{}]->", edge.type_));
        }
    }
    out
}

/// Renders a projection row (bare variables / `var.prop` items) as a single
/// `|`-separated line, one field per requested item in request order.
fn render_projection_row(row: &Row) -> String {
    let mut fields = Vec::with_capacity(row.nodes.len() + row.edges.len());
    fields.extend(row.nodes.iter().map(render_node));
    fields.extend(row.edges.iter().map(|e| e.type_.clone()));
    fields.join(" | ")
}

fn render_row(row: &Row) -> String {
    if row.nodes.len() + row.edges.len() <= 1 {
        return render_projection_row(row);
    }
    // A row produced by a bare `RETURN a.id, b.id, c.id` list also has
    // multiple nodes, but none of them chain into the next via `row.edges`
    // (edges is empty for pure property projections). Only a realised
    // path row carries parallel node/edge sequences with edges.len() ==
    // nodes.len() - 1, so that's the discriminator for the arrow rendering.
    if !row.edges.is_empty() && row.edges.len() + 1 == row.nodes.len() {
        render_path_row(row)
    } else {
        render_projection_row(row)
    }
}

fn print_tabular(result: &QueryResult) {
    for row in &result.rows {
        println!("{}", render_row(row));
    }
}

fn print_json(result: &QueryResult) {
    for row in &result.rows {
        match serde_json::to_string(row) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("failed to serialise row: {err}"),
        }
    }
}

/// Runs the interactive REPL: one query per line, `exit`/`quit` to leave.
/// History is kept alongside the database directory so it survives restarts.
pub fn run(db: &mut Database, json: bool) -> Result<(), String> {
    println!("graphdb REPL. Type `exit` or `quit` to leave.");

    let mut editor = DefaultEditor::new().map_err(|e| e.to_string())?;
    let history_path = Path::new(".graphdb_history");
    let _ = editor.load_history(history_path);

    loop {
        match editor.readline("graphdb> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                    break;
                }

                let start = Instant::now();
                match db.execute_cypher(line) {
                    Ok(result) => {
                        if json {
                            print_json(&result);
                        } else {
                            print_tabular(&result);
                        }
                        println!(
                            "({} row{}, {:.4}s)",
                            result.rows.len(),
                            if result.rows.len() == 1 { "" } else { "s" },
                            start.elapsed().as_secs_f64()
                        );
                    }
                    Err(err) => println!("Error: {err}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {err}");
                break;
            }
        }
    }

    let _ = editor.save_history(history_path);
    println!("Bye!");
    Ok(())
}
