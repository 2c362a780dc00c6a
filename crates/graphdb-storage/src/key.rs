//! The Key Codec (§4.1).
//!
//! Four key families, distinguished by a one-byte tag, fields joined by a
//! NUL separator (`SEP`). Callers must validate fields with
//! [`graphdb_api::validate_field`] before reaching this module — a field
//! containing `SEP` would make the encoding ambiguous.
//!
//! ```text
//! N SEP <id>                      -> label
//! L SEP <label> SEP <id>          -> empty
//! O SEP <from> SEP <type> SEP <to> -> empty
//! I SEP <to>   SEP <type> SEP <from> -> empty
//! ```
//!
//! Because fields are raw bytes (not length-prefixed), a prefix scan over
//! `O SEP <from> SEP <type> SEP` returns exactly the outgoing edges of that
//! type from that node, in lexicographic `to`-id order — matching §4.3's
//! ordering guarantee, which length-prefixed fields would have broken.

pub const SEP: u8 = 0;

const TAG_NODE: u8 = b'N';
const TAG_LABEL: u8 = b'L';
const TAG_OUT: u8 = b'O';
const TAG_IN: u8 = b'I';

fn push_field(buf: &mut Vec<u8>, field: &str) {
    buf.push(SEP);
    buf.extend_from_slice(field.as_bytes());
}

/// Splits the bytes following the tag into `n` fields. Every key built by
/// this module starts each field with a leading `SEP`, so splitting on `SEP`
/// yields one spurious empty leading element which callers skip.
fn split_fields(rest: &[u8], n: usize) -> Option<Vec<&[u8]>> {
    let mut parts: Vec<&[u8]> = rest.split(|&b| b == SEP).collect();
    if parts.is_empty() {
        return None;
    }
    parts.remove(0); // leading empty element before the first SEP
    if parts.len() != n {
        return None;
    }
    Some(parts)
}

fn to_str(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(|s| s.to_string())
}

// --- Node records: N\0<id> -> label ---------------------------------------

pub fn node_key(id: &str) -> Vec<u8> {
    let mut buf = vec![TAG_NODE];
    push_field(&mut buf, id);
    buf
}

pub fn node_scan_prefix() -> Vec<u8> {
    vec![TAG_NODE, SEP]
}

pub fn decode_node_key(key: &[u8]) -> Option<String> {
    let rest = key.strip_prefix(&[TAG_NODE])?;
    let fields = split_fields(rest, 1)?;
    to_str(fields[0])
}

// --- Label index: L\0<label>\0<id> -> empty -------------------------------

pub fn label_key(label: &str, id: &str) -> Vec<u8> {
    let mut buf = vec![TAG_LABEL];
    push_field(&mut buf, label);
    push_field(&mut buf, id);
    buf
}

pub fn label_scan_prefix(label: &str) -> Vec<u8> {
    let mut buf = vec![TAG_LABEL];
    push_field(&mut buf, label);
    buf.push(SEP);
    buf
}

pub fn decode_label_key(key: &[u8]) -> Option<(String, String)> {
    let rest = key.strip_prefix(&[TAG_LABEL])?;
    let fields = split_fields(rest, 2)?;
    Some((to_str(fields[0])?, to_str(fields[1])?))
}

// --- Outgoing edges: O\0<from>\0<type>\0<to> -> empty ---------------------

pub fn out_key(from: &str, type_: &str, to: &str) -> Vec<u8> {
    let mut buf = vec![TAG_OUT];
    push_field(&mut buf, from);
    push_field(&mut buf, type_);
    push_field(&mut buf, to);
    buf
}

pub fn out_scan_prefix(from: &str, type_: &str) -> Vec<u8> {
    let mut buf = vec![TAG_OUT];
    push_field(&mut buf, from);
    push_field(&mut buf, type_);
    buf.push(SEP);
    buf
}

/// Prefix matching every outgoing edge of `from`, regardless of type.
pub fn out_node_scan_prefix(from: &str) -> Vec<u8> {
    let mut buf = vec![TAG_OUT];
    push_field(&mut buf, from);
    buf.push(SEP);
    buf
}

pub fn decode_out_key(key: &[u8]) -> Option<(String, String, String)> {
    let rest = key.strip_prefix(&[TAG_OUT])?;
    let fields = split_fields(rest, 3)?;
    Some((to_str(fields[0])?, to_str(fields[1])?, to_str(fields[2])?))
}

// --- Incoming edges: I\0<to>\0<type>\0<from> -> empty ---------------------

pub fn in_key(to: &str, type_: &str, from: &str) -> Vec<u8> {
    let mut buf = vec![TAG_IN];
    push_field(&mut buf, to);
    push_field(&mut buf, type_);
    push_field(&mut buf, from);
    buf
}

pub fn in_scan_prefix(to: &str, type_: &str) -> Vec<u8> {
    let mut buf = vec![TAG_IN];
    push_field(&mut buf, to);
    push_field(&mut buf, type_);
    buf.push(SEP);
    buf
}

pub fn in_node_scan_prefix(to: &str) -> Vec<u8> {
    let mut buf = vec![TAG_IN];
    push_field(&mut buf, to);
    buf.push(SEP);
    buf
}

pub fn decode_in_key(key: &[u8]) -> Option<(String, String, String)> {
    let rest = key.strip_prefix(&[TAG_IN])?;
    let fields = split_fields(rest, 3)?;
    Some((to_str(fields[0])?, to_str(fields[1])?, to_str(fields[2])?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_key_round_trips() {
        let key = node_key("Mark");
        assert_eq!(decode_node_key(&key).as_deref(), Some("Mark"));
    }

    #[test]
    fn label_key_round_trips() {
        let key = label_key("Person", "Mark");
        assert_eq!(
            decode_label_key(&key),
            Some(("Person".to_string(), "Mark".to_string()))
        );
    }

    #[test]
    fn out_key_round_trips() {
        let key = out_key("Mark", "FRIEND", "Alex");
        assert_eq!(
            decode_out_key(&key),
            Some(("Mark".to_string(), "FRIEND".to_string(), "Alex".to_string()))
        );
    }

    #[test]
    fn out_scan_prefix_is_a_true_byte_prefix_of_matching_keys() {
        let prefix = out_scan_prefix("Mark", "FRIEND");
        let key = out_key("Mark", "FRIEND", "Alex");
        assert!(key.starts_with(&prefix));

        let other = out_key("Mark", "FRIENDLY", "Alex");
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn label_scan_prefix_does_not_bleed_across_adjacent_labels() {
        let prefix = label_scan_prefix("Person");
        assert!(!label_key("PersonX", "Mark").starts_with(&prefix));
        assert!(label_key("Person", "Mark").starts_with(&prefix));
    }

    #[test]
    fn families_never_collide() {
        let n = node_key("x");
        let l = label_key("x", "y");
        let o = out_key("x", "y", "z");
        let i = in_key("x", "y", "z");
        assert_ne!(n[0], l[0]);
        assert_ne!(l[0], o[0]);
        assert_ne!(o[0], i[0]);
    }
}
