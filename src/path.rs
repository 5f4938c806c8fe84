//! Dotted-path addressing into nested [`Value`]s.
//!
//! A path like `"user.tags.0"` walks map keys and array indices. Reads are
//! forgiving (any structural mismatch is simply "not found"); writes and
//! deletes report what went wrong and never grow an array to fit an index.

use serde_json::Value;
use thiserror::Error;

use crate::types::value::{kind, Kind};

#[derive(Debug, Error)]
pub enum PathError {
    #[error("path '{path}' not found")]
    NotFound { path: String },

    #[error("segment '{segment}' is not a valid array index at '{path}'")]
    InvalidIndex { segment: String, path: String },

    #[error("index {index} out of range (len {len}) at '{path}'")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        path: String,
    },

    #[error("cannot address '{path}' inside {root} value")]
    Unsupported { root: Kind, path: String },
}

fn is_root(path: &str) -> bool {
    path.is_empty() || path == "."
}

/// Read the value at `path`. Returns `None` for any missing key, bad or
/// out-of-range index, or scalar encountered mid-path.
#[must_use]
pub fn read<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if is_root(path) {
        return Some(root);
    }
    let mut cur = root;
    for segment in path.split('.') {
        cur = match cur {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Write `value` at `path`, upserting a map key or overwriting an in-range
/// array slot. The parent of the final segment must already exist.
///
/// # Errors
///
/// Returns [`PathError`] if the traversal hits a missing key, a scalar, or
/// an index that does not parse or is out of range. Arrays are never grown.
pub fn write(root: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    if is_root(path) {
        *root = value;
        return Ok(());
    }
    let root_kind = kind(root);
    let (parent_path, last) = match path.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, path),
    };
    let parent = match parent_path {
        Some(p) => descend_mut(root, p, root_kind)?,
        None => root,
    };
    match parent {
        Value::Object(map) => {
            map.insert(last.to_owned(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index: usize = last.parse().map_err(|_| PathError::InvalidIndex {
                segment: last.to_owned(),
                path: path.to_owned(),
            })?;
            let len = items.len();
            match items.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(PathError::IndexOutOfRange {
                    index,
                    len,
                    path: path.to_owned(),
                }),
            }
        }
        _ => Err(PathError::Unsupported {
            root: root_kind,
            path: path.to_owned(),
        }),
    }
}

/// Remove the map key at `path`. Removing an absent key is a no-op; any
/// other target kind (array element, scalar) is unsupported.
///
/// # Errors
///
/// Returns [`PathError`] on traversal failure or a non-map parent.
pub fn delete(root: &mut Value, path: &str) -> Result<(), PathError> {
    let root_kind = kind(root);
    if is_root(path) {
        return Err(PathError::Unsupported {
            root: root_kind,
            path: path.to_owned(),
        });
    }
    let (parent_path, last) = match path.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, path),
    };
    let parent = match parent_path {
        Some(p) => descend_mut(root, p, root_kind)?,
        None => root,
    };
    match parent {
        Value::Object(map) => {
            map.remove(last);
            Ok(())
        }
        _ => Err(PathError::Unsupported {
            root: root_kind,
            path: path.to_owned(),
        }),
    }
}

/// Walk to the node at `path`, mutably. Reports the sub-path that failed.
fn descend_mut<'a>(
    root: &'a mut Value,
    path: &str,
    root_kind: Kind,
) -> Result<&'a mut Value, PathError> {
    let mut cur = root;
    let mut walked = String::new();
    for segment in path.split('.') {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);
        cur = match cur {
            Value::Object(map) => map.get_mut(segment).ok_or_else(|| PathError::NotFound {
                path: walked.clone(),
            })?,
            Value::Array(items) => {
                let index: usize = segment.parse().map_err(|_| PathError::InvalidIndex {
                    segment: segment.to_owned(),
                    path: walked.clone(),
                })?;
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or_else(|| PathError::IndexOutOfRange {
                        index,
                        len,
                        path: walked.clone(),
                    })?
            }
            _ => {
                return Err(PathError::Unsupported {
                    root: root_kind,
                    path: walked,
                })
            }
        };
    }
    Ok(cur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_map_key() {
        let v = json!({"user": {"age": 25}});
        assert_eq!(read(&v, "user.age"), Some(&json!(25)));
    }

    #[test]
    fn read_array_index() {
        let v = json!({"tags": ["a", "b"]});
        assert_eq!(read(&v, "tags.1"), Some(&json!("b")));
    }

    #[test]
    fn read_root() {
        let v = json!({"k": 1});
        assert_eq!(read(&v, ""), Some(&v));
        assert_eq!(read(&v, "."), Some(&v));
    }

    #[test]
    fn read_missing_returns_none() {
        let v = json!({"user": {"age": 25}});
        assert_eq!(read(&v, "user.name"), None);
        assert_eq!(read(&v, "nope"), None);
        assert_eq!(read(&v, "user.age.deeper"), None);
    }

    #[test]
    fn read_bad_index_returns_none() {
        let v = json!({"tags": ["a"]});
        assert_eq!(read(&v, "tags.x"), None);
        assert_eq!(read(&v, "tags.5"), None);
        assert_eq!(read(&v, "tags.-1"), None);
    }

    #[test]
    fn write_then_read_map() {
        let mut v = json!({"user": {}});
        write(&mut v, "user.name", json!("alice")).unwrap();
        assert_eq!(read(&v, "user.name"), Some(&json!("alice")));
    }

    #[test]
    fn write_upserts_top_level_key() {
        let mut v = json!({});
        write(&mut v, "flag", json!(true)).unwrap();
        assert_eq!(v, json!({"flag": true}));
    }

    #[test]
    fn write_array_slot_in_range() {
        let mut v = json!({"tags": ["a", "b"]});
        write(&mut v, "tags.0", json!("z")).unwrap();
        assert_eq!(v, json!({"tags": ["z", "b"]}));
    }

    #[test]
    fn write_array_out_of_range_leaves_unmodified() {
        let mut v = json!({"tags": ["a"]});
        let err = write(&mut v, "tags.3", json!("z")).unwrap_err();
        assert!(matches!(
            err,
            PathError::IndexOutOfRange { index: 3, len: 1, .. }
        ));
        assert_eq!(v, json!({"tags": ["a"]}));
    }

    #[test]
    fn write_non_numeric_index_is_error() {
        let mut v = json!(["a"]);
        let err = write(&mut v, "x", json!(1)).unwrap_err();
        assert!(matches!(err, PathError::InvalidIndex { .. }));
    }

    #[test]
    fn write_missing_parent_is_error() {
        let mut v = json!({"user": {}});
        let err = write(&mut v, "user.profile.age", json!(1)).unwrap_err();
        match err {
            PathError::NotFound { path } => assert_eq!(path, "user.profile"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn write_through_scalar_names_root_kind() {
        let mut v = json!("scalar");
        let err = write(&mut v, "a.b", json!(1)).unwrap_err();
        assert_eq!(err.to_string(), "cannot address 'a' inside string value");
    }

    #[test]
    fn write_root_replaces_value() {
        let mut v = json!({"old": 1});
        write(&mut v, "", json!({"new": 2})).unwrap();
        assert_eq!(v, json!({"new": 2}));
    }

    #[test]
    fn delete_map_key() {
        let mut v = json!({"k": "v"});
        delete(&mut v, "k").unwrap();
        assert_eq!(v, json!({}));
    }

    #[test]
    fn delete_nested_map_key() {
        let mut v = json!({"user": {"name": "alice", "age": 25}});
        delete(&mut v, "user.name").unwrap();
        assert_eq!(v, json!({"user": {"age": 25}}));
    }

    #[test]
    fn delete_absent_key_is_noop() {
        let mut v = json!({"k": 1});
        delete(&mut v, "missing").unwrap();
        assert_eq!(v, json!({"k": 1}));
    }

    #[test]
    fn delete_array_element_unsupported() {
        let mut v = json!({"tags": ["a", "b"]});
        let err = delete(&mut v, "tags.0").unwrap_err();
        assert!(matches!(err, PathError::Unsupported { .. }));
        assert_eq!(v, json!({"tags": ["a", "b"]}));
    }

    #[test]
    fn delete_root_unsupported() {
        let mut v = json!({"k": 1});
        assert!(matches!(
            delete(&mut v, "."),
            Err(PathError::Unsupported { .. })
        ));
    }
}
