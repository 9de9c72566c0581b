//! Schema-driven comment injection support.
//!
//! The encoder can prepend block comments and append inline comments to
//! object members when pretty-printing. The comments come from a
//! [`CommentSchema`]: an adapter that produces a map from qualified key
//! path (`/a/b/c`, with the empty string as the root prefix) to the
//! member's comment lines. How that map is obtained is up to the adapter;
//! this module ships one that walks a JSON-Schema-like value tree, reading
//! `description` fields as block comments and `$comment` fields as inline
//! comments.

use rustc_hash::FxHashMap;

use quint_util::EncodeError;

use crate::value::{Map, Value};

/// Comments attached to one object member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberComments {
    /// Lines emitted as `// ...` above the member's key.
    pub block: Vec<String>,
    /// Line appended as `  // ...` after the member's value.
    pub inline: Option<String>,
}

/// Map from qualified key path to member comments.
pub type CommentMap = FxHashMap<String, MemberComments>;

/// Source of member comments for the encoder.
///
/// The core consumes exactly one operation: produce the complete
/// path-to-comments map. The encoder materializes it once per encode call
/// and only when pretty-printing is active.
pub trait CommentSchema {
    fn comment_map(&self) -> Result<CommentMap, EncodeError>;
}

impl CommentSchema for CommentMap {
    fn comment_map(&self) -> Result<CommentMap, EncodeError> {
        Ok(self.clone())
    }
}

/// A JSON-Schema-like value doubles as a comment schema: member comments
/// are read from the `description`/`$comment` fields of each property.
impl CommentSchema for Value {
    fn comment_map(&self) -> Result<CommentMap, EncodeError> {
        comment_map_from_schema(self)
    }
}

/// Extends a qualified key path by one member name.
pub fn extend_key_path(base: &str, key: &str) -> String {
    format!("{base}/{key}")
}

/// Builds a comment map from a JSON-Schema-like value tree.
///
/// For every entry of a `properties` object, the property's `description`
/// becomes the member's block comment (split on newlines) and its
/// `$comment` becomes the inline comment. Nested `properties` are walked
/// with `/`-extended key paths.
pub fn comment_map_from_schema(schema: &Value) -> Result<CommentMap, EncodeError> {
    let Some(root) = schema.as_object() else {
        return Err(EncodeError::InvalidSchema(
            "schema descriptor must be an object".to_string(),
        ));
    };
    let mut map = CommentMap::default();
    collect_properties(root, "", &mut map);
    Ok(map)
}

fn collect_properties(schema: &Map, path: &str, out: &mut CommentMap) {
    let Some(Value::Object(properties)) = schema.get("properties") else {
        return;
    };
    for (name, field) in properties {
        let Value::Object(field) = field else {
            continue;
        };
        let member_path = extend_key_path(path, name);

        let block: Vec<String> = match field.get("description") {
            Some(Value::Str(description)) => description.lines().map(str::to_string).collect(),
            _ => Vec::new(),
        };
        let inline = match field.get("$comment") {
            Some(Value::Str(comment)) => Some(comment.clone()),
            _ => None,
        };
        if !block.is_empty() || inline.is_some() {
            out.insert(
                member_path.clone(),
                MemberComments { block, inline },
            );
        }

        collect_properties(field, &member_path, out);
    }
}
