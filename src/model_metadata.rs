//! Class-name metadata embedded in classifier models.
//!
//! Exported classifier models carry their label table as a custom metadata
//! entry named `names`, formatted as a Python-style dict literal, e.g.
//! `{0: 'Aphids', 1: 'Ants'}`. Models without usable metadata still work;
//! classes then surface as `class_<id>`.

use log::{debug, warn};
use ort::session::Session;
use std::collections::HashMap;

const NAMES_METADATA_KEY: &str = "names";

/// Read the class-name table from a model's custom metadata.
///
/// Missing or malformed metadata yields an empty map rather than an error,
/// so analysis can proceed with index-based labels.
pub fn class_names_from_session(session: &Session) -> HashMap<usize, String> {
    let raw = match session
        .metadata()
        .and_then(|metadata| metadata.custom(NAMES_METADATA_KEY))
    {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("Model carries no '{NAMES_METADATA_KEY}' metadata, using class indices");
            return HashMap::new();
        }
        Err(e) => {
            warn!("Failed to read model metadata: {e}");
            return HashMap::new();
        }
    };

    match parse_names_dict(&raw) {
        Some(names) => {
            debug!("Loaded {} class names from model metadata", names.len());
            names
        }
        None => {
            warn!("Could not parse '{NAMES_METADATA_KEY}' metadata: {raw}");
            HashMap::new()
        }
    }
}

/// Resolve a class id to its display name, falling back to `class_<id>`.
pub fn display_name(class_names: &HashMap<usize, String>, class_id: usize) -> String {
    class_names
        .get(&class_id)
        .cloned()
        .unwrap_or_else(|| format!("class_{class_id}"))
}

/// Parse a dict literal of the form `{0: 'Name', 1: "Other"}`.
fn parse_names_dict(raw: &str) -> Option<HashMap<usize, String>> {
    let inner = raw.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.trim().is_empty() {
        return None;
    }

    let mut names = HashMap::new();
    for entry in split_entries(inner) {
        let (key, value) = entry.split_once(':')?;
        let id: usize = strip_quotes(key.trim()).parse().ok()?;
        names.insert(id, strip_quotes(value.trim()).to_string());
    }
    Some(names)
}

/// Split on top-level commas, leaving commas inside quoted names alone.
fn split_entries(s: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in s.chars() {
        match (ch, quote) {
            ('\'' | '"', None) => {
                quote = Some(ch);
                current.push(ch);
            }
            (_, Some(open)) if ch == open => {
                quote = None;
                current.push(ch);
            }
            (',', None) => {
                entries.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        entries.push(current);
    }
    entries
}

fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .or_else(|| {
            s.strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
        })
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_quoted_dict() {
        let names = parse_names_dict("{0: 'Aphids', 1: 'FleaBeetle', 2: 'Thrips'}").unwrap();
        assert_eq!(names.len(), 3);
        assert_eq!(names[&0], "Aphids");
        assert_eq!(names[&1], "FleaBeetle");
        assert_eq!(names[&2], "Thrips");
    }

    #[test]
    fn test_parse_double_quoted_and_spacing_variants() {
        let names = parse_names_dict(r#"{ 0 : "Ants",1:"Bees" }"#).unwrap();
        assert_eq!(names[&0], "Ants");
        assert_eq!(names[&1], "Bees");
    }

    #[test]
    fn test_parse_noncontiguous_ids() {
        let names = parse_names_dict("{0: 'Aphids', 7: 'Slug'}").unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[&7], "Slug");
    }

    #[test]
    fn test_parse_name_containing_comma() {
        let names = parse_names_dict("{0: 'Fly, fruit', 1: 'Ants'}").unwrap();
        assert_eq!(names[&0], "Fly, fruit");
        assert_eq!(names[&1], "Ants");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_names_dict("").is_none());
        assert!(parse_names_dict("{}").is_none());
        assert!(parse_names_dict("not a dict").is_none());
        assert!(parse_names_dict("{a: 'Aphids'}").is_none());
    }

    #[test]
    fn test_display_name_fallback() {
        let names = HashMap::from([(0, "Aphids".to_string())]);
        assert_eq!(display_name(&names, 0), "Aphids");
        assert_eq!(display_name(&names, 3), "class_3");
        assert_eq!(display_name(&HashMap::new(), 12), "class_12");
    }
}
