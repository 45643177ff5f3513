//! Nested error tree
//!
//! Errors are keyed exactly like the rules that produced them. A plain field
//! maps to a leaf bag of `code -> message`; a nested validator or a record
//! iterator maps to another [`ErrorTree`], one level per nesting depth.
//!
//! ```text
//! {
//!   "name":    { "required": "The name field is required." },
//!   "address": { "city": { "required": "The city field is required." } },
//!   "items":   { "1": { "sku": { "min": "..." } } }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

/// Error messages of a single field, keyed by error code.
pub type ErrorBag = IndexMap<String, String>;

/// One entry in an [`ErrorTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorNode {
    /// Errors of a plain field.
    Leaf(ErrorBag),
    /// Errors of a nested structure.
    Tree(ErrorTree),
}

impl ErrorNode {
    /// Returns the leaf bag, if this is a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&ErrorBag> {
        match self {
            Self::Leaf(bag) => Some(bag),
            Self::Tree(_) => None,
        }
    }

    /// Returns the subtree, if this is a nested node.
    #[must_use]
    pub fn as_tree(&self) -> Option<&ErrorTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }

    /// Counts the messages below this node.
    #[must_use]
    pub fn error_count(&self) -> usize {
        match self {
            Self::Leaf(bag) => bag.len(),
            Self::Tree(tree) => tree.error_count(),
        }
    }
}

/// Recursive map of field key to errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorTree {
    entries: IndexMap<String, ErrorNode>,
}

impl ErrorTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field has errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of top-level keys carrying errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of messages in the tree.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries.values().map(ErrorNode::error_count).sum()
    }

    /// Looks up the errors stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ErrorNode> {
        self.entries.get(key)
    }

    /// Follows a path of keys through nested nodes.
    #[must_use]
    pub fn get_path<'a>(&self, path: impl IntoIterator<Item = &'a str>) -> Option<&ErrorNode> {
        let mut path = path.into_iter();
        let mut node = self.entries.get(path.next()?)?;
        for segment in path {
            node = node.as_tree()?.entries.get(segment)?;
        }
        Some(node)
    }

    /// Returns true if `key` carries errors.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over top-level entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Stores a leaf bag under `key`. Empty bags are ignored.
    pub fn insert_leaf(&mut self, key: impl Into<String>, bag: ErrorBag) {
        if !bag.is_empty() {
            self.entries.insert(key.into(), ErrorNode::Leaf(bag));
        }
    }

    /// Stores a subtree under `key`. Empty subtrees are ignored.
    pub fn insert_tree(&mut self, key: impl Into<String>, tree: ErrorTree) {
        if !tree.is_empty() {
            self.entries.insert(key.into(), ErrorNode::Tree(tree));
        }
    }

    /// Flattens the tree into `"path[sub][sub]" -> message`.
    ///
    /// Only the first message of each leaf is kept.
    #[must_use]
    pub fn flatten(&self) -> IndexMap<String, String> {
        let mut out = IndexMap::new();
        self.walk(None, &mut |path, bag| {
            if let Some(message) = bag.values().next() {
                out.insert(path, message.clone());
            }
        });
        out
    }

    /// Lists the flattened paths of every failing leaf.
    #[must_use]
    pub fn failing_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.walk(None, &mut |path, _| out.push(path));
        out
    }

    /// Converts the tree into a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn walk(&self, prefix: Option<&str>, visit: &mut impl FnMut(String, &ErrorBag)) {
        for (key, node) in &self.entries {
            let path = match prefix {
                Some(prefix) => format!("{prefix}[{key}]"),
                None => key.clone(),
            };
            match node {
                ErrorNode::Leaf(bag) => visit(path, bag),
                ErrorNode::Tree(tree) => tree.walk(Some(&path), visit),
            }
        }
    }
}

impl<'a> IntoIterator for &'a ErrorTree {
    type Item = (&'a String, &'a ErrorNode);
    type IntoIter = indexmap::map::Iter<'a, String, ErrorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
