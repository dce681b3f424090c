//! Image path rewriting for response bodies.
//!
//! The walk runs over a `serde_json::Value`, which owns its children, so the
//! input is always a tree: no cycle can be built and no visited set is kept.
//! An explicit stack replaces recursion, so deep documents cannot overflow
//! the native stack.

use serde_json::{Map, Value};
use tracing::debug;

/// Image names shipped with the application's static assets
pub const DEFAULT_STATIC_IMAGES: &[&str] = &[
    "default-avatar.jpg",
    "default-preview.jpg",
    "apartment-01.jpg",
    "apartment-02.jpg",
    "apartment-03.jpg",
    "apartment-small-03.jpg",
    "apartment-small-04.jpg",
    "room.jpg",
    "studio-01.jpg",
];

/// Call `rewrite` on every object, at any depth, that holds the key `property`.
///
/// Depth-first over each object's own key order: when the walk reaches the
/// `property` key the object is rewritten right there, so subtrees under
/// earlier keys are handled first and subtrees under later keys after. The
/// value under `property` itself is never descended into, so `rewrite` runs
/// exactly once per matching object. Array elements are walked in index order
/// and indices are never matched as property names.
pub fn transform_property<F>(property: &str, data: &mut Value, mut rewrite: F)
where
    F: FnMut(&mut Map<String, Value>),
{
    // Frames hold paths instead of references so the containing object can be
    // borrowed mutably again once a sibling subtree is done
    let mut stack = vec![Frame {
        path: Vec::new(),
        entries: entries_of(data),
        next: 0,
    }];

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        let Some(step) = frame.entries.get(frame.next).cloned() else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let mut path = frame.path.clone();

        let Some(node) = node_at(data, &path) else {
            continue;
        };

        match step {
            Step::Key(key) if key == property => {
                if let Value::Object(object) = node {
                    rewrite(object);
                }
            }
            step => {
                let child = match &step {
                    Step::Key(key) => node.get(key.as_str()),
                    Step::Index(index) => node.get(*index),
                };
                if let Some(child) = child.filter(|child| is_container(child)) {
                    let entries = entries_of(child);
                    path.push(step);
                    stack.push(Frame {
                        path,
                        entries,
                        next: 0,
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    Key(String),
    Index(usize),
}

struct Frame {
    path: Vec<Step>,
    entries: Vec<Step>,
    next: usize,
}

fn entries_of(value: &Value) -> Vec<Step> {
    match value {
        Value::Object(object) => object.keys().cloned().map(Step::Key).collect(),
        Value::Array(items) => (0..items.len()).map(Step::Index).collect(),
        _ => Vec::new(),
    }
}

fn node_at<'v>(root: &'v mut Value, path: &[Step]) -> Option<&'v mut Value> {
    path.iter().try_fold(root, |node, step| match step {
        Step::Key(key) => node.get_mut(key.as_str()),
        Step::Index(index) => node.get_mut(*index),
    })
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Prefixes image values with the static or the upload base path
#[derive(Debug, Clone)]
pub struct PathRewriter {
    static_images: Vec<String>,
    static_base: String,
    upload_base: String,
}

impl PathRewriter {
    pub fn new(static_base: impl Into<String>, upload_base: impl Into<String>) -> Self {
        Self {
            static_images: DEFAULT_STATIC_IMAGES.iter().map(|name| name.to_string()).collect(),
            static_base: static_base.into(),
            upload_base: upload_base.into(),
        }
    }

    /// Replace the list of names that resolve to the static base path
    pub fn with_static_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.static_images = images.into_iter().map(Into::into).collect();
        self
    }

    /// Rewrite every `properties` value in `data`, in place.
    ///
    /// A string found in the static list takes the static base, anything else
    /// the upload base. An array value is mapped entry by entry and always
    /// takes the upload base, since the array itself is never a static name.
    /// Numbers and booleans are prefixed as text. Objects and null are left
    /// as they are.
    ///
    /// Not idempotent: a second pass prefixes the already prefixed paths again.
    pub fn transform_object<S: AsRef<str>>(&self, properties: &[S], data: &mut Value) {
        for property in properties {
            let property = property.as_ref();
            transform_property(property, data, |target| {
                if let Some(value) = target.get_mut(property) {
                    self.rewrite_value(property, value);
                }
            });
        }
    }

    fn rewrite_value(&self, property: &str, value: &mut Value) {
        let root = match &*value {
            Value::String(name) if self.is_static(name) => &self.static_base,
            _ => &self.upload_base,
        };

        let rewritten = match &*value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| Value::String(format!("{}/{}", root, plain_text(item))))
                    .collect(),
            ),
            Value::String(name) => Value::String(format!("{}/{}", root, name)),
            Value::Number(number) => Value::String(format!("{}/{}", root, number)),
            Value::Bool(flag) => Value::String(format!("{}/{}", root, flag)),
            Value::Object(_) | Value::Null => {
                debug!("Leaving non-path value of {:?} untouched", property);
                return;
            }
        };

        *value = rewritten;
    }

    fn is_static(&self, name: &str) -> bool {
        self.static_images.iter().any(|image| image == name)
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Rewrite `properties` in `data` using the default static image list
pub fn transform_object<S: AsRef<str>>(
    properties: &[S],
    static_path: &str,
    upload_path: &str,
    data: &mut Value,
) {
    PathRewriter::new(static_path, upload_path).transform_object(properties, data);
}
