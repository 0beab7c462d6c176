use std::collections::BTreeMap;

use crate::view::{Node, fragment_html};

/// Named containers holding serialized markup. Every update replaces a
/// container's content wholesale.
#[derive(Debug, Default, Clone)]
pub struct Surface {
    containers: BTreeMap<String, String>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `id`'s content and reports whether the markup changed.
    pub fn replace(&mut self, id: &str, nodes: &[Node]) -> bool {
        let html = fragment_html(nodes);
        match self.containers.get(id) {
            Some(current) if *current == html => false,
            _ => {
                self.containers.insert(id.to_string(), html);
                true
            }
        }
    }

    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.replace(id, &[Node::text(text)])
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.containers.get(id).map(String::as_str)
    }
}
