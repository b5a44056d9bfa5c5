/*
 * Arena-backed project tree. Nodes live in one vector and refer to each other
 * by index; removing a subtree empties its slots instead of shifting the
 * arena, so outstanding `NodeId`s for other nodes stay valid.
 */

use super::RequestSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// `Some` for request leaves, `None` for folders.
    pub request: Option<RequestSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTree {
    nodes: Vec<Option<ProjectNode>>,
}

impl ProjectTree {
    pub fn new(name: &str) -> Self {
        Self {
            nodes: vec![Some(ProjectNode {
                name: name.to_string(),
                parent: None,
                children: Vec::new(),
                request: None,
            })],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn name(&self) -> &str {
        self.node(self.root()).map_or("", |n| n.name.as_str())
    }

    pub fn node(&self, id: NodeId) -> Option<&ProjectNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn rename(&mut self, id: NodeId, name: &str) -> bool {
        match self.nodes.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => {
                node.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn add_folder(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.insert(parent, name, None)
    }

    pub fn add_request(
        &mut self,
        parent: NodeId,
        name: &str,
        spec: RequestSpec,
    ) -> Option<NodeId> {
        self.insert(parent, name, Some(spec))
    }

    fn insert(
        &mut self,
        parent: NodeId,
        name: &str,
        request: Option<RequestSpec>,
    ) -> Option<NodeId> {
        // Requests are leaves.
        if self.node(parent)?.request.is_some() {
            return None;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(ProjectNode {
            name: name.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            request,
        }));
        if let Some(p) = self.nodes[parent.0].as_mut() {
            p.children.push(id);
        }
        Some(id)
    }

    /// Detaches `id` and its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root() {
            return false;
        }
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(p) = self.nodes[parent.0].as_mut() {
            p.children.retain(|c| *c != id);
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
        true
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Slash-joined names from the root down to `id`.
    pub fn path(&self, id: NodeId) -> Option<String> {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            parts.push(node.name.as_str());
            cursor = node.parent;
        }
        parts.reverse();
        Some(parts.join("/"))
    }

    /// Depth-first walk yielding `(depth, id)` pairs, root first.
    fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, self.root())];
        while let Some((depth, id)) = stack.pop() {
            out.push((depth, id));
            for child in self.children(id).iter().rev() {
                stack.push((depth + 1, *child));
            }
        }
        out
    }

    /// One line per node, indented two spaces per level.
    pub fn outline(&self) -> Vec<String> {
        self.walk()
            .into_iter()
            .filter_map(|(depth, id)| {
                let node = self.node(id)?;
                Some(format!("{}{}", "  ".repeat(depth), node.name))
            })
            .collect()
    }

    /// All request leaves in depth-first order.
    pub fn requests(&self) -> Vec<(NodeId, &RequestSpec)> {
        self.walk()
            .into_iter()
            .filter_map(|(_, id)| Some((id, self.node(id)?.request.as_ref()?)))
            .collect()
    }
}
