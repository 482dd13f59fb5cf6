/// Accessibility tree representation of a mounted page

#[derive(Debug, Clone, PartialEq)]
pub struct AccessibilityNode {
    pub id: String,
    pub role: String,
    pub name: Option<String>,
    pub children: Vec<AccessibilityNode>,
}

impl AccessibilityNode {
    pub fn new(id: impl Into<String>, role: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            name,
            children: Vec::new(),
        }
    }

    /// Depth-first search for the first node with `role`
    pub fn find_role(&self, role: &str) -> Option<&AccessibilityNode> {
        if self.role == role {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_role(role))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccessibilityTree {
    pub root_id: Option<String>,
    pub nodes: Vec<AccessibilityNode>,
}

impl AccessibilityTree {
    /// Named regions in document order; one per slide block on a slide page.
    pub fn regions(&self) -> Vec<&AccessibilityNode> {
        let mut out = Vec::new();
        for node in &self.nodes {
            collect_role(node, "region", &mut out);
        }
        out
    }

    /// Indented `role "name"` outline, one node per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_outline(node, 0, &mut out);
        }
        out
    }
}

fn collect_role<'a>(node: &'a AccessibilityNode, role: &str, out: &mut Vec<&'a AccessibilityNode>) {
    if node.role == role {
        out.push(node);
    }
    for child in &node.children {
        collect_role(child, role, out);
    }
}

fn write_outline(node: &AccessibilityNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&node.role);
    if let Some(name) = &node.name {
        out.push_str(" \"");
        out.push_str(name);
        out.push('"');
    }
    out.push('\n');
    for child in &node.children {
        write_outline(child, depth + 1, out);
    }
}

pub trait AccessibilityProvider {
    /// Export a reproducible accessibility tree snapshot
    fn export_tree(&self) -> AccessibilityTree;
}
