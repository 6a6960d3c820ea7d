//! Command tree with per-node flag defaults.
//!
//! Each [`CommandNode`] carries a local overlay of flag defaults. Looking up a
//! flag for an invoked command walks from that node up to the root, so a
//! command's own default shadows the persisted value held at the root without
//! ever touching its siblings.

use std::collections::BTreeMap;

use crate::output::{Outputs, OUTPUT_FORMAT_KEY};

/// One command (or command group) and its output declaration.
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub name: &'static str,
    pub outputs: Outputs,
    local: BTreeMap<&'static str, String>,
    children: Vec<CommandNode>,
}

impl CommandNode {
    pub const fn new(name: &'static str, outputs: Outputs) -> Self {
        Self {
            name,
            outputs,
            local: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn child(mut self, node: Self) -> Self {
        self.children.push(node);
        self
    }

    /// Value set on this node itself, ignoring ancestors.
    pub fn local(&self, key: &str) -> Option<&str> {
        self.local.get(key).map(String::as_str)
    }

    pub fn set_local(&mut self, key: &'static str, value: impl Into<String>) {
        self.local.insert(key, value.into());
    }

    /// Install this node's output-format default, then recurse.
    ///
    /// Data-default nodes follow the persisted value and get no entry. An
    /// entry that already exists is left alone, so applying twice changes
    /// nothing.
    pub fn apply_defaults(&mut self) {
        if let Some(fixed) = self.outputs.default.fixed_format() {
            if !self.local.contains_key(OUTPUT_FORMAT_KEY) {
                self.local.insert(OUTPUT_FORMAT_KEY, fixed.as_str().to_string());
            }
        }
        for child in &mut self.children {
            child.apply_defaults();
        }
    }

    fn walk<'a>(&'a self, prefix: &mut Vec<&'static str>, visit: &mut dyn FnMut(&[&'static str], &'a Self)) {
        prefix.push(self.name);
        visit(&prefix[1..], self);
        for child in &self.children {
            child.walk(prefix, visit);
        }
        prefix.pop();
    }
}

/// The whole command tree, rooted at the program node.
#[derive(Debug, Clone)]
pub struct CommandTree {
    root: CommandNode,
}

impl CommandTree {
    /// Build the tree: the persisted output format goes on the root, then
    /// every node installs its own default.
    pub fn new(persisted_format: &str, mut root: CommandNode) -> Self {
        root.set_local(OUTPUT_FORMAT_KEY, persisted_format);
        for child in &mut root.children {
            child.apply_defaults();
        }
        Self { root }
    }

    /// Node at `path` below the root (`["org", "details"]`). The empty path is the root.
    pub fn find(&self, path: &[&str]) -> Option<&CommandNode> {
        path.iter().try_fold(&self.root, |node, name| {
            node.children.iter().find(|c| c.name == *name)
        })
    }

    /// Effective value of `key` for the command at `path`: the deepest local
    /// entry along the path wins.
    pub fn lookup(&self, path: &[&str], key: &str) -> Option<&str> {
        let mut chain = vec![&self.root];
        let mut node = &self.root;
        for name in path {
            node = node.children.iter().find(|c| c.name == *name)?;
            chain.push(node);
        }
        chain.iter().rev().find_map(|n| n.local(key))
    }

    /// Every node below the root with its path, depth first.
    pub fn nodes(&self) -> Vec<(Vec<&'static str>, &CommandNode)> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.root.walk(&mut prefix, &mut |path, node| {
            if !path.is_empty() {
                out.push((path.to_vec(), node));
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{resolve, OutputType};

    const SHORT_ONLY: Outputs = Outputs::new(OutputType::Short, &[OutputType::Short]);

    fn build(children: Vec<CommandNode>) -> CommandTree {
        let root = children
            .into_iter()
            .fold(CommandNode::new("scout", Outputs::DATA_ONLY), CommandNode::child);
        CommandTree::new("json", root)
    }

    #[test]
    fn test_short_default_shadows_persisted_format() {
        let tree = build(vec![
            CommandNode::new("completion", SHORT_ONLY),
            CommandNode::new("view", Outputs::ANY),
        ]);

        assert_eq!(tree.lookup(&["completion"], OUTPUT_FORMAT_KEY), Some("short"));
        assert_eq!(tree.lookup(&["view"], OUTPUT_FORMAT_KEY), Some("json"));
        assert_eq!(tree.lookup(&[], OUTPUT_FORMAT_KEY), Some("json"));
    }

    #[test]
    fn test_siblings_are_isolated_in_any_build_order() {
        for order in [["completion", "view"], ["view", "completion"]] {
            let nodes = order
                .iter()
                .map(|name| match *name {
                    "completion" => CommandNode::new("completion", SHORT_ONLY),
                    _ => CommandNode::new("view", Outputs::ANY),
                })
                .collect();
            let tree = build(nodes);

            assert_eq!(tree.find(&["view"]).unwrap().local(OUTPUT_FORMAT_KEY), None);
            assert_eq!(tree.lookup(&["view"], OUTPUT_FORMAT_KEY), Some("json"));
            assert_eq!(tree.lookup(&["completion"], OUTPUT_FORMAT_KEY), Some("short"));
        }
    }

    #[test]
    fn test_apply_defaults_is_idempotent() {
        let mut node = CommandNode::new("config", Outputs::DATA_ONLY)
            .child(CommandNode::new("path", SHORT_ONLY))
            .child(CommandNode::new("show", Outputs::new(OutputType::Short, &[OutputType::Data, OutputType::Short])));
        node.apply_defaults();
        let once = format!("{node:?}");
        node.apply_defaults();
        assert_eq!(format!("{node:?}"), once);
    }

    #[test]
    fn test_existing_local_value_is_kept() {
        let mut node = CommandNode::new("completion", SHORT_ONLY);
        node.set_local(OUTPUT_FORMAT_KEY, "template");
        node.apply_defaults();
        assert_eq!(node.local(OUTPUT_FORMAT_KEY), Some("template"));
    }

    #[test]
    fn test_explicit_flag_passes_through_shadowed_default() {
        let tree = build(vec![CommandNode::new("completion", SHORT_ONLY)]);
        let node = tree.find(&["completion"]).unwrap();
        let persisted = tree.lookup(&["completion"], OUTPUT_FORMAT_KEY).unwrap();

        let requested = resolve(persisted, node.outputs.default, Some("json"));
        assert_eq!(requested, "json");
        assert!(crate::output::validate(&requested, node.outputs.supported).is_err());
    }

    #[test]
    fn test_unknown_path() {
        let tree = build(vec![CommandNode::new("view", Outputs::ANY)]);
        assert!(tree.find(&["nope"]).is_none());
        assert_eq!(tree.lookup(&["view", "nope"], OUTPUT_FORMAT_KEY), None);
    }

    #[test]
    fn test_nodes_lists_paths_depth_first() {
        let tree = build(vec![
            CommandNode::new("org", Outputs::DATA_ONLY).child(CommandNode::new("details", Outputs::ANY)),
            CommandNode::new("credits", SHORT_ONLY),
        ]);
        let paths: Vec<_> = tree.nodes().into_iter().map(|(p, _)| p.join(" ")).collect();
        assert_eq!(paths, ["org", "org details", "credits"]);
    }
}
