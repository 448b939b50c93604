//! Tree compositor: flat parent-pointer list in, nested render order out.
//!
//! Components are addressed by list index throughout, so duplicate ids and
//! cycles never confuse the traversal. Every input component lands in the
//! output tree exactly once.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::escape;
use pagecraft_model::Component;
use std::collections::{HashMap, HashSet};

/// Nodes deeper than this are flattened under their ancestor at the limit
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone)]
pub struct Node<'a> {
    pub component: &'a Component,
    /// Position in the input list
    pub index: usize,
    /// Unique DOM id for this node's markup
    pub dom_id: String,
    pub children: Vec<Node<'a>>,
}

impl Node<'_> {
    /// Number of nodes in this subtree, self included
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Composition<'a> {
    pub roots: Vec<Node<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Composition<'_> {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }
}

struct Arena<'a> {
    components: &'a [Component],
    /// Resolved parent index; `None` for roots and orphans
    parent: Vec<Option<usize>>,
    /// parent index -> child indices, sorted by (column, order, list position)
    children: HashMap<usize, Vec<usize>>,
    dom_ids: Vec<String>,
    placed: Vec<bool>,
    diagnostics: Vec<Diagnostic>,
}

/// Compose a flat component list into an ordered forest
pub fn compose(components: &[Component]) -> Composition<'_> {
    let mut arena = Arena::new(components);

    let mut roots: Vec<usize> = (0..components.len())
        .filter(|&i| arena.parent[i].is_none())
        .collect();
    sort_siblings(components, &mut roots);

    let mut out = Vec::with_capacity(roots.len());
    for index in roots {
        let mut ancestors = HashSet::new();
        out.push(arena.build(index, 0, &mut ancestors));
    }

    // whatever is left hangs off a parent cycle
    while let Some(start) = arena.placed.iter().position(|placed| !placed) {
        let promoted = arena.break_cycle(start);
        let mut ancestors = HashSet::new();
        out.push(arena.build(promoted, 0, &mut ancestors));
    }

    Composition {
        roots: out,
        diagnostics: arena.diagnostics,
    }
}

fn sort_siblings(components: &[Component], indices: &mut [usize]) {
    // stable: equal keys keep list position
    indices.sort_by_key(|&i| (components[i].column, components[i].order));
}

impl<'a> Arena<'a> {
    fn new(components: &'a [Component]) -> Self {
        let mut diagnostics = Vec::new();

        let mut first_index: HashMap<&str, usize> = HashMap::new();
        let mut dom_ids = Vec::with_capacity(components.len());
        let mut used_dom_ids: HashSet<String> = HashSet::new();
        for (i, component) in components.iter().enumerate() {
            let base = escape::dom_id(&component.id);
            let mut dom_id = base.clone();
            let mut n = 2;
            while used_dom_ids.contains(&dom_id) {
                dom_id = format!("{}-{}", base, n);
                n += 1;
            }
            if first_index.contains_key(component.id.as_str()) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::DuplicateId,
                    &component.id,
                    format!(
                        "id '{}' is used more than once; this copy renders as '{}'",
                        component.id, dom_id
                    ),
                ));
            } else {
                first_index.insert(component.id.as_str(), i);
            }
            used_dom_ids.insert(dom_id.clone());
            dom_ids.push(dom_id);
        }

        let mut parent = Vec::with_capacity(components.len());
        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, component) in components.iter().enumerate() {
            let resolved = match component.parent_id.as_deref() {
                None => None,
                Some(pid) => match first_index.get(pid) {
                    Some(&p) => Some(p),
                    None => {
                        tracing::debug!(component = %component.id, parent = pid, "orphan moved to root");
                        diagnostics.push(Diagnostic::warning(
                            DiagnosticKind::Orphan,
                            &component.id,
                            format!("parent '{}' does not exist; rendered at the document root", pid),
                        ));
                        None
                    }
                },
            };
            if let Some(p) = resolved {
                children.entry(p).or_default().push(i);
            }
            parent.push(resolved);
        }
        for list in children.values_mut() {
            sort_siblings(components, list);
        }

        Self {
            components,
            parent,
            children,
            dom_ids,
            placed: vec![false; components.len()],
            diagnostics,
        }
    }

    fn node(&self, index: usize, children: Vec<Node<'a>>) -> Node<'a> {
        Node {
            component: &self.components[index],
            index,
            dom_id: self.dom_ids[index].clone(),
            children,
        }
    }

    fn build(&mut self, index: usize, depth: usize, ancestors: &mut HashSet<usize>) -> Node<'a> {
        self.placed[index] = true;
        ancestors.insert(index);

        let child_indices = self.children.get(&index).cloned().unwrap_or_default();

        let children = if depth + 1 >= MAX_DEPTH && !child_indices.is_empty() {
            let flattened = self.flatten(&child_indices, ancestors);
            self.diagnostics.push(Diagnostic::warning(
                DiagnosticKind::DepthLimit,
                &self.components[index].id,
                format!(
                    "nesting deeper than {} levels; {} descendant(s) flattened into this component",
                    MAX_DEPTH,
                    flattened.len()
                ),
            ));
            flattened
                .into_iter()
                .map(|i| self.node(i, Vec::new()))
                .collect()
        } else {
            let mut children = Vec::with_capacity(child_indices.len());
            for child in child_indices {
                if ancestors.contains(&child) || self.placed[child] {
                    // back edge into the promoted cycle member
                    tracing::debug!(
                        parent = %self.components[index].id,
                        child = %self.components[child].id,
                        "dropped cyclic edge"
                    );
                    continue;
                }
                children.push(self.build(child, depth + 1, ancestors));
            }
            children
        };

        ancestors.remove(&index);
        self.node(index, children)
    }

    /// Pre-order walk of everything below the depth limit, without recursion
    fn flatten(&mut self, start: &[usize], ancestors: &HashSet<usize>) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = start.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            if self.placed[i] || ancestors.contains(&i) {
                continue;
            }
            self.placed[i] = true;
            out.push(i);
            if let Some(kids) = self.children.get(&i) {
                stack.extend(kids.iter().rev().copied());
            }
        }
        out
    }

    /// Find the cycle above `start` and return its member with the lowest
    /// list position, which becomes a root.
    fn break_cycle(&mut self, start: usize) -> usize {
        let mut seen = HashSet::new();
        let mut current = start;
        while seen.insert(current) {
            match self.parent[current] {
                Some(p) if !self.placed[p] => current = p,
                // chain ends at something already placed; cannot happen for an
                // unreachable node, but promote it rather than loop
                _ => return self.promote(start, &[start]),
            }
        }

        let mut members = vec![current];
        let mut next = self.parent[current];
        while let Some(p) = next {
            if p == current {
                break;
            }
            members.push(p);
            next = self.parent[p];
        }
        let promoted = members.iter().copied().min().unwrap_or(current);
        self.promote(promoted, &members)
    }

    fn promote(&mut self, index: usize, members: &[usize]) -> usize {
        let mut ids: Vec<&str> = members
            .iter()
            .map(|&i| self.components[i].id.as_str())
            .collect();
        ids.sort_unstable();
        let id = &self.components[index].id;
        tracing::debug!(component = %id, cycle = ?ids, "cycle member promoted to root");
        let message = if members.len() == 1 {
            "component is its own parent; rendered at the document root".to_string()
        } else {
            format!(
                "parent chain loops through [{}]; rendered at the document root",
                ids.join(", ")
            )
        };
        self.diagnostics
            .push(Diagnostic::warning(DiagnosticKind::Cycle, id, message));
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(nodes: &[Node]) -> Vec<String> {
        nodes.iter().map(|n| n.component.id.clone()).collect()
    }

    fn kinds(composition: &Composition) -> Vec<DiagnosticKind> {
        composition.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_siblings_sorted_by_column_then_order() {
        let components = vec![
            Component::new("root", "Columns"),
            Component::new("b", "Title").with_parent("root").with_position(1, 0),
            Component::new("a", "Title").with_parent("root").with_position(0, 5),
            Component::new("c", "Title").with_parent("root").with_position(0, 1),
        ];
        let composition = compose(&components);
        assert_eq!(ids(&composition.roots), vec!["root"]);
        assert_eq!(ids(&composition.roots[0].children), vec!["c", "a", "b"]);
        assert!(composition.diagnostics.is_empty());
    }

    #[test]
    fn test_ties_keep_list_position() {
        let components = vec![
            Component::new("x", "Spacer").with_position(0, 1),
            Component::new("y", "Spacer").with_position(0, 1),
            Component::new("z", "Spacer").with_position(0, 0),
        ];
        assert_eq!(ids(&compose(&components).roots), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_orphan_renders_at_root() {
        let components = vec![
            Component::new("a", "Div").with_position(0, 0),
            Component::new("lost", "Title").with_parent("gone").with_position(0, 1),
        ];
        let composition = compose(&components);
        assert_eq!(ids(&composition.roots), vec!["a", "lost"]);
        assert_eq!(kinds(&composition), vec![DiagnosticKind::Orphan]);
    }

    #[test]
    fn test_two_node_cycle_keeps_everything() {
        let components = vec![
            Component::new("keep", "Title"),
            Component::new("a", "Div").with_parent("b"),
            Component::new("b", "Div").with_parent("a"),
        ];
        let composition = compose(&components);
        assert_eq!(composition.node_count(), 3);
        assert_eq!(ids(&composition.roots), vec!["keep", "a"]);
        assert_eq!(ids(&composition.roots[1].children), vec!["b"]);
        assert!(composition.roots[1].children[0].children.is_empty());
        assert_eq!(kinds(&composition), vec![DiagnosticKind::Cycle]);
    }

    #[test]
    fn test_self_parent_is_promoted() {
        let components = vec![Component::new("me", "Div").with_parent("me")];
        let composition = compose(&components);
        assert_eq!(ids(&composition.roots), vec!["me"]);
        assert!(composition.roots[0].children.is_empty());
        assert_eq!(kinds(&composition), vec![DiagnosticKind::Cycle]);
    }

    #[test]
    fn test_subtree_hanging_off_cycle() {
        let components = vec![
            Component::new("leaf", "Title").with_parent("a"),
            Component::new("a", "Div").with_parent("b"),
            Component::new("b", "Div").with_parent("a"),
        ];
        let composition = compose(&components);
        assert_eq!(composition.node_count(), 3);
        // "a" is the lowest-positioned cycle member, "leaf" is not on the cycle
        assert_eq!(ids(&composition.roots), vec!["a"]);
        assert_eq!(ids(&composition.roots[0].children), vec!["leaf", "b"]);
    }

    #[test]
    fn test_duplicate_ids_get_distinct_dom_ids() {
        let components = vec![
            Component::new("hero", "Div"),
            Component::new("hero", "Div"),
            Component::new("child", "Title").with_parent("hero"),
        ];
        let composition = compose(&components);
        assert_eq!(composition.node_count(), 3);
        assert_eq!(composition.roots[0].dom_id, "pc-hero");
        assert_eq!(composition.roots[1].dom_id, "pc-hero-2");
        // children attach to the first occurrence
        assert_eq!(ids(&composition.roots[0].children), vec!["child"]);
        assert_eq!(kinds(&composition), vec![DiagnosticKind::DuplicateId]);
    }

    #[test]
    fn test_depth_limit_flattens() {
        let mut components = vec![Component::new("n0", "Div")];
        for i in 1..100 {
            components.push(Component::new(format!("n{}", i), "Div").with_parent(format!("n{}", i - 1)));
        }
        let composition = compose(&components);
        assert_eq!(composition.node_count(), 100);
        assert_eq!(kinds(&composition), vec![DiagnosticKind::DepthLimit]);

        let mut node = &composition.roots[0];
        let mut depth = 1;
        while node.children.len() == 1 {
            node = &node.children[0];
            depth += 1;
        }
        assert_eq!(depth, MAX_DEPTH);
        assert_eq!(node.children.len(), 100 - MAX_DEPTH);
    }

    #[test]
    fn test_empty_input() {
        let composition = compose(&[]);
        assert!(composition.roots.is_empty());
        assert!(composition.diagnostics.is_empty());
    }
}
