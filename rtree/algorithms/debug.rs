use super::super::item::StoredItem;
use super::super::node::{NodeId, NodeKind};
use super::super::rectangle::Rectangle;
use super::super::rtree::RTree;
use serde::Serialize;
use std::io::{self, Write};

/// 用于JSON序列化的树结构
#[derive(Debug, Serialize)]
pub struct TreeVisualization<'a> {
    /// 根节点（空树为 None）
    pub root: Option<NodeVisualization<'a>>,
    /// 树的配置参数
    pub config: TreeConfig,
    pub depth: usize,
    pub len: usize,
}

/// 用于JSON序列化的树配置
#[derive(Debug, Serialize)]
pub struct TreeConfig {
    pub max_entries: usize,
    pub min_entries: usize,
}

/// 用于JSON序列化的节点结构
#[derive(Debug, Serialize)]
pub struct NodeVisualization<'a> {
    pub id: usize,
    /// 节点的最小边界矩形
    pub mbr: Rectangle,
    /// "leaf" 或 "internal"
    pub node_type: &'static str,
    /// 节点层级
    pub level: usize,
    /// 数据条目（仅叶子节点）
    pub items: Vec<&'a StoredItem>,
    /// 子节点（仅索引节点）
    pub children: Vec<NodeVisualization<'a>>,
}

/// 树结构不变量被破坏的具体情况
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("node {node}: stored MBR {stored} differs from recomputed MBR {computed}")]
    MbrMismatch {
        node: NodeId,
        stored: Rectangle,
        computed: Rectangle,
    },
    #[error("node {node} holds {size} entries, more than max {max}")]
    Overfull { node: NodeId, size: usize, max: usize },
    #[error("non-root node {node} holds {size} entries, fewer than min {min}")]
    Underfull { node: NodeId, size: usize, min: usize },
    #[error("node {node} has parent {found:?}, expected {expected:?}")]
    BrokenParentLink {
        node: NodeId,
        expected: Option<NodeId>,
        found: Option<NodeId>,
    },
    #[error("node {node} is at level {found}, expected {expected}")]
    LevelMismatch {
        node: NodeId,
        expected: usize,
        found: usize,
    },
    #[error("internal node {node} has no children")]
    EmptyInternalNode { node: NodeId },
    #[error("node {parent} references missing child {child}")]
    DanglingChild { parent: NodeId, child: NodeId },
}

/// R-tree调试功能实现
impl RTree {
    /// 以缩进文本形式输出整棵树
    ///
    /// 每层缩进两个空格，叶子节点下逐条列出数据条目。
    pub fn print_structure<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "--- R-Tree Structure ---")?;
        if self.is_empty() && self.root_node().is_leaf() {
            writeln!(out, "(Empty Tree)")?;
        } else {
            self.print_node(out, self.root(), 0)?;
        }
        writeln!(out, "------------------------")
    }

    fn print_node<W: Write>(&self, out: &mut W, id: NodeId, indent: usize) -> io::Result<()> {
        let indent_str = "  ".repeat(indent);
        let Some(node) = self.node(id) else {
            return writeln!(out, "{}  (missing node {})", indent_str, id);
        };

        writeln!(
            out,
            "{}[{} @ {}] MBR: {} Size: {}",
            indent_str,
            if node.is_leaf() { "LEAF" } else { "INTERNAL" },
            id.index(),
            node.mbr,
            node.size()
        )?;

        match &node.kind {
            NodeKind::Leaf(items) => {
                for item in items {
                    writeln!(out, "{}  - {}", indent_str, item)?;
                }
            }
            NodeKind::Internal(children) => {
                for &child in children {
                    self.print_node(out, child, indent + 1)?;
                }
            }
        }
        Ok(())
    }

    /// 导出树结构为JSON格式
    ///
    /// 非有限的坐标（空节点的MBR）序列化为 null。
    pub fn export_to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.create_tree_visualization())
    }

    /// 创建用于可视化的树结构
    pub fn create_tree_visualization(&self) -> TreeVisualization<'_> {
        TreeVisualization {
            root: (!self.is_empty()).then(|| self.create_node_visualization(self.root())),
            config: TreeConfig {
                max_entries: self.max_entries(),
                min_entries: self.min_entries(),
            },
            depth: self.depth(),
            len: self.len(),
        }
    }

    fn create_node_visualization(&self, id: NodeId) -> NodeVisualization<'_> {
        let node = self.node_ref(id);
        NodeVisualization {
            id: id.index(),
            mbr: node.mbr,
            node_type: if node.is_leaf() { "leaf" } else { "internal" },
            level: node.level,
            items: node.items().iter().collect(),
            children: node
                .children()
                .iter()
                .filter(|&&child| self.node(child).is_some())
                .map(|&child| self.create_node_visualization(child))
                .collect(),
        }
    }

    /// 从根节点出发检查树的结构不变量，返回发现的全部问题
    pub fn check_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        let root = self.root();
        let root_node = self.root_node();

        if root_node.parent.is_some() {
            violations.push(InvariantViolation::BrokenParentLink {
                node: root,
                expected: None,
                found: root_node.parent,
            });
        }
        self.check_node(root, root_node.level, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn check_node(&self, id: NodeId, expected_level: usize, violations: &mut Vec<InvariantViolation>) {
        let node = self.node_ref(id);
        let is_root = id == self.root();

        if node.level != expected_level || (node.is_leaf() && node.level != 0) {
            violations.push(InvariantViolation::LevelMismatch {
                node: id,
                expected: if node.is_leaf() { 0 } else { expected_level },
                found: node.level,
            });
        }

        let computed = node.compute_mbr(self.nodes());
        if node.mbr != computed {
            violations.push(InvariantViolation::MbrMismatch {
                node: id,
                stored: node.mbr,
                computed,
            });
        }

        let size = node.size();
        if size > self.max_entries() {
            violations.push(InvariantViolation::Overfull {
                node: id,
                size,
                max: self.max_entries(),
            });
        }
        if !is_root && size < self.min_entries() {
            violations.push(InvariantViolation::Underfull {
                node: id,
                size,
                min: self.min_entries(),
            });
        }

        if let NodeKind::Internal(children) = &node.kind {
            if children.is_empty() {
                violations.push(InvariantViolation::EmptyInternalNode { node: id });
            }
            for &child in children {
                let Some(child_node) = self.node(child) else {
                    violations.push(InvariantViolation::DanglingChild { parent: id, child });
                    continue;
                };
                if child_node.parent != Some(id) {
                    violations.push(InvariantViolation::BrokenParentLink {
                        node: child,
                        expected: Some(id),
                        found: child_node.parent,
                    });
                }
                self.check_node(child, node.level.saturating_sub(1), violations);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::node::Node;
    use super::*;

    fn sample_tree() -> RTree {
        let mut rtree = RTree::new(2, 4);
        for i in 0..6 {
            let x = i as f64 * 10.0;
            rtree.insert(StoredItem::new(i, format!("Region{}", i), 1000 * i as i64, Rectangle::new(x, 0.0, x + 5.0, 5.0)));
        }
        rtree
    }

    fn render(rtree: &RTree) -> String {
        let mut out = Vec::new();
        rtree.print_structure(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_print_empty_tree() {
        let rtree = RTree::new(2, 4);
        assert_eq!(
            render(&rtree),
            "--- R-Tree Structure ---\n(Empty Tree)\n------------------------\n"
        );
    }

    #[test]
    fn test_print_single_leaf() {
        let mut rtree = RTree::new(2, 4);
        rtree.insert(StoredItem::new(1, "Alpha", 42, Rectangle::new(0.0, 0.0, 1.5, 2.0)));

        let text = render(&rtree);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--- R-Tree Structure ---");
        assert_eq!(lines[1], "[LEAF @ 0] MBR: (0,0)-(1.5,2) Size: 1");
        assert_eq!(lines[2], "  - Item ID: 1, Name: Alpha, Pop: 42, Bounds: (0,0)-(1.5,2)");
        assert_eq!(lines[3], "------------------------");
    }

    #[test]
    fn test_print_nested_indentation() {
        let rtree = sample_tree();
        let text = render(&rtree);

        assert!(text.lines().nth(1).unwrap().starts_with("[INTERNAL @ "));
        assert!(text.lines().any(|line| line.starts_with("  [LEAF @ ")));
        assert!(text.lines().any(|line| line.starts_with("    - Item ID: 5, Name: Region5")));
        assert_eq!(text.lines().filter(|line| line.contains("Item ID")).count(), 6);
    }

    #[test]
    fn test_export_to_json() {
        let rtree = sample_tree();
        let json = rtree.export_to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["config"]["max_entries"], 4);
        assert_eq!(value["config"]["min_entries"], 2);
        assert_eq!(value["len"], 6);
        assert_eq!(value["root"]["node_type"], "internal");
        assert_eq!(value["root"]["mbr"]["min_corner"]["x"], 0.0);
        assert_eq!(value["root"]["mbr"]["max_corner"]["x"], 55.0);

        let leaves = value["root"]["children"].as_array().unwrap();
        let item_count: usize = leaves
            .iter()
            .map(|leaf| leaf["items"].as_array().unwrap().len())
            .sum();
        assert_eq!(item_count, 6);
    }

    #[test]
    fn test_export_empty_tree() {
        let rtree = RTree::new(2, 4);
        let value: serde_json::Value = serde_json::from_str(&rtree.export_to_json().unwrap()).unwrap();
        assert!(value["root"].is_null());
        assert_eq!(value["depth"], 1);
    }

    #[test]
    fn test_check_invariants_on_valid_tree() {
        assert!(RTree::new(2, 4).check_invariants().is_ok());
        assert!(sample_tree().check_invariants().is_ok());
    }

    #[test]
    fn test_check_invariants_detects_stale_mbr() {
        let mut rtree = sample_tree();
        let root = rtree.root();
        rtree.node_mut(root).mbr = Rectangle::new(0.0, 0.0, 1.0, 1.0);

        let violations = rtree.check_invariants().unwrap_err();
        assert!(violations
            .iter()
            .any(|v| matches!(v, InvariantViolation::MbrMismatch { node, .. } if *node == root)));
    }

    #[test]
    fn test_check_invariants_detects_broken_links() {
        let mut rtree = sample_tree();
        let root = rtree.root();
        let child = rtree.node_ref(root).children()[0];
        rtree.node_mut(child).parent = None;

        let violations = rtree.check_invariants().unwrap_err();
        assert!(violations.contains(&InvariantViolation::BrokenParentLink {
            node: child,
            expected: Some(root),
            found: None,
        }));
    }

    #[test]
    fn test_check_invariants_detects_empty_internal_node() {
        let mut rtree = RTree::new(2, 4);
        let broken = rtree.alloc(Node::new_internal(1));
        rtree.set_root(broken);

        let violations = rtree.check_invariants().unwrap_err();
        assert!(violations.contains(&InvariantViolation::EmptyInternalNode { node: broken }));
    }
}
