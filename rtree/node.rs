use super::item::StoredItem;
use super::rectangle::Rectangle;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::error;

/// 节点在树的节点池中的下标
///
/// 父节点引用只保存这个下标，不拥有节点。
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "#{}", _0)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 节点内容：叶子节点直接存储数据条目，索引节点存储子节点
#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf(Vec<StoredItem>),
    Internal(Vec<NodeId>),
}

/// R-tree节点
#[derive(Debug, Clone)]
pub struct Node {
    /// 节点的最小边界矩形
    pub mbr: Rectangle,
    /// 节点包含的条目或子节点
    pub kind: NodeKind,
    /// 父节点（根节点为 None）
    pub parent: Option<NodeId>,
    /// 节点在树中的层级（叶子节点层级为0）
    pub level: usize,
}

impl Node {
    /// 创建新的叶子节点
    pub fn new_leaf() -> Self {
        Node {
            mbr: Rectangle::EMPTY,
            kind: NodeKind::Leaf(Vec::new()),
            parent: None,
            level: 0,
        }
    }

    /// 创建新的索引节点
    pub fn new_internal(level: usize) -> Self {
        Node {
            mbr: Rectangle::EMPTY,
            kind: NodeKind::Internal(Vec::new()),
            parent: None,
            level,
        }
    }

    /// 创建与当前节点同类型、同层级、同父节点的空兄弟节点
    pub fn empty_sibling(&self) -> Self {
        let mut sibling = if self.is_leaf() {
            Node::new_leaf()
        } else {
            Node::new_internal(self.level)
        };
        sibling.parent = self.parent;
        sibling
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// 条目数（叶子）或子节点数（索引节点）
    pub fn size(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(items) => items.len(),
            NodeKind::Internal(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// 检查节点是否已满
    pub fn is_full(&self, max_entries: usize) -> bool {
        self.size() >= max_entries
    }

    /// 叶子节点的数据条目，索引节点返回空切片
    pub fn items(&self) -> &[StoredItem] {
        match &self.kind {
            NodeKind::Leaf(items) => items,
            NodeKind::Internal(_) => &[],
        }
    }

    /// 索引节点的子节点，叶子节点返回空切片
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Internal(children) => children,
        }
    }

    /// 根据当前内容重新计算MBR
    ///
    /// `nodes` 是子节点所在的节点池。悬空的子节点下标会被跳过，
    /// 但这表示插入/分裂的簿记出了错，所以会记录错误日志。
    pub fn compute_mbr(&self, nodes: &[Node]) -> Rectangle {
        let mut mbr = Rectangle::EMPTY;
        match &self.kind {
            NodeKind::Leaf(items) => {
                for item in items {
                    mbr.expand(&item.bounds);
                }
            }
            NodeKind::Internal(children) => {
                for &child in children {
                    debug_assert!(child.0 < nodes.len(), "dangling child {}", child);
                    match nodes.get(child.0) {
                        Some(node) => mbr.expand(&node.mbr),
                        None => {
                            error!("dangling child {} skipped while computing MBR", child);
                        }
                    }
                }
            }
        }
        mbr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i32, rect: Rectangle) -> StoredItem {
        StoredItem::new(id, format!("item-{}", id), 0, rect)
    }

    #[test]
    fn test_node_creation() {
        let leaf = Node::new_leaf();
        assert!(leaf.is_leaf());
        assert_eq!(leaf.level, 0);
        assert!(leaf.is_empty());
        assert!(!leaf.mbr.is_valid());

        let internal = Node::new_internal(1);
        assert!(!internal.is_leaf());
        assert_eq!(internal.level, 1);
    }

    #[test]
    fn test_node_compute_mbr_leaf() {
        let mut node = Node::new_leaf();
        assert!(!node.compute_mbr(&[]).is_valid());

        if let NodeKind::Leaf(items) = &mut node.kind {
            items.push(item(1, Rectangle::new(0.0, 0.0, 5.0, 5.0)));
            items.push(item(2, Rectangle::new(3.0, 3.0, 8.0, 8.0)));
            // 无效条目不影响MBR
            items.push(item(3, Rectangle::new(9.0, 9.0, 1.0, 1.0)));
        }

        assert_eq!(node.compute_mbr(&[]), Rectangle::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(node.size(), 3);
    }

    #[test]
    fn test_node_compute_mbr_internal() {
        let mut a = Node::new_leaf();
        a.mbr = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let mut b = Node::new_leaf();
        b.mbr = Rectangle::new(4.0, -2.0, 6.0, 0.5);
        let pool = vec![a, b];

        let mut parent = Node::new_internal(1);
        parent.kind = NodeKind::Internal(vec![NodeId(0), NodeId(1)]);

        assert_eq!(parent.compute_mbr(&pool), Rectangle::new(0.0, -2.0, 6.0, 1.0));
        assert_eq!(parent.children(), &[NodeId(0), NodeId(1)]);
        assert!(parent.items().is_empty());
    }

    #[test]
    fn test_node_is_full() {
        let mut node = Node::new_leaf();
        if let NodeKind::Leaf(items) = &mut node.kind {
            for i in 0..3 {
                items.push(item(i, Rectangle::from_point(i as f64, 0.0)));
            }
        }
        assert!(node.is_full(3));
        assert!(!node.is_full(4));
    }

    #[test]
    fn test_empty_sibling() {
        let mut internal = Node::new_internal(2);
        internal.parent = Some(NodeId(5));
        let sibling = internal.empty_sibling();
        assert!(!sibling.is_leaf());
        assert_eq!(sibling.level, 2);
        assert_eq!(sibling.parent, Some(NodeId(5)));
        assert!(sibling.is_empty());
    }
}
