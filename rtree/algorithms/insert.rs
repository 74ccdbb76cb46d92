use super::super::item::StoredItem;
use super::super::node::{Node, NodeId, NodeKind};
use super::super::rectangle::Rectangle;
use super::super::rtree::{RTree, TreeError};
use tracing::{debug, error, trace};

/// 递归插入一步的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertOutcome {
    /// 当前节点吸收了新条目，没有分裂
    Absorbed,
    /// 当前节点分裂，产生了一个需要挂到父节点上的兄弟节点
    Split(NodeId),
}

/// 插入操作相关算法
impl RTree {
    /// 插入新的数据条目
    ///
    /// 边界无效（min > max）的条目照常存储，只是永远不会被查询命中。
    ///
    /// # Panics
    ///
    /// 树的内部结构被破坏时（索引节点没有子节点）直接 panic，
    /// 这只会由插入/分裂的实现缺陷引起。需要以错误形式处理时使用 [`RTree::try_insert`]。
    pub fn insert(&mut self, item: StoredItem) {
        if let Err(e) = self.try_insert(item) {
            panic!("R-tree invariant violated: {}", e);
        }
    }

    /// 插入新的数据条目，内部结构被破坏时返回错误而不是 panic
    pub fn try_insert(&mut self, item: StoredItem) -> Result<(), TreeError> {
        let root = self.root();

        // 分裂一直传播到根节点之外：长出新的根
        if let InsertOutcome::Split(sibling) = self.insert_recursive(root, item)? {
            self.grow_root(root, sibling);
        }

        Ok(())
    }

    /// 递归插入
    fn insert_recursive(
        &mut self,
        id: NodeId,
        item: StoredItem,
    ) -> Result<InsertOutcome, TreeError> {
        // I1: 下降途中先扩展MBR，保证父节点始终包含其下的一切
        let node = self.node_mut(id);
        node.mbr.expand(&item.bounds);

        // I2: 叶子节点直接追加
        if let NodeKind::Leaf(items) = &mut node.kind {
            items.push(item);
            return Ok(self.split_if_full(id));
        }

        // I3: 索引节点选择子树并下降
        let child = self.choose_subtree(id, &item.bounds)?;
        match self.insert_recursive(child, item)? {
            InsertOutcome::Absorbed => Ok(InsertOutcome::Absorbed),
            InsertOutcome::Split(sibling) => {
                // I4: 子节点分裂，把新兄弟挂到当前节点下
                self.attach_child(id, sibling);
                Ok(self.split_if_full(id))
            }
        }
    }

    /// 节点已满时分裂，否则什么都不做
    fn split_if_full(&mut self, id: NodeId) -> InsertOutcome {
        if self.node_ref(id).is_full(self.max_entries()) {
            InsertOutcome::Split(self.split_node(id))
        } else {
            InsertOutcome::Absorbed
        }
    }

    /// 把分裂产生的兄弟节点挂到父节点下
    fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        match &mut self.node_mut(parent).kind {
            NodeKind::Internal(children) => children.push(child),
            NodeKind::Leaf(_) => {
                error!("cannot attach child {} to leaf node {}", child, parent);
            }
        }
    }

    /// 根节点分裂后创建新的根节点
    fn grow_root(&mut self, old_root: NodeId, sibling: NodeId) {
        let level = self.node_ref(old_root).level + 1;
        let mbr = Rectangle::combine(&self.node_ref(old_root).mbr, &self.node_ref(sibling).mbr);

        let mut new_root = Node::new_internal(level);
        new_root.mbr = mbr;
        new_root.kind = NodeKind::Internal(vec![old_root, sibling]);
        let new_root = self.alloc(new_root);

        self.node_mut(old_root).parent = Some(new_root);
        self.node_mut(sibling).parent = Some(new_root);
        self.set_root(new_root);

        debug!(
            "root split: new root {} at level {} over {} and {}",
            new_root, level, old_root, sibling
        );
    }

    /// 选择子树 - 选择面积增量最小的子节点，增量相同时选择当前面积较小的
    pub(crate) fn choose_subtree(
        &self,
        id: NodeId,
        item_bounds: &Rectangle,
    ) -> Result<NodeId, TreeError> {
        let children = self.node_ref(id).children();
        if children.is_empty() {
            return Err(TreeError::EmptyInternalNode { node: id });
        }

        let mut best_child = None;
        let mut min_increase = f64::MAX;
        let mut min_area = f64::MAX;

        for &child in children {
            let Some(child_node) = self.node(child) else {
                continue;
            };

            let area = child_node.mbr.area();
            let increase = child_node.mbr.area_increase(item_bounds);

            if increase < min_increase {
                min_increase = increase;
                min_area = area;
                best_child = Some(child);
            } else if increase == min_increase && (best_child.is_none() || area < min_area) {
                min_area = area;
                best_child = Some(child);
            }
        }

        // 面积增量无法比较时（例如无穷大的边界）退回第一个有效子节点
        let best_child = best_child
            .or_else(|| children.iter().copied().find(|&c| self.node(c).is_some()))
            .ok_or(TreeError::NoSelectableChild { node: id })?;

        trace!(
            "chose subtree {} under {} (area increase {})",
            best_child,
            id,
            min_increase
        );
        Ok(best_child)
    }
}
