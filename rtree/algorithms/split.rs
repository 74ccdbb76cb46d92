use super::super::node::{Node, NodeId, NodeKind};
use super::super::rtree::RTree;
use tracing::debug;

/// 节点分裂算法 - 按位置切分
///
/// 条目按存储顺序在一个计算出的下标处切开，不按几何位置重新分配。
/// 切分点只看条目数，不考虑两侧的重叠面积。
impl RTree {
    /// 分裂一个已满的节点
    ///
    /// 原节点保留 `[0, split)` 的条目，`[split, size)` 移到新建的同类型兄弟节点中。
    /// 兄弟节点最初与原节点共享父节点，由调用方负责把它挂到父节点的子节点列表里。
    /// 返回新兄弟节点的下标。
    pub(crate) fn split_node(&mut self, id: NodeId) -> NodeId {
        let total = self.node_ref(id).size();
        let split = self.split_index(total);

        let node = self.node_mut(id);
        let kind = match &mut node.kind {
            NodeKind::Leaf(items) => NodeKind::Leaf(items.split_off(split)),
            NodeKind::Internal(children) => NodeKind::Internal(children.split_off(split)),
        };
        let sibling = Node {
            kind,
            ..node.empty_sibling()
        };
        let sibling = self.alloc(sibling);

        // 被移走的子节点改为指向新兄弟
        let moved = self.node_ref(sibling).children().to_vec();
        for child in moved {
            self.node_mut(child).parent = Some(sibling);
        }

        self.update_mbr(id);
        self.update_mbr(sibling);

        debug!(
            "split {} node {} ({} entries) at {}: kept {}, moved {} to {}",
            if self.node_ref(id).is_leaf() { "leaf" } else { "internal" },
            id,
            total,
            split,
            self.node_ref(id).size(),
            self.node_ref(sibling).size(),
            sibling
        );

        sibling
    }

    /// 计算分裂下标
    ///
    /// 目标是大约一半；条目足够多时让两侧都至少有 `min_entries` 个，
    /// 否则在中间附近切开并让原节点多拿一个。结果限制在 `[1, total - 1]`。
    pub(crate) fn split_index(&self, total: usize) -> usize {
        let min_entries = self.min_entries();
        let mut split = min_entries.max(total / 2);

        if total > min_entries * 2 {
            if total - split < min_entries {
                split = total - min_entries;
            }
            if split < min_entries {
                split = min_entries;
            }
        } else {
            split = total.div_ceil(2);
        }

        let upper = if total > 1 { total - 1 } else { 1 };
        split.min(upper).max(1).min(total)
    }
}
