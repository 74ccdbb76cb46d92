use super::super::item::StoredItem;
use super::super::node::{NodeId, NodeKind};
use super::super::rectangle::Rectangle;
use super::super::rtree::RTree;

/// 搜索操作相关算法
impl RTree {
    /// 搜索与查询矩形相交的所有条目
    pub fn search(&self, query: &Rectangle) -> Vec<&StoredItem> {
        self.search_matching(query, |_| true)
    }

    /// 搜索与查询矩形相交且人口不低于 `min_population` 的条目
    ///
    /// 人口阈值只在叶子上检查，索引节点没有人口汇总，不能用它剪枝。
    pub fn search_with_population(&self, query: &Rectangle, min_population: i64) -> Vec<&StoredItem> {
        self.search_matching(query, |item| item.population >= min_population)
    }

    /// 搜索与查询矩形相交且满足 `accept` 的条目
    ///
    /// 结果按底层存储顺序返回，不做排序。
    pub fn search_matching<F>(&self, query: &Rectangle, accept: F) -> Vec<&StoredItem>
    where
        F: Fn(&StoredItem) -> bool,
    {
        let mut results = Vec::new();

        if self.root_node().mbr.intersects(query) {
            self.search_recursive(self.root(), query, &accept, &mut results);
        }

        results
    }

    /// 递归搜索，跳过MBR与查询矩形不相交的子树
    fn search_recursive<'a, F>(
        &'a self,
        id: NodeId,
        query: &Rectangle,
        accept: &F,
        results: &mut Vec<&'a StoredItem>,
    ) where
        F: Fn(&StoredItem) -> bool,
    {
        match &self.node_ref(id).kind {
            NodeKind::Leaf(items) => {
                // S2: 搜索叶子节点
                results.extend(
                    items
                        .iter()
                        .filter(|item| item.bounds.intersects(query) && accept(*item)),
                );
            }
            NodeKind::Internal(children) => {
                // S1: 搜索子树
                for &child in children {
                    match self.node(child) {
                        Some(node) if node.mbr.intersects(query) => {
                            self.search_recursive(child, query, accept, results);
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
