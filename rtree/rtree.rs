use super::item::StoredItem;
use super::node::{Node, NodeId, NodeKind};
use super::rectangle::Rectangle;

/// 默认最小条目数m
pub const DEFAULT_MIN_ENTRIES: usize = 2;
/// 默认最大条目数M
pub const DEFAULT_MAX_ENTRIES: usize = 4;

/// 树结构被破坏时的错误
///
/// 这些错误只会在插入/分裂的簿记有缺陷时出现，正常运行的树不会产生。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("internal node {node} has no children during subtree selection")]
    EmptyInternalNode { node: NodeId },
    #[error("failed to find any valid child under internal node {node} in subtree selection")]
    NoSelectableChild { node: NodeId },
}

/// R-tree主结构
///
/// 所有节点保存在节点池 `nodes` 中，父节点通过下标拥有子节点，
/// 子节点的 `parent` 只是一个不拥有所有权的回指下标。树不支持删除，
/// 所以节点一旦分配就一直有效。
#[derive(Debug, Clone)]
pub struct RTree {
    /// 节点池
    nodes: Vec<Node>,
    /// 根节点
    root: NodeId,
    /// 最小条目数m
    min_entries: usize,
    /// 最大条目数M
    max_entries: usize,
}

impl Default for RTree {
    /// 使用默认参数创建R-tree（m=2, M=4）
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ENTRIES, DEFAULT_MAX_ENTRIES)
    }
}

impl RTree {
    /// 创建新的R-tree
    ///
    /// `min_entries` 至少为2，`max_entries` 至少为 max(3, 2·min_entries)，
    /// 参数不一致时向上修正而不是报错。
    pub fn new(min_entries: usize, max_entries: usize) -> Self {
        let min_entries = min_entries.max(2);
        let max_entries = max_entries.max(3).max(min_entries * 2);

        RTree {
            nodes: vec![Node::new_leaf()],
            root: NodeId(0),
            min_entries,
            max_entries,
        }
    }

    /// 检查R-tree是否为空
    pub fn is_empty(&self) -> bool {
        self.root_node().is_empty()
    }

    /// 获取总的条目数量
    pub fn len(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.is_leaf())
            .map(Node::size)
            .sum()
    }

    /// 获取树的深度（只有一个叶子根节点时为1）
    pub fn depth(&self) -> usize {
        self.root_node().level + 1
    }

    /// 获取R-tree的根节点MBR，空树返回 None
    pub fn root_mbr(&self) -> Option<&Rectangle> {
        let mbr = &self.root_node().mbr;
        mbr.is_valid().then_some(mbr)
    }

    /// 获取最小条目数
    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    /// 获取最大条目数
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// 根节点下标
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// 按下标获取节点
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// 节点池中的节点总数
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 按存储顺序遍历所有数据条目
    pub fn items(&self) -> Vec<&StoredItem> {
        let mut items = Vec::with_capacity(self.len());
        self.collect_items(self.root, &mut items);
        items
    }

    fn collect_items<'a>(&'a self, id: NodeId, items: &mut Vec<&'a StoredItem>) {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Leaf(entries) => items.extend(entries.iter()),
            NodeKind::Internal(children) => {
                for &child in children {
                    self.collect_items(child, items);
                }
            }
        }
    }

    /// 内部方法：获取根节点的引用
    pub(crate) fn root_node(&self) -> &Node {
        &self.nodes[self.root.0]
    }

    /// 内部方法：按下标获取节点（下标必须来自本树）
    pub(crate) fn node_ref(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// 内部方法：按下标获取节点的可变引用
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// 内部方法：节点池
    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// 内部方法：把新节点放入节点池并返回其下标
    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// 内部方法：替换根节点
    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// 根据节点当前内容重新计算其MBR
    pub(crate) fn update_mbr(&mut self, id: NodeId) {
        let mbr = self.nodes[id.0].compute_mbr(&self.nodes);
        self.nodes[id.0].mbr = mbr;
    }
}
