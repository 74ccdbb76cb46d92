// R-tree算法模块
//
// 这个模块包含R-tree的所有核心算法实现，按功能分解为不同的子模块：
// - insert: 插入、子树选择与分裂传播
// - split: 节点分裂算法（按位置切分）
// - search: 搜索和带人口阈值的查询
// - debug: 调试输出、JSON 导出与不变量检查

pub mod debug;
pub mod insert;
pub mod search;
pub mod split;
