use crate::rtree::Rectangle;
use std::collections::BTreeMap;

/// 覆盖全部坐标范围的区域名
pub const WORLD: &str = "world";

/// 内置的国家/地区边界（经纬度，粗略外接矩形）
const BUILTIN_REGIONS: &[(&str, [f64; 4])] = &[
    ("united states", [-125.0, 24.0, -66.0, 50.0]),
    ("usa", [-125.0, 24.0, -66.0, 50.0]),
    ("canada", [-141.0, 41.0, -52.0, 84.0]),
    ("mexico", [-118.0, 14.0, -97.0, 33.0]),
    ("china", [73.0, 18.0, 135.0, 54.0]),
    ("russia", [19.0, 41.0, 180.0, 82.0]),
    ("germany", [5.0, 47.0, 16.0, 55.0]),
    ("brazil", [-74.0, -34.0, -34.0, 6.0]),
    (WORLD, [-180.0, -90.0, 180.0, 90.0]),
];

/// 命名查询区域表
///
/// 启动时构建一次，之后只读。名称不区分大小写，首尾空白会被忽略。
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable {
    regions: BTreeMap<String, Rectangle>,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RegionTable {
    /// 只包含内置区域的表
    pub fn builtin() -> Self {
        RegionTable {
            regions: BUILTIN_REGIONS
                .iter()
                .map(|(name, bounds)| (name.to_string(), Rectangle::from(*bounds)))
                .collect(),
        }
    }

    /// 在内置区域之外加入额外区域，同名时覆盖内置定义
    pub fn with_extra<'a, I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a [f64; 4])>,
    {
        let mut table = Self::builtin();
        for (name, bounds) in extra {
            table
                .regions
                .insert(normalize(name), Rectangle::from(*bounds));
        }
        table
    }

    /// 按名称查找区域
    pub fn resolve(&self, name: &str) -> Option<Rectangle> {
        self.regions.get(&normalize(name)).copied()
    }

    /// 所有已知区域名（按字母序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
