use serde::{Deserialize, Serialize};
use std::fmt;

/// 二维平面上的点
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// 矩形边界框 - 用于表示R-tree中的最小边界矩形(MBR)
///
/// `min_corner` 在任一轴上大于 `max_corner` 时矩形无效，表示“空/尚未定义”。
/// 所有几何运算都对无效矩形有明确定义：面积为0，不与任何矩形相交，
/// 在扩展与合并时被另一个操作数吸收。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub min_corner: Point,
    pub max_corner: Point,
}

impl Default for Rectangle {
    /// 默认矩形即空矩形
    fn default() -> Self {
        Rectangle::EMPTY
    }
}

impl Rectangle {
    /// 空矩形：最小角为 +∞，最大角为 -∞
    pub const EMPTY: Rectangle = Rectangle {
        min_corner: Point {
            x: f64::INFINITY,
            y: f64::INFINITY,
        },
        max_corner: Point {
            x: f64::NEG_INFINITY,
            y: f64::NEG_INFINITY,
        },
    };

    /// 创建新的矩形（不校验边界，反向边界得到无效矩形）
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Rectangle {
            min_corner: Point::new(min_x, min_y),
            max_corner: Point::new(max_x, max_y),
        }
    }

    /// 创建一个点矩形
    pub fn from_point(x: f64, y: f64) -> Self {
        Rectangle::new(x, y, x, y)
    }

    /// 两个轴上都满足 min <= max 时矩形有效（NaN 坐标视为无效）
    pub fn is_valid(&self) -> bool {
        self.min_corner.x <= self.max_corner.x && self.min_corner.y <= self.max_corner.y
    }

    pub fn width(&self) -> f64 {
        if self.is_valid() {
            self.max_corner.x - self.min_corner.x
        } else {
            0.0
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_valid() {
            self.max_corner.y - self.min_corner.y
        } else {
            0.0
        }
    }

    /// 计算矩形面积，无效矩形面积为0
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// 计算矩形中心点，无效矩形没有中心
    pub fn center(&self) -> Option<Point> {
        self.is_valid().then(|| {
            Point::new(
                (self.min_corner.x + self.max_corner.x) / 2.0,
                (self.min_corner.y + self.max_corner.y) / 2.0,
            )
        })
    }

    /// 判断当前矩形是否包含一个点（闭区间）
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_corner.x
            && point.x <= self.max_corner.x
            && point.y >= self.min_corner.y
            && point.y <= self.max_corner.y
    }

    /// 判断当前矩形是否包含另一个矩形（闭区间）
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.min_corner.x >= self.min_corner.x
            && other.max_corner.x <= self.max_corner.x
            && other.min_corner.y >= self.min_corner.y
            && other.max_corner.y <= self.max_corner.y
    }

    /// 判断两个矩形是否相交 - 分离轴测试
    ///
    /// 无效矩形不与任何矩形相交，包括它自己。
    pub fn intersects(&self, other: &Rectangle) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }

        !(self.max_corner.x < other.min_corner.x
            || self.min_corner.x > other.max_corner.x
            || self.max_corner.y < other.min_corner.y
            || self.min_corner.y > other.max_corner.y)
    }

    /// 原地扩展为同时包含另一个矩形的最小边界矩形
    pub fn expand(&mut self, other: &Rectangle) {
        if !other.is_valid() {
            return;
        }
        if !self.is_valid() {
            *self = *other;
            return;
        }

        self.min_corner.x = self.min_corner.x.min(other.min_corner.x);
        self.min_corner.y = self.min_corner.y.min(other.min_corner.y);
        self.max_corner.x = self.max_corner.x.max(other.max_corner.x);
        self.max_corner.y = self.max_corner.y.max(other.max_corner.y);
    }

    /// 计算两个矩形的并集MBR
    ///
    /// 一个无效时返回另一个，两个都无效时返回空矩形。
    pub fn combine(r1: &Rectangle, r2: &Rectangle) -> Rectangle {
        match (r1.is_valid(), r2.is_valid()) {
            (false, false) => Rectangle::EMPTY,
            (false, true) => *r2,
            (true, false) => *r1,
            (true, true) => Rectangle::new(
                r1.min_corner.x.min(r2.min_corner.x),
                r1.min_corner.y.min(r2.min_corner.y),
                r1.max_corner.x.max(r2.max_corner.x),
                r1.max_corner.y.max(r2.max_corner.y),
            ),
        }
    }

    /// 计算扩大到包含另一个矩形所需的面积增量
    pub fn area_increase(&self, other: &Rectangle) -> f64 {
        if !other.is_valid() {
            return 0.0;
        }
        if !self.is_valid() {
            return other.area();
        }
        Rectangle::combine(self, other).area() - self.area()
    }
}

impl From<[f64; 4]> for Rectangle {
    /// `[min_x, min_y, max_x, max_y]`
    fn from(bounds: [f64; 4]) -> Self {
        Rectangle::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min_corner.x, self.min_corner.y, self.max_corner.x, self.max_corner.y
        )
    }
}
