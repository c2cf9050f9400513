// ==========================================
// 酒店服务质量问卷 - 论域与隶属函数
// ==========================================
// 论域: [1, 10],步长 0.01,所有变量共用
// 隶属函数: 分段线性 (梯形 / 三角形)
// ==========================================

use crate::engine::error::{QualityError, QualityResult};
use serde::{Deserialize, Serialize};

/// 论域下界
pub const UNIVERSE_MIN: f64 = 1.0;
/// 论域上界
pub const UNIVERSE_MAX: f64 = 10.0;

// 采样按整数百分位生成,保证每个采样点恰为 k/100
const UNIVERSE_START_CENTS: u32 = 100;
const UNIVERSE_END_CENTS: u32 = 1000;

// ==========================================
// Universe - 离散论域
// ==========================================
#[derive(Debug, Clone)]
pub struct Universe {
    points: Vec<f64>,
}

impl Universe {
    /// 标准论域: 1.00, 1.01, ..., 10.00 (共 901 点)
    pub fn standard() -> Self {
        let points = (UNIVERSE_START_CENTS..=UNIVERSE_END_CENTS)
            .map(|cents| cents as f64 / 100.0)
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> f64 {
        UNIVERSE_MIN
    }

    pub fn max(&self) -> f64 {
        UNIVERSE_MAX
    }

    /// 值是否落在论域闭区间内
    pub fn contains(&self, x: f64) -> bool {
        (UNIVERSE_MIN..=UNIVERSE_MAX).contains(&x)
    }
}

// ==========================================
// MembershipFunction - 梯形隶属函数
// ==========================================
// 三角形为 b == c 的退化情形
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembershipFunction {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl MembershipFunction {
    /// 内置知识库使用 (断点在编译期已知合法)
    pub(crate) const fn fixed(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// 梯形: a 处从 0 上升, [b, c] 为 1, d 处降为 0
    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> QualityResult<Self> {
        if ![a, b, c, d].iter().all(|v| v.is_finite()) {
            return Err(QualityError::InvalidMembershipFunction(format!(
                "断点必须为有限数值: [{}, {}, {}, {}]",
                a, b, c, d
            )));
        }
        if !(a <= b && b <= c && c <= d) {
            return Err(QualityError::InvalidMembershipFunction(format!(
                "断点必须满足 a <= b <= c <= d: [{}, {}, {}, {}]",
                a, b, c, d
            )));
        }
        Ok(Self { a, b, c, d })
    }

    /// 三角形: 峰值在 b
    pub fn triangle(a: f64, b: f64, c: f64) -> QualityResult<Self> {
        Self::trapezoid(a, b, b, c)
    }

    pub fn breakpoints(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// 隶属度
    ///
    /// 支撑集外为 0;平台 [b, c] 上为 1;两侧线性插值。
    /// 退化肩部 (a == b 或 c == d) 在肩点处取 1。
    pub fn degree(&self, x: f64) -> f64 {
        if x < self.a || x > self.d {
            return 0.0;
        }
        if x >= self.b && x <= self.c {
            return 1.0;
        }
        if x < self.b {
            // 此时 a <= x < b,分母非零
            (x - self.a) / (self.b - self.a)
        } else {
            // 此时 c < x <= d,分母非零
            (self.d - x) / (self.d - self.c)
        }
    }

    /// 在论域上采样
    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe.points().iter().map(|&x| self.degree(x)).collect()
    }
}
