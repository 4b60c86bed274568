use serde::{Deserialize, Serialize};
use std::fmt;

/// 未知类别的基础价值
pub const FALLBACK_BASE_VALUE: f64 = 15.0;
/// 未知成色的系数
pub const FALLBACK_CONDITION_MULTIPLIER: f64 = 0.5;
/// 每回收 1kg 估算减少的 CO2 (kg)
pub const CO2_PER_KG: f64 = 2.5;
pub const DEFAULT_WEIGHT_KG: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    ComputersLaptops,
    MobilePhones,
    MonitorsTvs,
    CablesAccessories,
    Batteries,
    OtherElectronics,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::ComputersLaptops,
        Category::MobilePhones,
        Category::MonitorsTvs,
        Category::CablesAccessories,
        Category::Batteries,
        Category::OtherElectronics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::ComputersLaptops => "Computers & Laptops",
            Category::MobilePhones => "Mobile Phones",
            Category::MonitorsTvs => "Monitors & TVs",
            Category::CablesAccessories => "Cables & Accessories",
            Category::Batteries => "Batteries",
            Category::OtherElectronics => "Other Electronics",
        }
    }

    pub fn base_value(&self) -> f64 {
        match self {
            Category::ComputersLaptops => 50.0,
            Category::MobilePhones => 25.0,
            Category::MonitorsTvs => 30.0,
            Category::CablesAccessories => 2.0,
            Category::Batteries => 5.0,
            Category::OtherElectronics => 15.0,
        }
    }

    /// 只接受规范名称（区分大小写）
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Working,
    Partial,
    Broken,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Working, Condition::Partial, Condition::Broken];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Working => "working",
            Condition::Partial => "partial",
            Condition::Broken => "broken",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Condition::Working => 1.0,
            Condition::Partial => 0.6,
            Condition::Broken => 0.3,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let t = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(t))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Recyclable,
    Reusable,
    Hazardous,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::Recyclable,
        Classification::Reusable,
        Classification::Hazardous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Recyclable => "Recyclable",
            Classification::Reusable => "Reusable",
            Classification::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub category: &'a str,
    pub condition: &'a str,
    /// 单件重量，缺省按 1kg
    pub weight_kg: Option<f64>,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub estimated_value: f64,
    pub co2_saved: f64,
    /// 入库重量 = 单件重量 * 数量
    pub total_weight_kg: f64,
    pub classification: Classification,
}

impl Score {
    pub fn points(&self) -> i64 {
        self.estimated_value.floor() as i64
    }
}
