use super::model::{
    Category, Classification, Condition, Score, ScoreInput, CO2_PER_KG, DEFAULT_WEIGHT_KG,
    FALLBACK_BASE_VALUE, FALLBACK_CONDITION_MULTIPLIER,
};
use log::warn;
use rand::Rng;

pub fn base_value(category: &str) -> f64 {
    match Category::parse(category) {
        Some(c) => c.base_value(),
        None => {
            warn!("未知类别 {:?}，按默认基础价值 {} 计算", category, FALLBACK_BASE_VALUE);
            FALLBACK_BASE_VALUE
        }
    }
}

pub fn condition_multiplier(condition: &str) -> f64 {
    match Condition::parse(condition) {
        Some(c) => c.multiplier(),
        None => {
            warn!(
                "未知成色 {:?}，按默认系数 {} 计算",
                condition, FALLBACK_CONDITION_MULTIPLIER
            );
            FALLBACK_CONDITION_MULTIPLIER
        }
    }
}

pub fn estimate_value(category: &str, condition: &str, quantity: u32) -> f64 {
    base_value(category) * condition_multiplier(condition) * quantity as f64
}

pub fn estimate_co2(weight_kg: Option<f64>, quantity: u32) -> f64 {
    weight_kg.unwrap_or(DEFAULT_WEIGHT_KG) * CO2_PER_KG * quantity as f64
}

/// 分类与物品属性无关，只取决于注入的随机源
pub fn classify<R: Rng + ?Sized>(rng: &mut R) -> Classification {
    Classification::ALL[rng.gen_range(0..Classification::ALL.len())]
}

pub fn score<R: Rng + ?Sized>(input: &ScoreInput<'_>, rng: &mut R) -> Score {
    let weight = input.weight_kg.unwrap_or(DEFAULT_WEIGHT_KG);
    Score {
        estimated_value: estimate_value(input.category, input.condition, input.quantity),
        co2_saved: estimate_co2(input.weight_kg, input.quantity),
        total_weight_kg: weight * input.quantity as f64,
        classification: classify(rng),
    }
}
