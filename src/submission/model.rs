use crate::scoring::{Category, Classification, Condition};
use crate::storage::repository::ProfileTotals;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEPARTMENTS: [&str; 8] = [
    "IT Department",
    "HR Department",
    "Finance Department",
    "Marketing Department",
    "Operations Department",
    "Research & Development",
    "Customer Service",
    "Administration",
];

/// 表单原始输入，全部保留为字符串，由 `validate` 统一解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub item_name: String,
    pub quantity: String,
    pub category: String,
    pub department: String,
    pub condition: String,
    pub weight: String,
    pub description: String,
}

impl Default for SubmissionForm {
    fn default() -> Self {
        Self {
            item_name: String::new(),
            quantity: "1".to_string(),
            category: String::new(),
            department: String::new(),
            condition: String::new(),
            weight: String::new(),
            description: String::new(),
        }
    }
}

impl SubmissionForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 选择类字段在候选值间循环；当前值不在候选中时从头（或尾）开始
    pub fn cycle_choice(&mut self, field: FormField, forward: bool) -> bool {
        let Some(choices) = field.choices() else {
            return false;
        };
        let current = self.get(field);
        let next = match choices.iter().position(|c| *c == current) {
            Some(i) if forward => (i + 1) % choices.len(),
            Some(i) => (i + choices.len() - 1) % choices.len(),
            None if forward => 0,
            None => choices.len() - 1,
        };
        *self.get_mut(field) = choices[next].to_string();
        true
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ItemName => &self.item_name,
            FormField::Quantity => &self.quantity,
            FormField::Category => &self.category,
            FormField::Department => &self.department,
            FormField::Condition => &self.condition,
            FormField::Weight => &self.weight,
            FormField::Description => &self.description,
        }
    }

    pub fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::ItemName => &mut self.item_name,
            FormField::Quantity => &mut self.quantity,
            FormField::Category => &mut self.category,
            FormField::Department => &mut self.department,
            FormField::Condition => &mut self.condition,
            FormField::Weight => &mut self.weight,
            FormField::Description => &mut self.description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    ItemName,
    Quantity,
    Category,
    Department,
    Condition,
    Weight,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::ItemName,
        FormField::Quantity,
        FormField::Category,
        FormField::Department,
        FormField::Condition,
        FormField::Weight,
        FormField::Description,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::ItemName => "Item Name *",
            FormField::Quantity => "Quantity *",
            FormField::Category => "Category *",
            FormField::Department => "Department *",
            FormField::Condition => "Condition *",
            FormField::Weight => "Estimated Weight (kg)",
            FormField::Description => "Description (Optional)",
        }
    }

    pub fn choices(&self) -> Option<Vec<&'static str>> {
        match self {
            FormField::Category => Some(Category::ALL.iter().map(|c| c.label()).collect()),
            FormField::Department => Some(DEPARTMENTS.to_vec()),
            FormField::Condition => Some(Condition::ALL.iter().map(|c| c.as_str()).collect()),
            _ => None,
        }
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" | "item" | "item_name" => Ok(FormField::ItemName),
            "qty" | "quantity" => Ok(FormField::Quantity),
            "category" | "cat" => Ok(FormField::Category),
            "dept" | "department" => Ok(FormField::Department),
            "condition" | "cond" => Ok(FormField::Condition),
            "weight" | "kg" => Ok(FormField::Weight),
            "desc" | "description" => Ok(FormField::Description),
            other => Err(format!("unknown form field: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PersistenceMode {
    /// 三次写入在同一事务内，任一步失败全部回滚
    #[default]
    Transactional,
    /// 依次写入，无补偿；后续步骤失败时前面的行保留
    Sequential,
}

impl FromStr for PersistenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" | "txn" | "atomic" => Ok(PersistenceMode::Transactional),
            "sequential" | "seq" => Ok(PersistenceMode::Sequential),
            other => Err(format!("unknown persistence mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistStage {
    Begin,
    InsertItem,
    InsertQrCode,
    CreditProfile,
    Commit,
}

impl fmt::Display for PersistStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PersistStage::Begin => "begin transaction",
            PersistStage::InsertItem => "insert item",
            PersistStage::InsertQrCode => "insert qr code",
            PersistStage::CreditProfile => "credit profile",
            PersistStage::Commit => "commit",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("invalid submission ({} field errors)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("authentication required")]
    AuthenticationMissing,
    /// message 为后端原文
    #[error("{message}")]
    Persistence {
        stage: PersistStage,
        message: String,
    },
    #[error("profile not found for user {user_id}")]
    ProfileNotFound { user_id: String },
}

impl SubmissionError {
    pub fn persistence(stage: PersistStage, err: impl fmt::Display) -> Self {
        SubmissionError::Persistence {
            stage,
            message: err.to_string(),
        }
    }

    /// 校验错误只在表单内联显示，不弹通知
    pub fn notification(&self) -> Option<Notification> {
        match self {
            SubmissionError::Validation(_) => None,
            SubmissionError::AuthenticationMissing => Some(Notification::destructive(
                "Authentication Required",
                "Please log in to submit e-waste items",
            )),
            other => {
                let msg = other.to_string();
                let description = if msg.trim().is_empty() {
                    "An error occurred while submitting your item".to_string()
                } else {
                    msg
                };
                Some(Notification::destructive("Submission Failed", description))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// 用户可见的 toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub item_id: i32,
    pub qr_code: String,
    pub item_name: String,
    pub classification: Classification,
    pub estimated_value: f64,
    pub co2_saved: f64,
    pub points: i64,
    pub profile: ProfileTotals,
}

impl SubmissionReceipt {
    pub fn notification(&self) -> Notification {
        Notification::info(
            "E-Waste Submitted Successfully!",
            format!(
                "Your {} has been classified as {}. You earned {} points!",
                self.item_name, self.classification, self.points
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_missing_toast_text() {
        let n = SubmissionError::AuthenticationMissing.notification().unwrap();
        assert_eq!(n.title, "Authentication Required");
        assert_eq!(n.description, "Please log in to submit e-waste items");
        assert_eq!(n.variant, NotificationVariant::Destructive);
    }

    #[test]
    fn persistence_toast_carries_backend_message() {
        let err = SubmissionError::persistence(PersistStage::InsertItem, "disk I/O error");
        let n = err.notification().unwrap();
        assert_eq!(n.title, "Submission Failed");
        assert_eq!(n.description, "disk I/O error");

        let empty = SubmissionError::persistence(PersistStage::InsertQrCode, "");
        assert_eq!(
            empty.notification().unwrap().description,
            "An error occurred while submitting your item"
        );
    }

    #[test]
    fn validation_has_no_toast() {
        let err = SubmissionError::Validation(vec![FieldError {
            field: FormField::ItemName,
            message: "Item name is required",
        }]);
        assert!(err.notification().is_none());
    }

    #[test]
    fn success_toast_text() {
        let receipt = SubmissionReceipt {
            item_id: 1,
            qr_code: "ewaste_1_0".to_string(),
            item_name: "iPhone 11".to_string(),
            classification: Classification::Hazardous,
            estimated_value: 15.0,
            co2_saved: 2.5,
            points: 15,
            profile: ProfileTotals::default(),
        };
        let n = receipt.notification();
        assert_eq!(n.title, "E-Waste Submitted Successfully!");
        assert_eq!(
            n.description,
            "Your iPhone 11 has been classified as Hazardous. You earned 15 points!"
        );
    }

    #[test]
    fn choice_fields_cycle_both_ways() {
        let mut form = SubmissionForm::default();
        assert!(form.cycle_choice(FormField::Condition, true));
        assert_eq!(form.condition, "working");
        form.cycle_choice(FormField::Condition, true);
        form.cycle_choice(FormField::Condition, true);
        assert_eq!(form.condition, "broken");
        form.cycle_choice(FormField::Condition, true);
        assert_eq!(form.condition, "working");

        form.cycle_choice(FormField::Department, false);
        assert_eq!(form.department, "Administration");
        form.cycle_choice(FormField::Category, true);
        assert_eq!(form.category, "Computers & Laptops");

        assert!(!form.cycle_choice(FormField::ItemName, true));
    }

    #[test]
    fn persistence_mode_parses() {
        assert_eq!("Sequential".parse::<PersistenceMode>(), Ok(PersistenceMode::Sequential));
        assert_eq!("transactional".parse::<PersistenceMode>(), Ok(PersistenceMode::Transactional));
        assert!("eventual".parse::<PersistenceMode>().is_err());
    }
}
