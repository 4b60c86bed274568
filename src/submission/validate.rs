use super::model::{FieldError, FormField, SubmissionError, SubmissionForm};
use crate::scoring::model::CO2_PER_KG;
use crate::scoring::{Condition, ScoreInput};

pub const MAX_QUANTITY: u32 = i32::MAX as u32;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub item_name: String,
    pub quantity: u32,
    pub category: String,
    pub department: String,
    pub condition: String,
    pub weight_kg: Option<f64>,
    pub description: Option<String>,
}

impl ValidSubmission {
    pub fn score_input(&self) -> ScoreInput<'_> {
        ScoreInput {
            category: &self.category,
            condition: &self.condition,
            weight_kg: self.weight_kg,
            quantity: self.quantity,
        }
    }
}

fn required(
    form: &SubmissionForm,
    field: FormField,
    message: &'static str,
    errors: &mut Vec<FieldError>,
) -> String {
    let v = form.get(field).trim();
    if v.is_empty() {
        errors.push(FieldError { field, message });
    }
    v.to_string()
}

/// 收集全部字段错误后一次性返回
pub fn validate(form: &SubmissionForm) -> Result<ValidSubmission, SubmissionError> {
    let mut errors = Vec::new();

    let item_name = required(form, FormField::ItemName, "Item name is required", &mut errors);

    // 入库列为 i32
    let quantity = match form.quantity.trim().parse::<u32>() {
        Ok(q) if q > MAX_QUANTITY => {
            errors.push(FieldError {
                field: FormField::Quantity,
                message: "Quantity is too large",
            });
            0
        }
        Ok(q) if q >= 1 => q,
        _ => {
            errors.push(FieldError {
                field: FormField::Quantity,
                message: "Quantity must be at least 1",
            });
            0
        }
    };

    let category = required(form, FormField::Category, "Category is required", &mut errors);
    let department = required(
        form,
        FormField::Department,
        "Department is required",
        &mut errors,
    );
    let condition = required(form, FormField::Condition, "Condition is required", &mut errors);
    // 已知成色统一成小写规范名，未知值原样保留交给计分兜底
    let condition = match Condition::parse(&condition) {
        Some(c) => c.as_str().to_string(),
        None => condition,
    };

    let weight_raw = form.weight.trim();
    let weight_kg = if weight_raw.is_empty() {
        None
    } else {
        match weight_raw.parse::<f64>() {
            Ok(w) if w.is_finite() && w >= 0.0 => Some(w),
            _ => {
                errors.push(FieldError {
                    field: FormField::Weight,
                    message: "Weight must be a non-negative number",
                });
                None
            }
        }
    };

    // 总重量与 CO2 都要是有限值
    if let Some(w) = weight_kg {
        if quantity > 0 && !(w * CO2_PER_KG * f64::from(quantity)).is_finite() {
            errors.push(FieldError {
                field: FormField::Weight,
                message: "Weight is too large",
            });
        }
    }

    let description = Some(form.description.trim().to_string()).filter(|d| !d.is_empty());

    if !errors.is_empty() {
        return Err(SubmissionError::Validation(errors));
    }

    Ok(ValidSubmission {
        item_name,
        quantity,
        category,
        department,
        condition,
        weight_kg,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SubmissionForm {
        SubmissionForm {
            item_name: "  Dell Laptop XPS 13 ".to_string(),
            quantity: "2".to_string(),
            category: "Computers & Laptops".to_string(),
            department: "IT Department".to_string(),
            condition: "Working".to_string(),
            weight: "1.4".to_string(),
            description: String::new(),
        }
    }

    fn fields(err: SubmissionError) -> Vec<FormField> {
        match err {
            SubmissionError::Validation(errs) => errs.into_iter().map(|e| e.field).collect(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn accepts_complete_form() {
        let v = validate(&filled()).unwrap();
        assert_eq!(v.item_name, "Dell Laptop XPS 13");
        assert_eq!(v.quantity, 2);
        assert_eq!(v.condition, "working");
        assert_eq!(v.weight_kg, Some(1.4));
        assert_eq!(v.description, None);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let mut form = SubmissionForm::default();
        form.quantity.clear();
        assert_eq!(
            fields(validate(&form).unwrap_err()),
            vec![
                FormField::ItemName,
                FormField::Quantity,
                FormField::Category,
                FormField::Department,
                FormField::Condition,
            ]
        );
    }

    #[test]
    fn blank_item_name_rejected() {
        let mut form = filled();
        form.item_name = "   ".to_string();
        let err = validate(&form).unwrap_err();
        match err {
            SubmissionError::Validation(errs) => {
                assert_eq!(errs.len(), 1);
                assert_eq!(errs[0].message, "Item name is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn quantity_must_be_positive_integer() {
        for bad in ["0", "-1", "1.5", "many"] {
            let mut form = filled();
            form.quantity = bad.to_string();
            assert_eq!(fields(validate(&form).unwrap_err()), vec![FormField::Quantity]);
        }
    }

    #[test]
    fn weight_optional_but_non_negative() {
        let mut form = filled();
        form.weight = String::new();
        assert_eq!(validate(&form).unwrap().weight_kg, None);

        form.weight = "0".to_string();
        assert_eq!(validate(&form).unwrap().weight_kg, Some(0.0));

        for bad in ["-0.5", "NaN", "inf", "heavy"] {
            form.weight = bad.to_string();
            assert_eq!(fields(validate(&form).unwrap_err()), vec![FormField::Weight]);
        }
    }

    #[test]
    fn quantity_beyond_column_range_rejected() {
        let mut form = filled();
        form.quantity = "3000000000".to_string();
        match validate(&form).unwrap_err() {
            SubmissionError::Validation(errs) => {
                assert_eq!(errs.len(), 1);
                assert_eq!(errs[0].field, FormField::Quantity);
                assert_eq!(errs[0].message, "Quantity is too large");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        form.quantity = MAX_QUANTITY.to_string();
        assert_eq!(validate(&form).unwrap().quantity, MAX_QUANTITY);
    }

    #[test]
    fn weight_that_overflows_totals_rejected() {
        let mut form = filled();
        form.quantity = "2".to_string();
        form.weight = "1e308".to_string();
        match validate(&form).unwrap_err() {
            SubmissionError::Validation(errs) => {
                assert_eq!(errs.len(), 1);
                assert_eq!(errs[0].field, FormField::Weight);
                assert_eq!(errs[0].message, "Weight is too large");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        form.quantity = "1".to_string();
        form.weight = "1e300".to_string();
        assert_eq!(validate(&form).unwrap().weight_kg, Some(1e300));
    }

    #[test]
    fn unknown_condition_passes_through() {
        let mut form = filled();
        form.condition = "refurbished".to_string();
        assert_eq!(validate(&form).unwrap().condition, "refurbished");
    }
}
