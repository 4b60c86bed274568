use super::model::{
    FieldError, FormField, PersistStage, PersistenceMode, SubmissionError, SubmissionForm, SubmissionReceipt,
};
use super::store::{SeaOrmStore, SubmissionStore};
use super::validate::{validate, ValidSubmission};
use crate::qr::code_for;
use crate::scoring::{self, Score};
use crate::session::UserIdentity;
use crate::storage::repository::{NewItem, NewQrCode, DEFAULT_QR_LOCATION};
use chrono::Utc;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::{Arc, Mutex, PoisonError};

pub struct SubmissionService {
    db: Arc<DatabaseConnection>,
    mode: PersistenceMode,
    rng: Mutex<StdRng>,
}

impl SubmissionService {
    /// `seed` 固定时分类结果可复现
    pub fn new(db: Arc<DatabaseConnection>, mode: PersistenceMode, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            db,
            mode,
            rng: Mutex::new(rng),
        }
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    pub async fn submit(
        &self,
        user: Option<&UserIdentity>,
        form: &SubmissionForm,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        match self.mode {
            PersistenceMode::Sequential => {
                let store = SeaOrmStore::new(self.db.as_ref());
                self.submit_to(&store, user, form).await
            }
            PersistenceMode::Transactional => {
                let (user_id, valid, score) = self.prepare(user, form)?;
                let txn = self
                    .db
                    .begin()
                    .await
                    .map_err(|e| SubmissionError::persistence(PersistStage::Begin, e))?;

                let result = persist(&SeaOrmStore::new(&txn), &user_id, &valid, &score).await;
                match result {
                    Ok(receipt) => {
                        txn.commit()
                            .await
                            .map_err(|e| SubmissionError::persistence(PersistStage::Commit, e))?;
                        Ok(receipt)
                    }
                    Err(e) => {
                        if let Err(rb) = txn.rollback().await {
                            error!("回滚失败: {}", rb);
                        } else {
                            warn!("提交失败，已回滚: {}", e);
                        }
                        Err(e)
                    }
                }
            }
        }
    }

    /// 直接对给定 store 执行，不包事务
    pub async fn submit_to<S: SubmissionStore + ?Sized>(
        &self,
        store: &S,
        user: Option<&UserIdentity>,
        form: &SubmissionForm,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let (user_id, valid, score) = self.prepare(user, form)?;
        persist(store, &user_id, &valid, &score).await
    }

    /// 校验 -> 身份 -> 计分；不触碰存储
    fn prepare(
        &self,
        user: Option<&UserIdentity>,
        form: &SubmissionForm,
    ) -> Result<(String, ValidSubmission, Score), SubmissionError> {
        let valid = validate(form)?;
        let user = user.ok_or(SubmissionError::AuthenticationMissing)?;
        let score = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            scoring::score(&valid.score_input(), &mut *rng)
        };
        info!(
            "计分完成 [{}] {}: value={} co2={} class={}",
            user.user_id, valid.item_name, score.estimated_value, score.co2_saved, score.classification
        );
        Ok((user.user_id.clone(), valid, score))
    }
}

/// 物品 -> 二维码 -> 积分，按顺序写入，不做补偿
pub async fn persist<S: SubmissionStore + ?Sized>(
    store: &S,
    user_id: &str,
    valid: &ValidSubmission,
    score: &Score,
) -> Result<SubmissionReceipt, SubmissionError> {
    let quantity = i32::try_from(valid.quantity).map_err(|_| {
        SubmissionError::Validation(vec![FieldError {
            field: FormField::Quantity,
            message: "Quantity is too large",
        }])
    })?;

    let item_id = store
        .insert_item(NewItem {
            user_id: user_id.to_string(),
            item_name: valid.item_name.clone(),
            category: valid.category.clone(),
            condition: valid.condition.clone(),
            department: valid.department.clone(),
            description: valid.description.clone(),
            weight_kg: score.total_weight_kg,
            quantity,
            estimated_value: score.estimated_value,
            co2_saved: score.co2_saved,
            classification: score.classification,
        })
        .await
        .map_err(|e| {
            error!("写入物品失败 [{}]: {}", user_id, e);
            SubmissionError::persistence(PersistStage::InsertItem, e)
        })?;

    let qr_code = code_for(item_id, Utc::now().timestamp_millis());
    store
        .insert_qr_code(NewQrCode {
            item_id,
            qr_code_data: qr_code.clone(),
            location: Some(DEFAULT_QR_LOCATION.to_string()),
        })
        .await
        .map_err(|e| {
            error!("写入二维码失败 [item {}]: {}", item_id, e);
            SubmissionError::persistence(PersistStage::InsertQrCode, e)
        })?;

    let points = score.points();
    let profile = match store.credit_profile(user_id, points).await {
        Ok(Some(totals)) => totals,
        Ok(None) => {
            warn!("用户 {} 没有 profile，积分未入账 [item {}]", user_id, item_id);
            return Err(SubmissionError::ProfileNotFound {
                user_id: user_id.to_string(),
            });
        }
        Err(e) => {
            error!("积分入账失败 [{}]: {}", user_id, e);
            return Err(SubmissionError::persistence(PersistStage::CreditProfile, e));
        }
    };

    info!(
        "✓ 提交完成 [item {}] {} +{} 分 (累计 {})",
        item_id, qr_code, points, profile.points
    );

    Ok(SubmissionReceipt {
        item_id,
        qr_code,
        item_name: valid.item_name.clone(),
        classification: score.classification,
        estimated_value: score.estimated_value,
        co2_saved: score.co2_saved,
        points,
        profile,
    })
}
