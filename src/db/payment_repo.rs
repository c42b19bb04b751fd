// src/db/payment_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_scoped, error::AppError, validation::ensure_not_negative},
    db::repository::{Entity, Patch, Repository},
    models::{
        finance::{MemberPayment, NewPayment, PaymentFilter, PaymentPatch},
        notification::{ChangedRecord, Table},
        tenancy::MessScope,
    },
};

impl Entity for MemberPayment {
    const NAME: &'static str = "payment";
    const LABEL: &'static str = "pagamento";
    const TABLE: Table = Table::MemberPayments;

    fn id(&self) -> Uuid {
        self.id
    }

    fn summary(&self) -> String {
        match self.payment_method.as_deref() {
            Some(method) => format!("{} via {}", self.amount, method),
            None => self.amount.to_string(),
        }
    }

    fn check(&self) -> Result<(), AppError> {
        ensure_not_negative("amount", self.amount)
    }

    fn to_change(&self) -> ChangedRecord {
        ChangedRecord::Payment(self.clone())
    }
}

impl Patch<MemberPayment> for PaymentPatch {
    fn apply(self, payment: &mut MemberPayment) {
        if let Some(amount) = self.amount {
            payment.amount = amount;
        }
        if let Some(payment_date) = self.payment_date {
            payment.payment_date = payment_date;
        }
        if let Some(method) = self.payment_method {
            payment.payment_method = Some(method);
        }
        if let Some(reference) = self.reference_number {
            payment.reference_number = Some(reference);
        }
        if let Some(notes) = self.notes {
            payment.notes = Some(notes);
        }
    }
}

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PaymentRepository {
    type Record = MemberPayment;
    type New = NewPayment;
    type Patch = PaymentPatch;
    type Filter = PaymentFilter;

    async fn list(&self, scope: &MessScope, filter: &PaymentFilter) -> Result<Vec<MemberPayment>, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM member_payments WHERE mess_id = ");
        qb.push_bind(scope.mess_id());
        if let Some(member_id) = filter.member_id {
            qb.push(" AND member_id = ").push_bind(member_id);
        }
        if let Some(since) = filter.since {
            qb.push(" AND payment_date >= ").push_bind(since);
        }
        qb.push(" ORDER BY payment_date DESC, created_at DESC");

        let payments = qb.build_query_as::<MemberPayment>().fetch_all(&mut *tx).await?;
        tx.commit().await?;
        Ok(payments)
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<MemberPayment, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let payment = sqlx::query_as::<_, MemberPayment>(
            "SELECT * FROM member_payments WHERE id = $1 AND mess_id = $2",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(MemberPayment::LABEL))?;

        tx.commit().await?;
        Ok(payment)
    }

    async fn insert(&self, scope: &MessScope, new: NewPayment) -> Result<MemberPayment, AppError> {
        new.validate()?;
        let mut tx = begin_scoped(&self.pool, scope).await?;

        // O membro precisa pertencer ao mesmo mess
        let is_member: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM profiles WHERE id = $1 AND mess_id = $2)",
        )
            .bind(new.member_id)
            .bind(scope.mess_id())
            .fetch_one(&mut *tx)
            .await?;

        if !is_member {
            return Err(AppError::PermissionDenied(
                "O membro informado não pertence a este mess.".into(),
            ));
        }

        let payment = sqlx::query_as::<_, MemberPayment>(
            r#"
            INSERT INTO member_payments (mess_id, member_id, amount, payment_date, payment_method, reference_number, notes)
            VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE), COALESCE($5, 'cash'), $6, $7)
            RETURNING *
            "#,
        )
            .bind(scope.mess_id())
            .bind(new.member_id)
            .bind(new.amount)
            .bind(new.payment_date)
            .bind(new.payment_method)
            .bind(new.reference_number)
            .bind(new.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(payment)
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: PaymentPatch) -> Result<MemberPayment, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let mut payment = sqlx::query_as::<_, MemberPayment>(
            "SELECT * FROM member_payments WHERE id = $1 AND mess_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(MemberPayment::LABEL))?;

        patch.apply(&mut payment);
        payment.check()?;

        let updated = sqlx::query_as::<_, MemberPayment>(
            r#"
            UPDATE member_payments
            SET amount = $3, payment_date = $4, payment_method = $5,
                reference_number = $6, notes = $7, updated_at = NOW()
            WHERE id = $1 AND mess_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(scope.mess_id())
            .bind(payment.amount)
            .bind(payment.payment_date)
            .bind(&payment.payment_method)
            .bind(&payment.reference_number)
            .bind(&payment.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let result = sqlx::query("DELETE FROM member_payments WHERE id = $1 AND mess_id = $2")
            .bind(id)
            .bind(scope.mess_id())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(MemberPayment::LABEL));
        }

        tx.commit().await?;
        Ok(())
    }
}
