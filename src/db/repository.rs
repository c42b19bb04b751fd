// src/db/repository.rs

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::{
        activity::{Activity, NewActivity},
        finance::{
            CategoryBudget, Expense, ExpenseFilter, ExpensePatch, MemberPayment, NewExpense,
            NewPayment, PaymentFilter, PaymentPatch,
        },
        inventory::{InventoryFilter, InventoryItem, InventoryPatch, NewInventoryItem},
        menu::{MenuFilter, MenuItem, MenuPatch, NewMenuItem},
        notification::{ChangedRecord, Table},
        tenancy::{
            MemberFilter, MemberPatch, Mess, MessPatch, MessScope, NewMember, NewMess, Profile,
            ProfileUpdate, Role,
        },
    },
};

// ---
// Entidade persistida em uma tabela do mess
// ---
pub trait Entity: Clone + Send + Sync + 'static {
    /// Prefixo das actions de auditoria ("expense" => "expense_created").
    const NAME: &'static str;
    /// Nome legível usado em mensagens ("despesa").
    const LABEL: &'static str;
    const TABLE: Table;

    fn id(&self) -> Uuid;

    // Descrição curta do registro para o log de atividades.
    fn summary(&self) -> String;

    /// Invariantes do registro completo, checadas depois de aplicar um patch.
    fn check(&self) -> Result<(), AppError>;

    fn to_change(&self) -> ChangedRecord;
}

// Atualização parcial: só os campos presentes são aplicados.
pub trait Patch<R> {
    fn apply(self, record: &mut R);
}

// ---
// Contrato dos repositórios com escopo de mess
// ---
// Todo método recebe o MessScope; o mess_id nunca vem do cliente.
#[async_trait]
pub trait Repository: Send + Sync {
    type Record: Entity;
    type New: Validate + Send + Sync + 'static;
    type Patch: Patch<Self::Record> + Send + Sync + 'static;
    type Filter: Default + Send + Sync + 'static;

    async fn list(&self, scope: &MessScope, filter: &Self::Filter) -> Result<Vec<Self::Record>, AppError>;

    /// Registro de outro mess é indistinguível de registro inexistente (NotFound).
    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<Self::Record, AppError>;

    async fn insert(&self, scope: &MessScope, new: Self::New) -> Result<Self::Record, AppError>;

    async fn update(&self, scope: &MessScope, id: Uuid, patch: Self::Patch) -> Result<Self::Record, AppError>;

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError>;
}

// Permite compartilhar um repositório (inclusive `dyn Repository`) entre serviços e decoradores.
#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    type Record = R::Record;
    type New = R::New;
    type Patch = R::Patch;
    type Filter = R::Filter;

    async fn list(&self, scope: &MessScope, filter: &Self::Filter) -> Result<Vec<Self::Record>, AppError> {
        (**self).list(scope, filter).await
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<Self::Record, AppError> {
        (**self).get(scope, id).await
    }

    async fn insert(&self, scope: &MessScope, new: Self::New) -> Result<Self::Record, AppError> {
        (**self).insert(scope, new).await
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: Self::Patch) -> Result<Self::Record, AppError> {
        (**self).update(scope, id, patch).await
    }

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        (**self).delete(scope, id).await
    }
}

pub type ExpenseRepo = Arc<
    dyn Repository<Record = Expense, New = NewExpense, Patch = ExpensePatch, Filter = ExpenseFilter>,
>;
pub type PaymentRepo = Arc<
    dyn Repository<Record = MemberPayment, New = NewPayment, Patch = PaymentPatch, Filter = PaymentFilter>,
>;
pub type InventoryRepo = Arc<
    dyn Repository<Record = InventoryItem, New = NewInventoryItem, Patch = InventoryPatch, Filter = InventoryFilter>,
>;
pub type MenuRepo =
    Arc<dyn Repository<Record = MenuItem, New = NewMenuItem, Patch = MenuPatch, Filter = MenuFilter>>;
pub type MemberRepo =
    Arc<dyn Repository<Record = Profile, New = NewMember, Patch = MemberPatch, Filter = MemberFilter>>;

// ---
// Stores sem escopo de mess (o usuário ainda pode não ter um)
// ---

/// Perfis indexados pelo user_id do provedor de identidade.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Cria o perfil no primeiro acesso. Idempotente.
    async fn ensure(&self, user_id: Uuid, full_name: Option<String>) -> Result<Profile, AppError>;

    async fn assign_mess(&self, user_id: Uuid, mess_id: Uuid, role: Role) -> Result<Profile, AppError>;

    async fn update_own(&self, user_id: Uuid, update: ProfileUpdate) -> Result<Profile, AppError>;
}

#[async_trait]
pub trait MessStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Mess, AppError>;

    async fn list_available(&self, limit: i64) -> Result<Vec<Mess>, AppError>;

    /// Cria o mess e torna o criador admin, na mesma transação.
    async fn create_with_admin(&self, user_id: Uuid, new: NewMess) -> Result<(Mess, Profile), AppError>;

    async fn update(&self, id: Uuid, patch: MessPatch) -> Result<Mess, AppError>;
}

/// Log de auditoria: só inserção e leitura.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn append(&self, activity: NewActivity) -> Result<Activity, AppError>;

    async fn list_recent(&self, scope: &MessScope, limit: i64) -> Result<Vec<Activity>, AppError>;
}

#[async_trait]
pub trait BudgetStore: Send + Sync {
    async fn all(&self, scope: &MessScope) -> Result<Vec<CategoryBudget>, AppError>;

    async fn upsert(&self, scope: &MessScope, category: &str, monthly_amount: Decimal) -> Result<CategoryBudget, AppError>;

    async fn remove(&self, scope: &MessScope, category: &str) -> Result<(), AppError>;
}
