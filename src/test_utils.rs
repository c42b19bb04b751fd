// src/test_utils.rs
//
// Fakes em memória dos repositórios e um `World` com todos os serviços montados,
// para testar as regras sem Postgres.

use std::{
    cmp::Ordering,
    sync::{
        atomic::{AtomicBool, Ordering as AtomicOrdering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::normalize_category},
    db::{
        profile_repo::ensure_admin_remains, ActivityStore, BudgetStore, Entity, MessStore, Patch,
        ProfileDirectory, Repository,
    },
    models::{
        activity::{Activity, NewActivity},
        auth::CurrentUser,
        finance::{
            CategoryBudget, Expense, ExpenseFilter, MemberPayment, NewExpense, NewPayment,
            PaymentFilter,
        },
        inventory::{InventoryFilter, InventoryItem, NewInventoryItem, StockLevel},
        menu::{MenuFilter, MenuItem, NewMenuItem},
        tenancy::{
            MemberFilter, MemberPatch, Mess, MessPatch, MessScope, NewMember, NewMess, Profile,
            ProfileUpdate, Role,
        },
    },
    services::{
        activity_service::ActivityLogger,
        audit::Audited,
        change_feed::ChangeFeed,
        finance_service::FinanceService,
        inventory_service::InventoryService,
        member_service::MemberService,
        menu_service::MenuService,
        notification_service::NotificationCenter,
        report_cache::ReportCache,
        report_service::ReportService,
        tenancy_service::{MessService, TenantResolver},
    },
};

// ---
// Dados de exemplo
// ---

pub fn user() -> CurrentUser {
    let id = Uuid::new_v4();
    CurrentUser { id, email: Some(format!("{}@mess.test", id.simple())) }
}

pub fn admin_scope() -> MessScope {
    MessScope::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Role::Admin)
}

pub fn member_scope_in(mess_id: Uuid) -> MessScope {
    MessScope::new(mess_id, Uuid::new_v4(), Uuid::new_v4(), Role::Member)
}

// Dá tempo para as gravações em background (log de atividades) terminarem.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn sample_expense(mess_id: Uuid, title: &str, amount: i64) -> Expense {
    Expense {
        id: Uuid::new_v4(),
        mess_id,
        added_by: Uuid::new_v4(),
        title: title.into(),
        description: None,
        amount: Decimal::from(amount),
        category: "groceries".into(),
        expense_date: Utc::now().date_naive(),
        receipt_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_item(mess_id: Uuid, current: i64, minimum: i64) -> InventoryItem {
    InventoryItem {
        id: Uuid::new_v4(),
        mess_id,
        name: "Arroz".into(),
        category: "groceries".into(),
        unit: "kg".into(),
        current_stock: Decimal::from(current),
        minimum_stock: Decimal::from(minimum),
        cost_per_unit: Decimal::from(60),
        supplier: None,
        last_purchased: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_payment(mess_id: Uuid, member_id: Uuid, amount: Decimal) -> MemberPayment {
    MemberPayment {
        id: Uuid::new_v4(),
        mess_id,
        member_id,
        amount,
        payment_date: Utc::now().date_naive(),
        payment_method: Some("upi".into()),
        reference_number: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn new_expense_on(amount: i64, category: &str, on: NaiveDate) -> NewExpense {
    NewExpense {
        title: format!("Compra {}", category),
        description: None,
        amount: Decimal::from(amount),
        category: Some(category.into()),
        expense_date: Some(on),
        receipt_url: None,
    }
}

pub fn new_item(name: &str, current: i64, minimum: i64, cost: i64) -> NewInventoryItem {
    NewInventoryItem {
        name: name.into(),
        category: None,
        unit: None,
        current_stock: Decimal::from(current),
        minimum_stock: Decimal::from(minimum),
        cost_per_unit: Decimal::from(cost),
        supplier: None,
        last_purchased: None,
    }
}

// ---
// Repositórios com escopo de mess
// ---

type SharedProfiles = Arc<Mutex<Vec<Profile>>>;

/// O que um registro precisa para viver num `MemoryRepo`: as mesmas regras de
/// defaults, filtro e ordenação dos repositórios Postgres.
pub trait MemoryRecord: Entity {
    type New: Validate + Send + Sync + 'static;
    type Patch: Patch<Self> + Send + Sync + 'static;
    type Filter: Default + Send + Sync + 'static;

    fn build(scope: &MessScope, new: Self::New, profiles: &[Profile]) -> Result<Self, AppError>;
    fn owner(&self) -> Uuid;
    fn matches(&self, filter: &Self::Filter) -> bool;
    fn order(a: &Self, b: &Self) -> Ordering;
}

pub struct MemoryRepo<T> {
    rows: Mutex<Vec<T>>,
    profiles: SharedProfiles,
    fail_writes: AtomicBool,
}

impl<T> Default for MemoryRepo<T> {
    fn default() -> Self {
        Self::with_profiles(SharedProfiles::default())
    }
}

impl<T> MemoryRepo<T> {
    pub fn with_profiles(profiles: SharedProfiles) -> Self {
        Self { rows: Mutex::new(Vec::new()), profiles, fail_writes: AtomicBool::new(false) }
    }

    // Simula o banco fora do ar nas escritas.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, AtomicOrdering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(AtomicOrdering::SeqCst) {
            return Err(AppError::NetworkFailure("conexão recusada".into()));
        }
        Ok(())
    }
}

pub type MemoryExpenses = MemoryRepo<Expense>;

#[async_trait]
impl<T: MemoryRecord> Repository for MemoryRepo<T> {
    type Record = T;
    type New = T::New;
    type Patch = T::Patch;
    type Filter = T::Filter;

    async fn list(&self, scope: &MessScope, filter: &T::Filter) -> Result<Vec<T>, AppError> {
        let mut rows: Vec<T> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner() == scope.mess_id() && r.matches(filter))
            .cloned()
            .collect();
        rows.sort_by(T::order);
        Ok(rows)
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<T, AppError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id && r.owner() == scope.mess_id())
            .cloned()
            .ok_or(AppError::NotFound(T::LABEL))
    }

    async fn insert(&self, scope: &MessScope, new: T::New) -> Result<T, AppError> {
        self.check_writable()?;
        new.validate()?;
        let profiles = self.profiles.lock().unwrap().clone();
        let record = T::build(scope, new, &profiles)?;
        record.check()?;
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: T::Patch) -> Result<T, AppError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id() == id && r.owner() == scope.mess_id())
            .ok_or(AppError::NotFound(T::LABEL))?;

        let mut updated = row.clone();
        patch.apply(&mut updated);
        updated.check()?;
        *row = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.id() == id && r.owner() == scope.mess_id()));
        if rows.len() == before {
            return Err(AppError::NotFound(T::LABEL));
        }
        Ok(())
    }
}

impl MemoryRecord for Expense {
    type New = NewExpense;
    type Patch = crate::models::finance::ExpensePatch;
    type Filter = ExpenseFilter;

    fn build(scope: &MessScope, new: NewExpense, _profiles: &[Profile]) -> Result<Self, AppError> {
        Ok(Expense {
            id: Uuid::new_v4(),
            mess_id: scope.mess_id(),
            added_by: scope.user_id(),
            title: new.title.trim().to_string(),
            description: new.description,
            amount: new.amount,
            category: normalize_category(new.category.as_deref()),
            expense_date: new.expense_date.unwrap_or_else(|| Utc::now().date_naive()),
            receipt_url: new.receipt_url,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn owner(&self) -> Uuid {
        self.mess_id
    }

    fn matches(&self, filter: &ExpenseFilter) -> bool {
        filter.since.is_none_or(|since| self.expense_date >= since)
            && filter.until.is_none_or(|until| self.expense_date <= until)
            && filter
                .category
                .as_deref()
                .is_none_or(|c| self.category == normalize_category(Some(c)))
    }

    fn order(a: &Self, b: &Self) -> Ordering {
        b.expense_date.cmp(&a.expense_date).then(b.created_at.cmp(&a.created_at))
    }
}

impl MemoryRecord for MemberPayment {
    type New = NewPayment;
    type Patch = crate::models::finance::PaymentPatch;
    type Filter = PaymentFilter;

    fn build(scope: &MessScope, new: NewPayment, profiles: &[Profile]) -> Result<Self, AppError> {
        let is_member = profiles
            .iter()
            .any(|p| p.id == new.member_id && p.mess_id == Some(scope.mess_id()));
        if !is_member {
            return Err(AppError::PermissionDenied("O membro informado não pertence a este mess.".into()));
        }

        Ok(MemberPayment {
            id: Uuid::new_v4(),
            mess_id: scope.mess_id(),
            member_id: new.member_id,
            amount: new.amount,
            payment_date: new.payment_date.unwrap_or_else(|| Utc::now().date_naive()),
            payment_method: Some(new.payment_method.unwrap_or_else(|| "cash".into())),
            reference_number: new.reference_number,
            notes: new.notes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn owner(&self) -> Uuid {
        self.mess_id
    }

    fn matches(&self, filter: &PaymentFilter) -> bool {
        filter.member_id.is_none_or(|m| self.member_id == m)
            && filter.since.is_none_or(|since| self.payment_date >= since)
    }

    fn order(a: &Self, b: &Self) -> Ordering {
        b.payment_date.cmp(&a.payment_date).then(b.created_at.cmp(&a.created_at))
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default).to_string()
}

impl MemoryRecord for InventoryItem {
    type New = NewInventoryItem;
    type Patch = crate::models::inventory::InventoryPatch;
    type Filter = InventoryFilter;

    fn build(scope: &MessScope, new: NewInventoryItem, _profiles: &[Profile]) -> Result<Self, AppError> {
        Ok(InventoryItem {
            id: Uuid::new_v4(),
            mess_id: scope.mess_id(),
            name: new.name.trim().to_string(),
            category: or_default(new.category.as_deref(), "groceries"),
            unit: or_default(new.unit.as_deref(), "kg"),
            current_stock: new.current_stock,
            minimum_stock: new.minimum_stock,
            cost_per_unit: new.cost_per_unit,
            supplier: new.supplier,
            last_purchased: new.last_purchased,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn owner(&self) -> Uuid {
        self.mess_id
    }

    fn matches(&self, filter: &InventoryFilter) -> bool {
        let stock = match filter.stock {
            Some(StockLevel::Low) => self.is_low_stock(),
            Some(StockLevel::Out) => self.is_out_of_stock(),
            None => true,
        };
        stock && filter.category.as_deref().is_none_or(|c| self.category == c.trim())
    }

    fn order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name)
    }
}

impl MemoryRecord for MenuItem {
    type New = NewMenuItem;
    type Patch = crate::models::menu::MenuPatch;
    type Filter = MenuFilter;

    fn build(scope: &MessScope, new: NewMenuItem, _profiles: &[Profile]) -> Result<Self, AppError> {
        Ok(MenuItem {
            id: Uuid::new_v4(),
            mess_id: scope.mess_id(),
            name: new.name.trim().to_string(),
            description: new.description,
            category: new.category,
            day_of_week: new.day_of_week,
            is_active: new.is_active.unwrap_or(true),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn owner(&self) -> Uuid {
        self.mess_id
    }

    fn matches(&self, filter: &MenuFilter) -> bool {
        (!filter.active_only || self.is_active) && filter.day.is_none_or(|d| self.day_of_week == d)
    }

    fn order(a: &Self, b: &Self) -> Ordering {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then(a.category.cmp(&b.category))
            .then(a.name.cmp(&b.name))
    }
}

// ---
// Perfis: diretório por user_id e membros do mess, sobre o mesmo vetor
// ---

#[derive(Clone, Default)]
pub struct MemoryProfiles {
    rows: SharedProfiles,
}

impl MemoryProfiles {
    pub fn shared(&self) -> SharedProfiles {
        self.rows.clone()
    }
}

fn blank_profile(user_id: Uuid, full_name: Option<String>) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        user_id,
        full_name,
        phone: None,
        role: Role::Member,
        mess_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn admins_of(rows: &[Profile], mess_id: Uuid) -> Vec<Uuid> {
    rows.iter()
        .filter(|p| p.mess_id == Some(mess_id) && p.role == Role::Admin)
        .map(|p| p.id)
        .collect()
}

#[async_trait]
impl Repository for MemoryProfiles {
    type Record = Profile;
    type New = NewMember;
    type Patch = MemberPatch;
    type Filter = MemberFilter;

    async fn list(&self, scope: &MessScope, filter: &MemberFilter) -> Result<Vec<Profile>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.mess_id == Some(scope.mess_id()) && filter.role.is_none_or(|r| p.role == r))
            .cloned()
            .collect())
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<Profile, AppError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && p.mess_id == Some(scope.mess_id()))
            .cloned()
            .ok_or(AppError::NotFound(Profile::LABEL))
    }

    async fn insert(&self, _scope: &MessScope, _new: NewMember) -> Result<Profile, AppError> {
        Err(AppError::ConstraintViolation("Membros entram no mess pelo convite de entrada.".into()))
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: MemberPatch) -> Result<Profile, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let admins = admins_of(&rows, scope.mess_id());
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && p.mess_id == Some(scope.mess_id()))
            .ok_or(AppError::NotFound(Profile::LABEL))?;

        let mut updated = row.clone();
        patch.apply(&mut updated);
        updated.check()?;
        if updated.role < Role::Admin {
            ensure_admin_remains(&admins, id)?;
        }
        *row = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let admins = admins_of(&rows, scope.mess_id());
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && p.mess_id == Some(scope.mess_id()))
            .ok_or(AppError::NotFound(Profile::LABEL))?;
        ensure_admin_remains(&admins, id)?;
        row.mess_id = None;
        row.role = Role::Member;
        Ok(())
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfiles {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn ensure(&self, user_id: Uuid, full_name: Option<String>) -> Result<Profile, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|p| p.user_id == user_id) {
            return Ok(existing.clone());
        }
        let profile = blank_profile(user_id, full_name);
        rows.push(profile.clone());
        Ok(profile)
    }

    async fn assign_mess(&self, user_id: Uuid, mess_id: Uuid, role: Role) -> Result<Profile, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let profile = rows
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or(AppError::ProfileNotFound)?;
        profile.mess_id = Some(mess_id);
        profile.role = role;
        Ok(profile.clone())
    }

    async fn update_own(&self, user_id: Uuid, update: ProfileUpdate) -> Result<Profile, AppError> {
        update.validate()?;
        let mut rows = self.rows.lock().unwrap();
        let profile = rows
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or(AppError::ProfileNotFound)?;
        if update.full_name.is_some() {
            profile.full_name = update.full_name;
        }
        if update.phone.is_some() {
            profile.phone = update.phone;
        }
        Ok(profile.clone())
    }
}

// ---
// Stores sem escopo
// ---

pub struct MemoryMesses {
    rows: Mutex<Vec<Mess>>,
    profiles: SharedProfiles,
}

impl MemoryMesses {
    pub fn new(profiles: SharedProfiles) -> Self {
        Self { rows: Mutex::new(Vec::new()), profiles }
    }
}

#[async_trait]
impl MessStore for MemoryMesses {
    async fn get(&self, id: Uuid) -> Result<Mess, AppError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(AppError::NotFound("mess"))
    }

    async fn list_available(&self, limit: i64) -> Result<Vec<Mess>, AppError> {
        let mut messes = self.rows.lock().unwrap().clone();
        messes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messes.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(messes)
    }

    async fn create_with_admin(&self, user_id: Uuid, new: NewMess) -> Result<(Mess, Profile), AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.user_id == user_id && p.mess_id.is_none())
            .ok_or_else(|| AppError::ConstraintViolation("Você já pertence a um mess.".into()))?;

        let mess = Mess {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            description: new.description,
            address: new.address,
            created_by: Some(user_id),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        profile.mess_id = Some(mess.id);
        profile.role = Role::Admin;

        self.rows.lock().unwrap().push(mess.clone());
        Ok((mess, profile.clone()))
    }

    async fn update(&self, id: Uuid, patch: MessPatch) -> Result<Mess, AppError> {
        patch.validate()?;
        let mut rows = self.rows.lock().unwrap();
        let mess = rows.iter_mut().find(|m| m.id == id).ok_or(AppError::NotFound("mess"))?;
        if let Some(name) = patch.name {
            mess.name = name;
        }
        if patch.description.is_some() {
            mess.description = patch.description;
        }
        if patch.address.is_some() {
            mess.address = patch.address;
        }
        Ok(mess.clone())
    }
}

#[derive(Default)]
pub struct MemoryActivities {
    rows: Mutex<Vec<Activity>>,
    failing: bool,
}

impl MemoryActivities {
    pub fn failing() -> Self {
        Self { rows: Mutex::new(Vec::new()), failing: true }
    }

    pub fn all(&self) -> Vec<Activity> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityStore for MemoryActivities {
    async fn append(&self, activity: NewActivity) -> Result<Activity, AppError> {
        if self.failing {
            return Err(AppError::NetworkFailure("conexão recusada".into()));
        }
        let stored = Activity {
            id: Uuid::new_v4(),
            mess_id: activity.mess_id,
            user_id: activity.user_id,
            action: activity.action,
            description: activity.description,
            entity_type: activity.entity_type,
            entity_id: activity.entity_id,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_recent(&self, scope: &MessScope, limit: i64) -> Result<Vec<Activity>, AppError> {
        let mut recent: Vec<Activity> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.mess_id == scope.mess_id())
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(recent)
    }
}

#[derive(Default)]
pub struct MemoryBudgets {
    rows: Mutex<Vec<CategoryBudget>>,
}

#[async_trait]
impl BudgetStore for MemoryBudgets {
    async fn all(&self, scope: &MessScope) -> Result<Vec<CategoryBudget>, AppError> {
        let mut budgets: Vec<CategoryBudget> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.mess_id == scope.mess_id())
            .cloned()
            .collect();
        budgets.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(budgets)
    }

    async fn upsert(&self, scope: &MessScope, category: &str, monthly_amount: Decimal) -> Result<CategoryBudget, AppError> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|b| !(b.mess_id == scope.mess_id() && b.category == category));
        let budget = CategoryBudget {
            mess_id: scope.mess_id(),
            category: category.to_string(),
            monthly_amount,
            updated_at: Utc::now(),
        };
        rows.push(budget.clone());
        Ok(budget)
    }

    async fn remove(&self, scope: &MessScope, category: &str) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| !(b.mess_id == scope.mess_id() && b.category == category));
        if rows.len() == before {
            return Err(AppError::NotFound("orçamento"));
        }
        Ok(())
    }
}

// ---
// Todos os serviços montados sobre os fakes, como no AppState
// ---

pub struct World {
    pub resolver: TenantResolver,
    pub mess_service: MessService,
    pub member_service: MemberService,
    pub finance: FinanceService,
    pub inventory: InventoryService,
    pub menu: MenuService,
    pub report: ReportService,
    pub activities: Arc<MemoryActivities>,
    pub notifications: Arc<NotificationCenter>,
    pub feed: ChangeFeed,
    profiles: MemoryProfiles,
}

impl World {
    pub fn new() -> Self {
        let profiles = MemoryProfiles::default();
        let activities = Arc::new(MemoryActivities::default());
        let cache = ReportCache::new(Duration::from_secs(60));
        let logger = ActivityLogger::new(activities.clone(), cache.clone());
        let feed = ChangeFeed::new();

        let members = Arc::new(Audited::new(profiles.clone(), logger.clone(), cache.clone(), feed.clone()));
        let expenses = Arc::new(Audited::new(MemoryExpenses::default(), logger.clone(), cache.clone(), feed.clone()));
        let inventory = Arc::new(Audited::new(
            MemoryRepo::<InventoryItem>::default(),
            logger.clone(),
            cache.clone(),
            feed.clone(),
        ));
        let menu = Arc::new(Audited::new(MemoryRepo::<MenuItem>::default(), logger.clone(), cache.clone(), feed.clone()));
        let payments = Arc::new(Audited::new(
            MemoryRepo::<MemberPayment>::with_profiles(profiles.shared()),
            logger.clone(),
            cache.clone(),
            feed.clone(),
        ));

        let directory: Arc<dyn ProfileDirectory> = Arc::new(profiles.clone());

        Self {
            resolver: TenantResolver::new(directory.clone()),
            mess_service: MessService::new(
                Arc::new(MemoryMesses::new(profiles.shared())),
                directory,
                logger.clone(),
                cache.clone(),
            ),
            member_service: MemberService::new(members.clone()),
            finance: FinanceService::new(
                expenses.clone(),
                payments,
                members.clone(),
                Arc::new(MemoryBudgets::default()),
                cache.clone(),
            ),
            inventory: InventoryService::new(inventory.clone()),
            menu: MenuService::new(menu.clone()),
            report: ReportService::new(expenses, members, inventory, menu, logger.clone(), cache.clone()),
            activities,
            notifications: Arc::new(NotificationCenter::new()),
            feed: feed.clone(),
            profiles,
        }
    }

    /// Cria um usuário e um mess em que ele é admin.
    pub async fn mess_with_admin(&self, name: &str) -> (CurrentUser, Mess) {
        let founder = user();
        let mess = self
            .mess_service
            .create(&founder, NewMess { name: name.into(), description: None, address: None })
            .await
            .unwrap();
        (founder, mess)
    }

    /// Novo usuário entra no mess e, se pedido, recebe outro cargo.
    pub async fn join(&self, mess_id: Uuid, role: Role) -> (CurrentUser, MessScope) {
        let newcomer = user();
        self.mess_service.join(&newcomer, mess_id).await.unwrap();
        if role != Role::Member {
            self.profiles.assign_mess(newcomer.id, mess_id, role).await.unwrap();
        }
        let scope = self.resolver.resolve_scope(newcomer.id).await.unwrap();
        (newcomer, scope)
    }
}
