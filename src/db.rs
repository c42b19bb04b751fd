pub mod repository;
pub use repository::{
    ActivityStore, BudgetStore, Entity, ExpenseRepo, InventoryRepo, MemberRepo, MenuRepo,
    MessStore, Patch, PaymentRepo, ProfileDirectory, Repository,
};

pub mod activity_repo;
pub use activity_repo::ActivityRepository;
pub mod budget_repo;
pub use budget_repo::BudgetRepository;
pub mod expense_repo;
pub use expense_repo::ExpenseRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod menu_repo;
pub use menu_repo::MenuRepository;
pub mod mess_repo;
pub use mess_repo::MessRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod profile_repo;
pub use profile_repo::ProfileRepository;
