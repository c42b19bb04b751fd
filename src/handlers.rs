pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod members;
pub mod menu;
pub mod notifications;
pub mod tenancy;
