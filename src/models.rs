pub mod activity;
pub mod auth;
pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod menu;
pub mod notification;
pub mod tenancy;
