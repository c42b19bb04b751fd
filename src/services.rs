pub mod activity_service;
pub mod aggregation;
pub mod audit;
pub mod auth;
pub mod change_feed;
pub mod finance_service;
pub mod inventory_service;
pub mod member_service;
pub mod menu_service;
pub mod notification_service;
pub mod report_cache;
pub mod report_service;
pub mod tenancy_service;
