pub mod app;
pub mod budget;
pub mod calendar;
pub mod categories;
pub mod client;
pub mod config;
pub mod entry;
pub mod errors;
pub mod handlers;
pub mod missions;
pub mod models;
pub mod onboarding;
pub mod period;
pub mod state;
pub mod ui;
pub mod views;

pub use app::router;
pub use client::{ApiClient, ClientError, FinanceApi};
pub use config::AppConfig;
pub use period::{BillingPeriodConfig, ResolvedPeriod, resolve_period};
pub use state::AppState;
