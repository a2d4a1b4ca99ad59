pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod session;

pub use config::Config;
pub use datasource::{BinanceDataSource, Credentials, DataSource, DataSourceError, MockDataSource};
pub use domain::{Decimal, Fill, IncomeRecord, IncomeType, Side, Symbol, TimeMs};
pub use engine::{aggregate, bucket_daily, summarize, summarize_calendar, Lifecycle};
pub use error::AppError;
pub use session::SessionStore;
