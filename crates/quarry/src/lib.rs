//! # quarry
//!
//! A dialect-neutral SQL statement compiler and cursor-to-struct result mapper.
//!
//! ## Features
//!
//! - **Structured queries**: describe selects, inserts, updates and deletes as data
//! - **Dialect injection**: quoting and placeholder style come from a [`Config`]
//! - **Aligned arguments**: placeholders and arguments always match 1:1, in order
//! - **Cursor mapping**: decode rows into structs, tolerating unknown columns
//! - **Fan-out scans**: split one joined result into several keyed collections
//!
//! ## Compiling statements
//!
//! ```ignore
//! use quarry::{Builder, Changes, Config, FilterQuery, Query};
//!
//! let config = Config::postgres();
//!
//! let stmt = Builder::new(&config).find(
//!     &Query::new("users")
//!         .filter(FilterQuery::eq("status", "active"))
//!         .sort_desc("created_at")
//!         .limit(10),
//! );
//! // SELECT * FROM "users" WHERE "status"=$1 ORDER BY "created_at" DESC LIMIT 10;
//!
//! let stmt = Builder::new(&config).update(
//!     "users",
//!     &Changes::new().set("name", "alice").increment("logins", 1),
//!     &FilterQuery::eq("id", 7),
//! );
//! // UPDATE "users" SET "name"=$1,"logins"="logins"+$2 WHERE "id"=$3;
//! ```
//!
//! ## Mapping rows
//!
//! ```ignore
//! use quarry::{Document, scan_all};
//!
//! #[derive(Default, Document)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let mut users: Vec<User> = Vec::new();
//! scan_all(&mut cursor, &mut users)?;
//! ```

pub mod builder;
pub mod changes;
pub mod config;
pub mod cursor;
pub mod error;
pub mod escape;
pub mod filter;
pub mod mapper;
pub mod query;
pub mod scan;
pub mod value;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use builder::{Builder, Statement};
pub use changes::{Change, Changes};
pub use config::Config;
pub use cursor::{CallCounts, Cursor, CursorGuard, MemoryCursor};
pub use error::{OrmError, OrmResult, ScanError};
pub use escape::{UNESCAPE_CHARACTER, escape};
pub use filter::{ComparisonOp, FilterQuery};
pub use mapper::{scan_all, scan_multi, scan_one};
pub use query::{GroupQuery, JoinQuery, Query, SelectQuery, SortQuery};
pub use scan::{Collection, Discard, Document, Scanner};
pub use value::Value;

#[cfg(feature = "postgres")]
pub use postgres::{GenericClient, PgCursor};

#[cfg(feature = "derive")]
pub use quarry_derive::Document;
