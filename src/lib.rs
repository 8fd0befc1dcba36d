//! # Office-hours queue for chat bots
//!
//! A help queue for a chat channel: an instructor opens a session, students join
//! with an optional question, and the instructor calls them one at a time.
//! Sessions and requests are persisted with [Sea-ORM](https://crates.io/crates/sea-orm).
//!
//! The crate is transport agnostic. Plug a chat platform in by implementing
//! [`ChatTransport`], and storage by implementing [`QueueStore`] or using the
//! bundled [`SeaOrmStore`].
//!
//! ## Features
//!
//! - One active session per channel, with commands serialized through a single lock
//! - First-come first-served ordering with a validated `Waiting → Conversing → Resolved` lifecycle
//! - Public and private join requests
//! - Every change persisted before it is applied in memory
//! - Migrations for PostgreSQL or SQLite via `sea-orm-migration` (feature `migration`)
//!
//! ## Commands
//!
//! | Text                                  | Effect                                        |
//! |---------------------------------------|-----------------------------------------------|
//! | `start office hour`                   | Open a session in this channel                |
//! | `end office hour`                     | Close the channel's session                   |
//! | `join office hours [question]`        | Join the queue                                |
//! | `private join office hours [question]`| Join without showing the question to others   |
//! | `leave office hours`                  | Leave the queue while still waiting           |
//! | `get queue position`                  | Show your 1-based position                    |
//! | `view active queue`                   | List everyone in the queue                    |
//! | `get next student`                    | Call the earliest waiting student             |
//! | `mark student complete`               | Finish with the student being helped          |
//! | `my office hours`                     | List the sessions you have held here          |
//!
//! ## Quick Start
//!
//! ```no_run
//! use office_hours_queue::migration::{Migrator, MigratorTrait};
//! use office_hours_queue::{ChatTransport, Config, Inbound, OfficeHours, SeaOrmStore};
//!
//! # async fn example<T: ChatTransport>(transport: T, inbound: Inbound) -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let conn = config.connect().await?;
//! Migrator::up(&conn, None).await?;
//!
//! let bot = OfficeHours::new(SeaOrmStore::new(conn), transport);
//! bot.respond(&inbound).await?;
//! # Ok(())
//! # }
//! ```

pub mod command;
mod config;
mod controller;
pub mod entity;
mod entry;
mod error;
#[cfg(feature = "migration")]
pub mod migration;
mod queue;
pub mod registry;
mod store;
mod transport;

pub use command::Command;
pub use config::{Config, ConfigError};
pub use controller::OfficeHours;
pub use entry::{EntryOptions, QueueEntry, StudentStatus};
pub use error::{Precondition, QueueError, StoreError, TransportError};
pub use queue::{Queue, QueueStatus};
pub use registry::SessionRegistry;
pub use store::{QueueStore, SeaOrmStore};
pub use transport::{ChatTransport, Inbound, Member, Reply};
