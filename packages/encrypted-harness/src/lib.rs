pub mod config;
pub mod error;
pub mod executor;
pub mod expected;
pub mod fixture;
pub mod harness;
pub mod literal;
pub mod log;
pub mod matcher;
pub mod mode;
pub mod param;
pub mod row;
pub mod tls;

pub use crate::config::{HarnessConfig, LogConfig};
pub use crate::error::Error;
pub use crate::executor::{Executor, Isolated, Session};
pub use crate::expected::{Expected, Observed};
pub use crate::fixture::{random_id, Fixture};
pub use crate::harness::{for_each_mode, ModeRun};
pub use crate::log::init;
pub use crate::matcher::{verify, CallForm, Query};
pub use crate::mode::Mode;
pub use crate::param::{Domain, Param, Selector};
pub use crate::row::{Column, Payload, ResultRow};

#[cfg(test)]
pub mod test_helpers;
