//! Checker domain types: call options, decoded events, errors

mod error;
mod opts;
mod record;
mod request;

pub use error::{CheckerError, ContractRevert};
pub use opts::{CallOpts, FilterOpts, TransactOpts, WatchOpts};
pub use record::{event_name, is_checker_event, EventRecord};
pub use request::{requests_for, EntitlementCheckRequest, RequestVersion};
