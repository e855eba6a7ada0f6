pub mod notify;
pub mod query;
pub mod registry;
