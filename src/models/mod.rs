pub mod audit;
pub mod domain;
pub mod event;
pub mod health;
pub mod notify;
pub mod party;
pub mod receipt;
pub mod response;
pub mod status;
