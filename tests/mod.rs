#[allow(dead_code)]
mod common;

mod notify_client_tests;
