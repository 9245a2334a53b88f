pub mod auth;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod intake;
pub mod middleware;
pub mod ratelimit;
pub mod search;
pub mod state;
pub mod storage;

#[cfg(test)]
pub mod testing;
