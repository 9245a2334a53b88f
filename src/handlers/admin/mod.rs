pub mod categories;
pub mod industries;
pub mod intake;
pub mod products;
pub mod session;
pub mod setup;
pub mod uploads;
