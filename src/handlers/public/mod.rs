pub mod catalog;
pub mod intake;
pub mod search;
