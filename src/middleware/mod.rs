pub mod admin_gate;
pub mod response;
