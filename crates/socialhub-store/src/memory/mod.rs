//! DashMap-backed stores.

pub mod notification;
pub mod room;
pub mod user;
