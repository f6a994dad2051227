//! Workspace integration tests: a real `RealtimeEngine` over in-memory
//! stores, driven through in-process channel transports.

mod helpers;

mod delivery_test;
mod notification_test;
mod presence_test;
mod room_test;
