//! Intake server: validated complaint and order submissions.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐   HTTP   ┌──────────────────────────────────────────────────┐
//! │  Client  │ ───────> │  server.rs  (axum Router, ServerConfig)          │
//! │  (forms) │ <─────── │    └─ api.rs  (route handlers, AppState)         │
//! └──────────┘          │         │                                        │
//!                       │         │ Validate::validate()  (shared schema)  │
//!                       │         v                                        │
//!                       │  store.rs  (Storage trait, MemStorage)           │
//!                       └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Request Flow (`POST /api/orders`)
//!
//! 1. `api::create_order()` receives the raw JSON body.
//! 2. The body is re-validated against `InsertOrder`'s schema. Failures go
//!    back as `400` with one message per field and never touch the store.
//! 3. `Storage::create_order()` assigns a fresh id and stores the record.
//! 4. The stored record is returned as `201 Created`.

pub mod api;
pub mod server;
pub mod store;
