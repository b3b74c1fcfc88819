//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module      | Commands handled |
//! |-------------|------------------|
//! | `serve`     | `Serve`          |
//! | `complain`  | `Complain`       |
//! | `buy`       | `Buy`            |
//! | `config`    | `Config`         |
//!
//! `submit` holds the prompt-and-submit loop shared by the two forms.

pub mod buy;
pub mod complain;
pub mod config;
pub mod serve;
mod submit;

pub use buy::cmd_buy;
pub use complain::cmd_complain;
pub use config::cmd_config;
pub use serve::cmd_serve;
