pub mod config;
pub mod locator;
pub mod types;
pub mod utils;

// `config` 同时是依赖 crate 的名字
pub use self::config::*;
pub use locator::*;
pub use types::*;
pub use utils::*;
