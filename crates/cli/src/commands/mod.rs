//! Command implementations.

mod info;
mod parse;
mod replay;
mod stream;
mod validate;

pub use info::run_info;
pub use parse::run_parse;
pub use replay::run_replay;
pub use stream::run_stream;
pub use validate::run_validate;
