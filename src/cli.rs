//! CLI domain: parse, route, output and presentation only.
//! Job resolution and fetching live in their own modules.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::Cli;
pub use presentation::format_batch_summary;
pub use route::RunContext;
