pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::{aggregate, is_merge, lower_median, resolve_identity};
pub use exec::{analyze_activity, exec};
pub use output::output_table;
