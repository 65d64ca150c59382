mod report;
mod revoke;

pub use report::cmd_report;
pub use revoke::cmd_revoke;
