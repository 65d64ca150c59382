pub mod prelude;

pub mod items;
pub mod missions;
pub mod worker_tokens;
pub mod workers;
