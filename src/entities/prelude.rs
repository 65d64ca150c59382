pub use super::items::Entity as Items;
pub use super::missions::Entity as Missions;
pub use super::worker_tokens::Entity as WorkerTokens;
pub use super::workers::Entity as Workers;
