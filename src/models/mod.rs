pub mod item;
pub mod mission;
pub mod worker;

pub use item::Item;
pub use mission::{Mission, MissionRecord};
pub use worker::{NewWorker, Worker};
