pub mod item;
pub mod mission;
pub mod worker;
