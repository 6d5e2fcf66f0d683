pub mod config;
pub mod entity;
pub mod event;
pub mod grid;
pub mod net;
pub mod protocol;
pub mod scheduler;
pub mod systems;
pub mod world;

pub use config::MatchConfig;
pub use scheduler::TickScheduler;
pub use world::World;
