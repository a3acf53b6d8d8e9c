pub mod config;
pub mod finish;
pub mod launch;
pub mod reset;
pub mod seed;
pub mod state;
pub mod stop;
pub mod visit;
pub mod walk;
