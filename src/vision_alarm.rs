pub mod core;
pub mod feedback;
pub mod main;
pub mod render;
pub mod run;
pub mod run_effect;
pub mod trigger;
