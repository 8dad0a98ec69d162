pub mod fixed_timestep;

pub use fixed_timestep::FixedTimeStep;
