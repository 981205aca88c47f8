pub mod deps;
pub mod dump;
pub mod externals;
pub mod frameworks;
pub mod owner;
pub mod reduce;
