pub mod chain;
pub mod error;
pub mod feature;
pub mod io;
pub mod region;
pub mod summary;
