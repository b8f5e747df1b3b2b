use shadow_rs::shadow;

shadow!(build);

// Errors
// ------
pub mod error;
pub use error::Error;

// Problems and where they come from
// ---------------------------------
pub mod problems;
pub mod source;

// Search internals
// ----------------
pub mod frontier;
pub mod search;
pub mod solution;

// Algorithms
// ----------
pub mod algorithms;

// Output
// ------
pub mod observer;
pub mod renderer;
