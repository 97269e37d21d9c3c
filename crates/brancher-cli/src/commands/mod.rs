mod build;
mod identity;
mod pipeline;

pub use build::build;
