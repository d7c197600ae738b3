// Re-export model modules
mod company;
mod statements;

pub use company::*;
pub use statements::*;
