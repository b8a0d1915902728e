mod command;
mod traits;

pub use command::CommandGit;
pub use traits::GitBackend;

#[cfg(test)]
pub mod fake;
