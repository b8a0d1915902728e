use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    BranchNotFound(String),
    Git { command: String, stderr: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::BranchNotFound(name) => {
                write!(f, "fatal: no branch named '{}' found in this repo", name)
            }
            Error::Git { command, stderr } => {
                if stderr.is_empty() {
                    write!(f, "git {} failed", command)
                } else {
                    write!(f, "git {} failed: {}", command, stderr)
                }
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
