pub mod matcher;
pub mod prompt;
pub mod scanner;
pub mod session;
