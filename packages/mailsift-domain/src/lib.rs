pub mod duplicate;
pub mod entities;
pub mod input;
pub mod phrases;
pub mod retry;
pub mod similarity;
