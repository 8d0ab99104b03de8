pub mod admin;
pub mod frontend;
pub mod release;
