pub mod ack;
pub mod input;
pub mod limit;
pub mod parse;
