pub mod net;
pub mod poll;
