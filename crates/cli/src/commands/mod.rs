pub mod copy;
pub mod uuid;
