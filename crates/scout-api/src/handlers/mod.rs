pub mod health;
pub mod scout;
