pub mod health;
pub mod shorten;
