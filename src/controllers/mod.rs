pub mod health;
pub mod voice;
