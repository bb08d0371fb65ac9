pub mod chat;
pub mod generate;
pub mod keygen;
pub mod token;
