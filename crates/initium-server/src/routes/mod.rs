pub mod health;
pub mod pages;
pub mod script;
pub mod stats;
pub mod track;
