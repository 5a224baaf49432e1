pub mod categories;
pub mod dashboard;
pub mod messages;
pub mod orders;
pub mod products;
