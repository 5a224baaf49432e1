pub mod category;

pub use category::{Category, CategoryFilter, CategoryPatch, CategoryRow, CategorySort};
