pub mod product;

pub use product::{
    Product, ProductFilter, ProductPatch, ProductRow, ProductSort, Promotion, Variant,
};
