pub mod order;

pub use order::{
    Order, OrderFilter, OrderLine, OrderPatch, OrderRow, OrderSort, OrderStatus, PricedLines,
};
