pub mod order_dto;

pub use order_dto::{CreateOrderDto, OrderQueryParams, OrderResponseDto, UpdateOrderDto};
