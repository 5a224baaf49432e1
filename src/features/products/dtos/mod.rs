pub mod product_dto;

pub use product_dto::{
    CreateProductDto, ProductQueryParams, ProductResponseDto, UpdateProductDto, UploadProductDto,
};
