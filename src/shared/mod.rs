pub mod constants;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
pub mod upload;
pub mod validation;
