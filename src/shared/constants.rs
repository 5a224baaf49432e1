/// Default page size for list queries
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// DASHBOARD
// =============================================================================

/// Number of new orders / unread messages shown on the dashboard
pub const DASHBOARD_ITEMS: i64 = 7;

// =============================================================================
// IMAGE UPLOADS
// =============================================================================

/// Maximum image upload size (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Allowed MIME types for image uploads
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

// =============================================================================
// MONEY
// =============================================================================

/// Decimal places kept for prices and totals (`NUMERIC(12, 2)`)
pub const AMOUNT_SCALE: u32 = 2;

/// Prices and totals must stay below 10^10 (`NUMERIC(12, 2)`)
pub const AMOUNT_INTEGER_DIGITS: u32 = 10;
