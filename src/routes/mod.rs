/// Router Module Index
///
/// Routes are grouped by the access gate they sit behind. The gate is applied per module
/// (route layer or extractor), so adding a handler to the wrong module is the only way to
/// expose it by accident.

/// Routes open to anonymous visitors: scoreboards, print layouts, health.
pub mod public;

/// Routes behind the `AuthUser` middleware layer.
pub mod authenticated;

/// Routes whose handlers take the `AdminUser` extractor.
pub mod admin;
