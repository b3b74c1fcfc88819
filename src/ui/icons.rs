//! Shared UI icons.
//!
//! Each icon has a plain-text fallback for terminals without emoji support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

// Form indicators
pub static PENCIL: Emoji<'_, '_> = Emoji("📝 ", "");
pub static CART: Emoji<'_, '_> = Emoji("🛒 ", "");
pub static TRUCK: Emoji<'_, '_> = Emoji("🚚 ", "");
