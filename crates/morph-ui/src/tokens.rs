//! Design tokens for the navigation chrome
//!
//! Constant values shared by the default style and the configuration
//! defaults.

// =============================================================================
// Navigation Bar
// =============================================================================

/// Navigation bar geometry
pub mod bar {
    /// Bar height for the regular vertical size class
    pub const REGULAR_HEIGHT: f32 = 48.0;
    /// Bar height for the compact vertical size class
    pub const COMPACT_HEIGHT: f32 = 36.0;
    /// Leading inset when no back button is shown
    pub const LEADING_PADDING: f32 = 16.0;
    /// Leading inset when the back button is shown
    pub const LEADING_PADDING_WITH_BACK: f32 = 8.0;
    /// Trailing inset
    pub const TRAILING_PADDING: f32 = 16.0;
}

// =============================================================================
// Animation Tokens
// =============================================================================

/// Animation duration tokens (in milliseconds)
pub mod duration {
    /// Slow (300ms), used for page transitions
    pub const SLOW: u32 = 300;
}

/// Easing functions
pub mod easing {
    /// Default easing curve (cubic-bezier)
    pub const DEFAULT: &str = "cubic-bezier(0.17, 0.73, 0.14, 1)";
}
