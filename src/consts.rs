//! Shared constants for the page behaviors.

// ── Timing ──────────────────────────────────────────────────────

/// Delay between clearing the live region and writing the new message.
pub const ANNOUNCE_DELAY_MS: u32 = 50;

/// Floor for the announcement delay; a zero delay can coalesce with the clear.
pub const MIN_ANNOUNCE_DELAY_MS: u32 = 1;

/// How long a toast stays visible after its most recent trigger.
pub const TOAST_DURATION_MS: u32 = 2500;

/// How long a copy control shows its "Copied!" confirmation.
pub const COPY_FLASH_MS: u32 = 1200;

/// Per-card delay for the staggered fade-in.
pub const CARD_STAGGER_MS: u32 = 200;

// ── Scrollspy ───────────────────────────────────────────────────

/// Observer margins: a section is current between 40% from the top and 50% from the bottom.
pub const SCROLLSPY_ROOT_MARGIN: &str = "-40% 0px -50% 0px";

/// Fraction of a section that must be inside the band to count as intersecting.
pub const SCROLLSPY_THRESHOLD: f64 = 0.01;

// ── Markup contract ─────────────────────────────────────────────

pub const SHOW_CLASS: &str = "show";
pub const ACTIVE_CLASS: &str = "active";

pub const BACKDROP_SELECTOR: &str = ".modal-backdrop";
pub const DIALOG_SELECTOR: &str = ".modal";

pub const OPEN_MODAL_ATTR: &str = "data-open-modal";
pub const CLOSE_MODAL_ATTR: &str = "data-close-modal";
pub const SHOW_TOAST_ATTR: &str = "data-show-toast";

pub const NAV_LINK_SELECTOR: &str = ".guide-sidebar .nav-link";
pub const SECTION_SELECTOR: &str = ".guide-content .section";
pub const CARD_SELECTOR: &str = ".card";
pub const BUTTON_SELECTOR: &str = ".btn";

pub const COPY_CODE_SELECTOR: &str = ".copy-code";
pub const COPY_TOKEN_SELECTOR: &str = ".copy-token";
pub const COPY_COLOR_TOKENS_ID: &str = "copyColorTokens";

pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const THEME_ATTR: &str = "data-theme";
pub const THEME_STORAGE_KEY: &str = "theme";

// ── Copy ────────────────────────────────────────────────────────

pub const TOAST_MESSAGE: &str = "Saved successfully";
pub const COPIED_LABEL: &str = "Copied!";
pub const COPIED_ANNOUNCEMENT: &str = "Copied to clipboard";

/// Design tokens written by the "copy all color tokens" control.
pub const COLOR_TOKENS_CSS: &str = ":root {
  --primary: #1F4E79;
  --secondary: #E87722;
  --tertiary: #8B9CA7;
  --danger: #E24A3B;
  --background: #FFFFFF;
  --text: #333333;
  --surface: #F5F5F5;
  --border: #E0E0E0;
}";

// ── Effects ─────────────────────────────────────────────────────

pub const COLOR_TRANSITION: &str = "background-color 0.3s ease, color 0.3s ease, border-color 0.3s ease";
pub const CARD_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";
pub const HOVER_TRANSFORM: &str = "translateY(-2px)";
pub const HOVER_SHADOW: &str = "0 4px 8px rgba(0, 0, 0, 0.2)";
pub const REST_TRANSFORM: &str = "translateY(0)";
pub const REST_SHADOW: &str = "0 2px 4px rgba(0, 0, 0, 0.1)";
pub const CARD_HIDDEN_TRANSFORM: &str = "translateY(20px)";
