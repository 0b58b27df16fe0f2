//! Shared configuration constants for the competitor monitor
//!
//! Default values and extraction limits used throughout the pipeline so the
//! same numbers are not repeated across modules.

/// Chrome user agent string sent by the headless browser
///
/// Matches a current Windows desktop Chrome so competitor sites serve their
/// regular desktop layout.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Default navigation timeout in seconds
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 15;

/// Default wait for `document.body` after navigation (seconds)
///
/// Independent of, and shorter than, the page timeout.
pub const DEFAULT_READY_WAIT_SECS: u64 = 5;

/// Settle delay after navigation so client-rendered content can populate
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;

/// Settle delay after resizing the viewport for a full-page screenshot
pub const DEFAULT_SCREENSHOT_SETTLE_MS: u64 = 1000;

/// Cap on the viewport height used for full-page screenshots
pub const MAX_SCREENSHOT_HEIGHT: u32 = 4000;

/// Pause between successive fetches in a batch
pub const DEFAULT_POLITENESS_DELAY_MS: u64 = 1000;

/// Headings kept per level (h1-h3)
pub const MAX_HEADINGS_PER_LEVEL: usize = 5;

/// Minimum trimmed length, in characters, of a paragraph worth keeping
pub const MIN_PARAGRAPH_CHARS: usize = 50;

/// Paragraphs are truncated to this many characters
pub const MAX_PARAGRAPH_CHARS: usize = 500;

/// Maximum number of paragraphs kept
pub const MAX_PARAGRAPHS: usize = 10;

/// CTA labels must be strictly shorter than this many characters
pub const MAX_CTA_CHARS: usize = 50;

/// Maximum number of CTA labels kept
pub const MAX_CTA_LABELS: usize = 10;

/// Maximum number of navigation labels kept
pub const MAX_NAV_LINKS: usize = 15;

/// Text-mode analysis input is truncated to this many characters
pub const MAX_ANALYSIS_TEXT_CHARS: usize = 10_000;

/// Marker appended to truncated text-mode input
pub const TRUNCATION_MARKER: &str = "\n\n[... text truncated ...]";
