// src/constants.rs
//
// Application-wide constants.

/// Maximum characters of a note description shown per line by `list`.
///
/// Used in: `ports/terminal.rs`
pub const SUMMARY_MAX_CHARS: usize = 60;

/// Delay in milliseconds after writing the HTML page before returning from `view`.
///
/// The temp directory holding the page is removed when the renderer drops, so the
/// browser needs a moment to load the file first.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;

/// Largest image accepted for upload, in bytes.
///
/// Used in: `lib.rs`
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
