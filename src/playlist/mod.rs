//! Line-oriented M3U playlist processing
//!
//! Playlists are handled as plain text split on `\n`. Only three line kinds
//! matter here: the `#EXTM3U` document header, `#EXTINF` metadata lines that
//! open a channel block, and stream locator lines. Everything else is carried
//! through untouched.

pub mod cleaner;
pub mod combiner;
pub mod filter;

pub use cleaner::clean_links;
pub use combiner::combine;
pub use filter::{channel_blocks, ChannelBlock, ChannelBlocks, ChannelFilter, FilterOutcome};

pub const EXTM3U_HEADER: &str = "#EXTM3U";
pub const EXTINF_PREFIX: &str = "#EXTINF";

/// Whether a line is the global `#EXTM3U` header
pub fn is_header(line: &str) -> bool {
    line.trim().starts_with(EXTM3U_HEADER)
}

/// Whether a line opens a channel block
pub fn is_metadata(line: &str) -> bool {
    line.trim().starts_with(EXTINF_PREFIX)
}

/// Split a document into lines, keeping empty and `\r`-terminated lines as-is
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_kinds() {
        assert!(is_header("#EXTM3U"));
        assert!(is_header("  #EXTM3U x-tvg-url=\"http://epg\""));
        assert!(!is_header("#EXTINF:-1,News"));

        assert!(is_metadata("#EXTINF:-1 tvg-id=\"a\",News"));
        assert!(!is_metadata("#EXTVLCOPT:http-user-agent=foo"));
        assert!(!is_metadata("http://x/1"));
    }

    #[test]
    fn test_split_lines_preserves_trailing_empty_line() {
        assert_eq!(split_lines("a\r\nb\n"), vec!["a\r", "b", ""]);
    }
}
