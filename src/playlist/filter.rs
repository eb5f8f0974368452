//! Channel block filtering
//!
//! A channel block is an `#EXTINF` line plus every following line up to the
//! next `#EXTINF` line. Blocks are kept or dropped whole, so option lines such
//! as `#EXTVLCOPT` stay attached to the channel they belong to.

use tracing::{debug, info, warn};

use super::{is_header, is_metadata, split_lines};

/// One `#EXTINF` line and the lines that belong to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelBlock<'a> {
    lines: &'a [&'a str],
}

impl<'a> ChannelBlock<'a> {
    pub fn metadata(&self) -> &'a str {
        self.lines[0]
    }

    pub fn lines(&self) -> &'a [&'a str] {
        self.lines
    }

    /// Display name after the last comma of the metadata line
    pub fn display_name(&self) -> Option<&'a str> {
        display_name(self.metadata())
    }
}

/// Lazy iterator over the channel blocks of a document
#[derive(Debug, Clone)]
pub struct ChannelBlocks<'a> {
    remaining: &'a [&'a str],
}

impl<'a> Iterator for ChannelBlocks<'a> {
    type Item = ChannelBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        // remaining always starts on a metadata line
        let end = self.remaining[1..]
            .iter()
            .position(|line| is_metadata(line))
            .map_or(self.remaining.len(), |pos| pos + 1);

        let (block, rest) = self.remaining.split_at(end);
        self.remaining = rest;
        Some(ChannelBlock { lines: block })
    }
}

/// Split lines into the preamble before the first `#EXTINF` and its blocks
pub fn channel_blocks<'a>(lines: &'a [&'a str]) -> (&'a [&'a str], ChannelBlocks<'a>) {
    let start = lines
        .iter()
        .position(|line| is_metadata(line))
        .unwrap_or(lines.len());
    let (preamble, remaining) = lines.split_at(start);
    (preamble, ChannelBlocks { remaining })
}

/// Extract the display name from `#EXTINF:<duration> <attrs>,<name>`
///
/// The name is everything after the first comma outside a quoted attribute
/// value, so it may itself contain commas. Returns `None` when the line has
/// no such separator.
pub fn display_name(metadata_line: &str) -> Option<&str> {
    let line = metadata_line.trim();
    let mut in_quotes = false;

    for (pos, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return Some(line[pos + 1..].trim()),
            _ => {}
        }
    }
    None
}

/// Result of filtering a single document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub document: String,
    /// Blocks kept
    pub matched: usize,
    /// Blocks dropped because their metadata line had no display name
    pub skipped: usize,
    pub total: usize,
}

/// Case-insensitive allow-list of channel name fragments
#[derive(Debug, Clone, Default)]
pub struct ChannelFilter {
    allow_list: Vec<String>,
}

impl ChannelFilter {
    pub fn new<I, S>(allow_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allow_list = allow_list
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { allow_list }
    }

    pub fn is_empty(&self) -> bool {
        self.allow_list.is_empty()
    }

    /// Substring containment in either direction, ignoring case.
    ///
    /// A base name that prefixes a variant ("Zee Anmol" / "Zee Anmol Cinema")
    /// matches both channels.
    pub fn matches(&self, channel_name: &str) -> bool {
        let name = channel_name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }
        self.allow_list
            .iter()
            .any(|entry| name.contains(entry.as_str()) || entry.contains(name.as_str()))
    }

    /// Keep only the channel blocks whose display name matches.
    ///
    /// An `#EXTM3U` header found before the first block is kept so the
    /// filtered document still reads as a playlist.
    pub fn apply(&self, content: &str) -> FilterOutcome {
        if self.is_empty() {
            warn!("Channel filter has an empty allow list, no channels will be kept");
        }

        let lines = split_lines(content);
        let (preamble, blocks) = channel_blocks(&lines);

        let mut kept: Vec<&str> = preamble.iter().copied().filter(|l| is_header(l)).collect();
        let mut outcome = FilterOutcome::default();

        for block in blocks {
            outcome.total += 1;
            match block.display_name() {
                Some(name) if self.matches(name) => {
                    debug!("Keeping channel '{}'", name);
                    kept.extend_from_slice(block.lines());
                    outcome.matched += 1;
                }
                Some(_) => {}
                None => {
                    debug!("Skipping malformed metadata line: {}", block.metadata().trim());
                    outcome.skipped += 1;
                }
            }
        }

        info!(
            "Channel filter matched {} of {} channels ({} malformed)",
            outcome.matched, outcome.total, outcome.skipped
        );

        outcome.document = kept.join("\n");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#EXTINF:-1,Zee News HD\nhttp://x/1\n#EXTVLCOPT:http-user-agent=foo\n#EXTINF:-1,Random Channel\nhttp://x/2";

    #[test]
    fn test_keeps_whole_matching_block() {
        let filter = ChannelFilter::new(["Zee News"]);
        let outcome = filter.apply(SAMPLE);

        assert_eq!(
            outcome.document,
            "#EXTINF:-1,Zee News HD\nhttp://x/1\n#EXTVLCOPT:http-user-agent=foo"
        );
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_blocks_split_on_metadata_lines() {
        let lines = split_lines(SAMPLE);
        let (preamble, blocks) = channel_blocks(&lines);
        let blocks: Vec<_> = blocks.collect();

        assert!(preamble.is_empty());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines().len(), 3);
        assert_eq!(blocks[1].lines(), &["#EXTINF:-1,Random Channel", "http://x/2"]);
        assert_eq!(blocks[1].display_name(), Some("Random Channel"));
    }

    #[test]
    fn test_preamble_header_is_kept() {
        let content = "#EXTM3U\n# generated\n#EXTINF:-1,Sony Max\nhttp://x/1\n#EXTINF:-1,Other\nhttp://x/2";
        let outcome = ChannelFilter::new(["sony"]).apply(content);
        assert_eq!(outcome.document, "#EXTM3U\n#EXTINF:-1,Sony Max\nhttp://x/1");
    }

    #[test]
    fn test_matching_is_case_insensitive_both_ways() {
        let filter = ChannelFilter::new(["ZEE NEWS HD EXTRA", "sony"]);
        // allow-list entry contains the channel name
        assert!(filter.matches("zee news hd"));
        // channel name contains the allow-list entry
        assert!(filter.matches("SONY SAB"));
        assert!(!filter.matches("Colors"));
        assert!(!filter.matches("   "));
    }

    #[test]
    fn test_overlapping_names_both_match() {
        let filter = ChannelFilter::new(["Zee Anmol"]);
        assert!(filter.matches("Zee Anmol"));
        assert!(filter.matches("Zee Anmol Cinema"));
    }

    #[test]
    fn test_malformed_metadata_is_skipped() {
        let content = "#EXTINF:-1 Zee News\nhttp://x/1\n#EXTINF:-1,Zee News\nhttp://x/2";
        let outcome = ChannelFilter::new(["zee"]).apply(content);
        assert_eq!(outcome.document, "#EXTINF:-1,Zee News\nhttp://x/2");
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.matched, 1);
    }

    #[test]
    fn test_order_is_preserved() {
        let content = "#EXTINF:-1,B News\nhttp://b\n#EXTINF:-1,Drop\nhttp://d\n#EXTINF:-1,A News\nhttp://a";
        let outcome = ChannelFilter::new(["news"]).apply(content);
        assert_eq!(
            outcome.document,
            "#EXTINF:-1,B News\nhttp://b\n#EXTINF:-1,A News\nhttp://a"
        );
    }

    #[test]
    fn test_empty_allow_list_keeps_nothing() {
        let filter = ChannelFilter::new(["", "  "]);
        assert!(filter.is_empty());
        let outcome = filter.apply(SAMPLE);
        assert_eq!(outcome.document, "");
        assert_eq!(outcome.matched, 0);
    }

    #[test]
    fn test_display_name_skips_quoted_commas() {
        assert_eq!(
            display_name("#EXTINF:-1 group-title=\"News,HD\",Zee News\r"),
            Some("Zee News")
        );
        assert_eq!(display_name("#EXTINF:-1"), None);
        assert_eq!(display_name("#EXTINF:-1 tvg-name=\"a,b\""), None);
    }

    #[test]
    fn test_display_name_keeps_commas_in_name() {
        assert_eq!(display_name("#EXTINF:-1,Zee News, HD"), Some("Zee News, HD"));

        let outcome = ChannelFilter::new(["Zee News"]).apply("#EXTINF:-1,Zee News, HD\nhttp://x/1");
        assert_eq!(outcome.document, "#EXTINF:-1,Zee News, HD\nhttp://x/1");
        assert_eq!(outcome.matched, 1);
    }
}
