use tracing::debug;

use crate::utils::UrlUtils;

/// Strip trailing `|key=value` hints from `https://` locator lines
pub fn clean_links(content: &str) -> String {
    let mut cleaned_count = 0usize;
    let cleaned: Vec<&str> = content
        .split('\n')
        .map(|line| {
            let cleaned = clean_line(line);
            if cleaned.len() != line.len() {
                cleaned_count += 1;
            }
            cleaned
        })
        .collect();

    debug!("Cleaned {} stream links", cleaned_count);
    cleaned.join("\n")
}

/// Truncate a secure locator line before its first `|`
pub fn clean_line(line: &str) -> &str {
    if UrlUtils::is_secure_locator(line) {
        if let Some(pos) = line.find('|') {
            return &line[..pos];
        }
    }
    line
}
