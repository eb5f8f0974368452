use super::{is_header, split_lines};

/// Concatenate documents in order.
///
/// Each document is paired with the position of its source in the configured
/// list. Only the document of the first configured source is kept verbatim;
/// every other document loses its `#EXTM3U` header lines, so a failed first
/// source leaves the merged playlist without a header.
pub fn combine<S: AsRef<str>>(documents: &[(usize, S)]) -> String {
    let mut combined: Vec<&str> = Vec::new();

    for (source_index, document) in documents {
        let lines = split_lines(document.as_ref());
        if *source_index == 0 {
            combined.extend(lines);
        } else {
            combined.extend(lines.into_iter().filter(|line| !is_header(line)));
        }
    }

    combined.join("\n")
}
