//! Delimited-text export
//!
//! Fields are written verbatim. A source or campaign containing a comma
//! shifts that row's columns; values are not quoted.

use crate::core::constants::export_names::DELIMITED_HEADER;
use crate::workspace::ChannelRecord;

/// Header line followed by one line per record, joined with `\n` and no
/// trailing newline.
pub fn render_delimited(records: &[ChannelRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(DELIMITED_HEADER.join(","));
    for record in records {
        lines.push(format!(
            "{},{},{},{}",
            record.source, record.campaign, record.users, record.views
        ));
    }
    lines.join("\n")
}
