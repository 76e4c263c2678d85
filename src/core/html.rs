// src/core/html.rs
// Low-level HTML string manipulation helpers.
// These are deliberately naive but tailored to the legacy timecard pages.
// They operate case-insensitively on ASCII tag/attribute names.

/// Find the section between an opening tag (with attributes) and its matching
/// closing tag, case-insensitive. Returns the HTML *inside* the tags.
///
/// Example:
/// ```ignore
/// let table_inner = slice_between_ci(html, "<table class=\"timecard_table\"", "</table>");
/// ```
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_pat);
    let close_lc = to_lower(close_pat);

    let open_idx = lc.find(&open_lc)?;
    // Jump past the '>' of the opening tag
    let after_open = s[open_idx..].find('>')? + open_idx + 1;
    let close_idx_rel = lc[after_open..].find(&close_lc)?;
    Some(&s[after_open..after_open + close_idx_rel])
}

/// Find the next complete tag block from `from` onwards, case-insensitive.
/// A block is from the start of the opening tag to the end of the closing tag.
pub fn next_tag_block_ci(s: &str, open_tag: &str, close_tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_tag);
    let close_lc = to_lower(close_tag);

    let start = lc.get(from..)?.find(&open_lc)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&close_lc)?;
    let end = open_end + end_rel + close_tag.len();
    Some((start, end))
}

/// Given a complete tag block like `<td ...>INNER</td>`,
/// return the INNER text without the wrapping tags.
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return block[open_end + 1..close_start].to_string();
            }
        }
    }
    String::new()
}

/// Remove all HTML tags `<...>` from the string, then collapse whitespace.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    crate::core::sanitize::normalize_ws(&out)
}

pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Value of a `attr="..."` pair inside an opening tag, case-insensitive on
/// the attribute name. Quoted values only; the legacy pages always quote.
pub fn attr_ci(tag: &str, attr: &str) -> Option<String> {
    let lc = to_lower(tag);
    let pat = format!("{}=\"", to_lower(attr));
    let i = lc.find(&pat)? + pat.len();
    let rest = &tag[i..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// All opening tags matching a prefix like `<input`, attributes included.
/// For void elements that never carry a closing tag.
pub fn open_tags_ci<'a>(s: &'a str, open_pat: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_pat);
    let mut out = Vec::new();
    let mut from = 0usize;
    while let Some(rel) = lc[from..].find(&open_lc) {
        let start = from + rel;
        match s[start..].find('>') {
            Some(end_rel) => {
                let end = start + end_rel + 1;
                out.push(&s[start..end]);
                from = end;
            }
            None => break,
        }
    }
    out
}

/// The opening tag of a block, attributes included.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(i) => &block[..=i],
        None => block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_between_tags() {
        let html = r#"<html><table class="x"><tr><td>a</td></tr></table></html>"#;
        let inner = slice_between_ci(html, "<table", "</table>").unwrap();
        assert_eq!(inner, "<tr><td>a</td></tr>");
    }

    #[test]
    fn walks_tag_blocks() {
        let html = "<tr><td>a</td><td>b</td></tr>";
        let (s, e) = next_tag_block_ci(html, "<td", "</td>", 0).unwrap();
        assert_eq!(&html[s..e], "<td>a</td>");
        let (s2, e2) = next_tag_block_ci(html, "<td", "</td>", e).unwrap();
        assert_eq!(&html[s2..e2], "<td>b</td>");
    }

    #[test]
    fn reads_quoted_attributes() {
        let tag = r#"<select NAME="project3" class="w">"#;
        assert_eq!(attr_ci(tag, "name").as_deref(), Some("project3"));
        assert_eq!(attr_ci(tag, "id"), None);
    }
}
