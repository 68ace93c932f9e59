use regex::Regex;

/// Checks whether `text` occurs anywhere on the page, scanning line by line
pub fn is_text_on_page(body: &[u8], text: &str, ignore_case: bool) -> bool {
    let page = String::from_utf8_lossy(body);

    if ignore_case {
        let needle = text.to_lowercase();
        page.lines().any(|line| line.to_lowercase().contains(&needle))
    } else {
        page.lines().any(|line| line.contains(text))
    }
}

/// Returns every match of `re` in document order, duplicates included
pub fn find_regex(body: &[u8], re: &Regex) -> Vec<String> {
    let page = String::from_utf8_lossy(body);
    re.find_iter(&page).map(|m| m.as_str().to_string()).collect()
}
