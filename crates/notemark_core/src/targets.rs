/// One URL per line; surrounding whitespace and blank lines are dropped.
pub fn parse_targets(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Exact match, or a match that differs only by one trailing slash.
pub fn matches_active_tab(target: &str, active_url: &str) -> bool {
    if target == active_url {
        return true;
    }
    target.strip_suffix('/') == Some(active_url) || active_url.strip_suffix('/') == Some(target)
}

/// Pending text: failed targets first, in failure order, then the untouched tail.
pub fn pending_text(failed: &[String], not_attempted: &[String]) -> String {
    failed
        .iter()
        .chain(not_attempted.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appends `url` on its own line unless the text already mentions it.
pub fn append_unique(pending: &str, url: &str) -> String {
    let current = pending.trim_end();
    if current.is_empty() {
        return url.to_string();
    }
    if current.contains(url) {
        return current.to_string();
    }
    format!("{current}\n{url}")
}
