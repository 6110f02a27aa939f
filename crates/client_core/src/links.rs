//! Link helpers used before a related link is submitted.

pub const DEFAULT_EPISODE_HOST: &str = "softwaredaily.com";

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Prefixes `http://` when the trimmed input carries no http(s) scheme.
/// Input that already has one is returned unchanged.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_http_scheme(trimmed) {
        return raw.to_string();
    }
    format!("http://{trimmed}")
}

pub fn is_episode_link(url: &str) -> bool {
    is_link_on_host(url, DEFAULT_EPISODE_HOST)
}

pub fn is_link_on_host(url: &str, host: &str) -> bool {
    !host.is_empty() && url.trim().contains(host)
}

fn has_http_scheme(url: &str) -> bool {
    SCHEMES.iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
#[path = "tests/links_tests.rs"]
mod tests;
