/// Label used when a URL does not end in a `YYYY-YYYY` segment.
pub const UNKNOWN_SEASON: &str = "unknown_season";

/// Extract the trailing season label from a roster URL.
pub fn season_of(url: &str) -> String {
    let path = url.strip_suffix('/').unwrap_or(url);
    match path.rsplit_once('/') {
        Some((_, segment)) if is_season_label(segment) => segment.to_string(),
        _ => UNKNOWN_SEASON.to_string(),
    }
}

/// `true` for `YYYY-YYYY`, four ASCII digits on each side of a hyphen.
fn is_season_label(segment: &str) -> bool {
    match segment.split_once('-') {
        Some((start, end)) => [start, end]
            .iter()
            .all(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

/// Roster page URL for `season` under `base_url`.
pub fn season_url(base_url: &str, season: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), season.trim_matches('/'))
}
