//! Target-filename resolution from the paths named in a diff listing.

/// The first whitespace-delimited token of a header's payload.
pub fn header_token(s: &str) -> &str {
    s.split_whitespace().next().unwrap_or("")
}

/// Turn a listing path into a filesystem path. With no strip count only the
/// basename survives; with `-p NUM` the first NUM components are dropped.
/// `/dev/null` passes through untouched so the caller can treat it as
/// "create new".
pub fn fetchname(token: &str, strip: Option<usize>) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    if token == "/dev/null" {
        return Some(token.to_string());
    }
    let name = match strip {
        None => token.rsplit('/').next().unwrap_or(token).to_string(),
        Some(0) => token.to_string(),
        Some(n) => {
            let parts: Vec<&str> = token.split('/').filter(|p| !p.is_empty()).collect();
            if parts.len() <= n {
                return None;
            }
            parts[n..].join("/")
        }
    };
    if name.is_empty() { None } else { Some(name) }
}
