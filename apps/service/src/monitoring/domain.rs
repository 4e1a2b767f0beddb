use url::Url;

/// Host part of `url`, without scheme, credentials, port, path or query.
///
/// Inputs are validated before they get here; anything the URL parser still
/// rejects falls back to slicing the authority by hand so the function never
/// fails.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .unwrap_or_else(|| authority_host(url).to_string())
}

fn authority_host(raw: &str) -> &str {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    if host_port.starts_with('[') {
        // IPv6 literal, the port follows the closing bracket
        return host_port.find(']').map_or(host_port, |end| &host_port[..=end]);
    }

    host_port.split(':').next().unwrap_or_default()
}
