/// Rewrites an upstream URL to go through a request proxy.
///
/// `corsproxy.io` takes the target as a raw suffix (`https://corsproxy.io/?https://...`);
/// path-style proxies get the target appended after a single `/`.
pub fn apply_proxy(url: &str, proxy_base: Option<&str>) -> String {
    let Some(base) = proxy_base.map(str::trim).filter(|b| !b.is_empty()) else {
        return url.to_string();
    };

    if base.contains("corsproxy.io") {
        return format!("{}{}", base, url);
    }

    format!("{}/{}", base.trim_end_matches('/'), url)
}
