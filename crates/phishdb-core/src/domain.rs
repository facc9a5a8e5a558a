//! Registrable-domain heuristic.

/// Derive the registrable domain of a URL for aggregation purposes.
///
/// Takes the last two dot-separated labels of the host, so
/// `http://a.b.example.com/x` yields `example.com`. This is an approximate
/// heuristic, not public-suffix-list resolution: two-level TLDs collapse to
/// the suffix itself (`sub.example.co.uk` yields `co.uk`).
///
/// When the two-label join degenerates to the bare string `com` (a host with
/// no meaningful second-level label), the full host is returned instead.
/// Unparsable URLs and URLs without a host yield an empty string.
#[must_use]
pub fn registrable_domain(raw: &str) -> String {
    let Ok(parsed) = url::Url::parse(raw) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };

    let labels: Vec<&str> = host.split('.').collect();
    let tail = labels[labels.len().saturating_sub(2)..].join(".");

    if tail == "com" {
        host.to_string()
    } else {
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_last_two_host_labels() {
        assert_eq!(
            registrable_domain("http://a.b.example.com/login"),
            "example.com"
        );
    }

    #[test]
    fn two_level_tld_collapses_to_suffix() {
        // Known limitation of the two-label heuristic, kept deliberately.
        assert_eq!(registrable_domain("http://sub.example.co.uk/x"), "co.uk");
    }

    #[test]
    fn bare_com_host_falls_back_to_full_host() {
        assert_eq!(registrable_domain("http://com/phish"), "com");
    }

    #[test]
    fn host_is_lowercased_by_url_parsing() {
        assert_eq!(registrable_domain("http://EXAMPLE.Com/Path"), "example.com");
    }

    #[test]
    fn unparsable_url_yields_empty_string() {
        assert_eq!(registrable_domain("not a url"), "");
        assert_eq!(registrable_domain("example.com/no-scheme"), "");
    }

    #[test]
    fn ip_host_keeps_last_two_octets() {
        // IPs are not special-cased; the heuristic applies label-wise.
        assert_eq!(registrable_domain("http://192.168.10.20/x"), "10.20");
    }

    #[test]
    fn single_label_non_com_host_is_returned_as_is() {
        assert_eq!(registrable_domain("http://localhost/x"), "localhost");
    }
}
