use url::Url;

/// Country-code suffixes that occupy two labels, so the registrable domain
/// needs three. Not exhaustive; unknown hosts fall back to the last two
/// labels, and ultimately to the host itself.
const TWO_LEVEL_SUFFIXES: &[&str] = &[
    "ac.uk", "co.uk", "gov.uk", "org.uk", "co.jp", "ne.jp", "or.jp", "com.au", "net.au",
    "org.au", "co.nz", "org.nz", "com.br", "com.cn", "com.mx", "com.sg", "com.tr",
    "co.in", "co.kr", "co.za", "com.ar", "com.hk", "com.tw",
];

/// Extracts the lowercase host from a URL
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Computes the registrable domain (eTLD+1) of a host
///
/// `sub.b.example` becomes `b.example`; `news.bbc.co.uk` becomes `bbc.co.uk`.
/// IP addresses and single-label hosts are returned unchanged.
pub fn registrable_domain(host: &str) -> String {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return host.to_string();
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }

    let last_two = format!(
        "{}.{}",
        labels[labels.len() - 2],
        labels[labels.len() - 1]
    );

    if TWO_LEVEL_SUFFIXES.contains(&last_two.as_str()) {
        format!("{}.{}", labels[labels.len() - 3], last_two)
    } else {
        last_two
    }
}

/// Registrable domain of a URL's host, when it has one
pub fn registrable_domain_of(url: &Url) -> Option<String> {
    host_of(url).map(|h| registrable_domain(&h))
}
