//! Domain normalization and the filters the discovery pipeline applies to
//! raw scan-index hits.

/// Built-in free-hosting and no-code platform suffixes. Hits on these are
/// platform noise, not customer sites.
const PLATFORM_SUFFIXES: &[&str] = &[
    "lovable.app",
    "lovableproject.com",
    "vercel.app",
    "netlify.app",
    "github.io",
    "pages.dev",
    "web.app",
    "webflow.io",
    "wixsite.com",
    "herokuapp.com",
    "onrender.com",
    "surge.sh",
    "glitch.me",
];

/// Field-qualified search operators whose queries are structural, never a
/// domain. When one of these appears the query must not be used for
/// self-match exclusion.
const STRUCTURAL_OPERATORS: &[&str] = &[
    "filename:",
    "hash:",
    "ip:",
    "asn:",
    "tag:",
    "tags:",
    "title:",
    "status:",
    "server:",
    "url:",
    "page.ip:",
    "page.asn:",
    "page.title:",
    "page.status:",
    "page.url:",
    "task.tags:",
];

/// Operators whose argument is a domain.
const DOMAIN_OPERATORS: &[&str] = &["page.domain:", "task.domain:", "domain:"];

/// Normalize a raw URL or bare host string into a canonical domain.
/// Strings without a scheme get `https://` prepended before parsing; a
/// leading `www.` label is stripped. Returns the empty string on any parse
/// failure — callers treat empty as "skip this record".
pub fn extract_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match url::Url::parse(&with_scheme) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| {
                host.strip_prefix("www.")
                    .unwrap_or(host)
                    .to_lowercase()
            })
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

/// Suffix-list membership test for known hosting platforms. Pure; the list
/// is extended from configuration, not code.
#[derive(Debug, Clone)]
pub struct PlatformFilter {
    suffixes: Vec<String>,
}

impl Default for PlatformFilter {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl PlatformFilter {
    /// Build the filter from the built-in list plus configured extras.
    pub fn new(extra_suffixes: &[String]) -> Self {
        let mut suffixes: Vec<String> =
            PLATFORM_SUFFIXES.iter().map(|s| s.to_string()).collect();
        suffixes.extend(
            extra_suffixes
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );
        Self { suffixes }
    }

    /// True when the domain is a platform suffix or a subdomain of one.
    /// Matches at label boundaries: `foo.lovable.app` is a platform,
    /// `lovable.appendix.com` is not.
    pub fn is_platform(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.suffixes
            .iter()
            .any(|s| domain == *s || domain.ends_with(&format!(".{s}")))
    }
}

/// Determine whether a free-text search query itself denotes a single
/// domain, so trivial self-matches can be excluded from results. Returns
/// the empty string when the query is structural or denotes no domain.
pub fn query_domain(query: &str) -> String {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return String::new();
    }

    if STRUCTURAL_OPERATORS.iter().any(|op| q.contains(op)) {
        return String::new();
    }

    // DOMAIN_OPERATORS is ordered longest-first so `page.domain:` wins
    // before the bare `domain:` substring matches inside it.
    for op in DOMAIN_OPERATORS {
        if let Some(idx) = q.find(op) {
            let arg = q[idx + op.len()..]
                .split_whitespace()
                .next()
                .unwrap_or("")
                .trim_matches('"');
            return arg.to_string();
        }
    }

    // A bare dotted token is treated as a domain.
    if q.contains('.') && !q.contains(char::is_whitespace) {
        let extracted = extract_domain(&q);
        if extracted.is_empty() {
            return q;
        }
        return extracted;
    }

    String::new()
}
