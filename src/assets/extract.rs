use std::collections::BTreeSet;

use reqwest::Url;
use serde_json::Value;

use super::manifest::AssetManifest;

/// Manifest key whose subtree is documentation, never asset data.
pub const SCHEMA_DOCS_KEY: &str = "schema_docs";

/// Collect the distinct asset URLs hosted on `host_domain` anywhere in the manifest.
pub fn extract_asset_urls(manifest: &AssetManifest, host_domain: &str) -> BTreeSet<String> {
    let mut urls = BTreeSet::new();
    visit(&manifest.body, host_domain, &mut urls);
    urls
}

fn visit(value: &Value, host_domain: &str, urls: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                if key == SCHEMA_DOCS_KEY {
                    continue;
                }
                visit(inner, host_domain, urls);
            }
        }
        Value::Array(items) => {
            for inner in items {
                visit(inner, host_domain, urls);
            }
        }
        Value::String(s) => {
            if is_asset_url(s, host_domain) {
                urls.insert(s.clone());
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// An http(s) URL whose host is `host_domain` or one of its subdomains.
pub fn is_asset_url(candidate: &str, host_domain: &str) -> bool {
    if !(candidate.starts_with("http://") || candidate.starts_with("https://")) {
        return false;
    }
    let Ok(url) = Url::parse(candidate) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let domain = host_domain.trim_start_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOMAIN: &str = "supabase.co";

    fn manifest(body: Value) -> AssetManifest {
        AssetManifest::from_value(body, "exported_at")
    }

    #[test]
    fn collects_urls_at_any_depth() {
        let m = manifest(json!({
            "exported_at": "v1",
            "spirits": [
                {"name": "Ember", "art": {"front": "https://abc.supabase.co/storage/ember.png"}},
                {"name": "Tide", "variants": [[{"img": "https://abc.supabase.co/storage/tide.png"}]]}
            ],
            "board": "https://abc.supabase.co/storage/board.png"
        }));

        let urls = extract_asset_urls(&m, DOMAIN);
        assert_eq!(
            urls.into_iter().collect::<Vec<_>>(),
            vec![
                "https://abc.supabase.co/storage/board.png",
                "https://abc.supabase.co/storage/ember.png",
                "https://abc.supabase.co/storage/tide.png",
            ]
        );
    }

    #[test]
    fn schema_docs_subtree_is_skipped() {
        let m = manifest(json!({
            "schema_docs": {
                "example": "https://abc.supabase.co/storage/example.png",
                "nested": [{"url": "https://abc.supabase.co/storage/doc.png"}]
            },
            "cards": [{
                "schema_docs": "https://abc.supabase.co/storage/inner-doc.png",
                "image": "https://abc.supabase.co/storage/card.png"
            }]
        }));

        let urls = extract_asset_urls(&m, DOMAIN);
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://abc.supabase.co/storage/card.png"));
    }

    #[test]
    fn duplicates_collapse() {
        let url = "https://abc.supabase.co/storage/dup.png";
        let m = manifest(json!({"a": url, "b": [url, url], "c": {"d": url}}));
        assert_eq!(extract_asset_urls(&m, DOMAIN).len(), 1);
    }

    #[test]
    fn foreign_hosts_and_non_urls_ignored() {
        let m = manifest(json!({
            "other": "https://cdn.example.com/x.png",
            "lookalike": "https://supabase.co.evil.net/x.png",
            "relative": "storage/x.png",
            "ftp": "ftp://abc.supabase.co/x.png",
            "count": 3,
            "flag": true,
            "empty": null
        }));
        assert!(extract_asset_urls(&m, DOMAIN).is_empty());
    }

    #[test]
    fn host_match_is_exact_or_subdomain() {
        assert!(is_asset_url("https://supabase.co/x", DOMAIN));
        assert!(is_asset_url("http://a.b.SUPABASE.co/x", DOMAIN));
        assert!(!is_asset_url("https://notsupabase.co/x", DOMAIN));
        assert!(is_asset_url("http://127.0.0.1:8080/x.png", "127.0.0.1"));
    }
}
