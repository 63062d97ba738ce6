use proptest::prelude::*;

/// Hosts made of dotted labels ending in a 2-4 letter TLD.
pub fn host_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[a-z0-9][a-z0-9-]{0,10}", 1..4),
        "[a-z]{2,4}",
    )
        .prop_map(|(labels, tld)| format!("{}.{tld}", labels.join(".")))
}

pub fn valid_uri_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https")],
        host_strategy(),
        prop::option::of("/[a-zA-Z0-9/_.?=&-]{0,20}"),
    )
        .prop_map(|(scheme, host, path)| format!("{scheme}://{host}{}", path.unwrap_or_default()))
}

/// Schemes that must never pass URI validation.
pub fn foreign_scheme_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ftp".to_string()),
        Just("ws".to_string()),
        Just("file".to_string()),
        Just("gopher".to_string()),
        "[a-z]{5,8}".prop_filter("http-like schemes are valid", |s| s != "https"),
    ]
}

/// RFC 1123-style resource names.
pub fn resource_name_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]([a-z0-9.-]{0,40}[a-z0-9])?"
}
