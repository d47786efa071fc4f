use std::collections::BTreeMap;

use anyhow::Context as _;

pub(crate) fn parse_headers(raw: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut headers = BTreeMap::new();
    for s in raw {
        let (k, v) = parse_header(s)?;
        headers.insert(k, v);
    }
    Ok(headers)
}

fn parse_header(s: &str) -> anyhow::Result<(String, String)> {
    let (k, v) = s
        .split_once('=')
        .with_context(|| format!("invalid --header (expected KEY=VALUE): {s}"))?;
    let k = k.trim();
    if k.is_empty() {
        anyhow::bail!("invalid --header (empty KEY): {s}");
    }
    Ok((k.to_string(), v.trim().to_string()))
}
