// src/extractor/normalize.rs

use crate::models::ResolvedLinks;

/// 按表中顺序依次做字面子串替换。顺序有意义: 前一条的结果会被后一条继续改写。
pub fn normalize_link<S: AsRef<str>>(url: &str, rewrites: &[(S, S)]) -> String {
    rewrites.iter().fold(url.to_string(), |acc, (old, new)| {
        acc.replace(old.as_ref(), new.as_ref())
    })
}

pub fn normalize_links<S: AsRef<str>>(links: ResolvedLinks, rewrites: &[(S, S)]) -> ResolvedLinks {
    links
        .into_iter()
        .map(|link| normalize_link(&link, rewrites))
        .collect()
}
