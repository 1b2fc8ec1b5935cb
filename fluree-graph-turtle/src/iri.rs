//! RFC 3986 reference resolution for IRIs.

use crate::error::{Result, TurtleError};

/// Components of an IRI: `scheme ":" ["//" authority] path ["?" query]`.
///
/// The base's fragment is dropped.
struct IriParts<'a> {
    scheme: &'a str,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> IriParts<'a> {
    fn parse(iri: &'a str) -> Self {
        let (scheme, rest) = match iri.find(':') {
            Some(pos) => (&iri[..pos], &iri[pos + 1..]),
            None => ("", iri),
        };
        let (authority, rest) = split_authority(rest);
        let (path, query) = split_path_query(rest);
        Self {
            scheme,
            authority,
            path,
            query,
        }
    }
}

/// Split `//authority/rest` into `(Some(authority), "/rest")`.
fn split_authority(s: &str) -> (Option<&str>, &str) {
    match s.strip_prefix("//") {
        Some(after) => {
            let end = after
                .find(|c| c == '/' || c == '?' || c == '#')
                .unwrap_or(after.len());
            (Some(&after[..end]), &after[end..])
        }
        None => (None, s),
    }
}

/// Split a path from its query, dropping any fragment.
fn split_path_query(s: &str) -> (&str, Option<&str>) {
    let s = s.find('#').map_or(s, |pos| &s[..pos]);
    match s.find('?') {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    }
}

/// Does the reference start with a URI scheme (`alpha *( alpha / digit / "+" / "-" / "." ) ":"`)?
fn has_scheme(reference: &str) -> bool {
    let Some(colon) = reference.find(':') else {
        return false;
    };
    let scheme = &reference[..colon];
    scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Remove dot segments from a path (RFC 3986 section 5.2.4).
fn remove_dot_segments(path: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." => {}
            ".." => {
                output.pop();
            }
            s => output.push(s),
        }
    }

    let result = output.join("/");
    if path.starts_with('/') && !result.starts_with('/') {
        format!("/{}", result)
    } else {
        result
    }
}

/// Resolve `reference` against `base` (RFC 3986 section 5.2).
///
/// Absolute references are returned unchanged. A relative reference with no
/// base is an error.
pub fn resolve_iri(base: Option<&str>, reference: &str) -> Result<String> {
    if has_scheme(reference) {
        return Ok(reference.to_string());
    }
    let Some(base) = base else {
        return Err(TurtleError::IriResolution(if reference.is_empty() {
            "empty IRI reference without base".to_string()
        } else {
            format!("relative IRI '{}' without base", reference)
        }));
    };
    let (reference, fragment) = match reference.split_once('#') {
        Some((reference, fragment)) => (reference, Some(fragment)),
        None => (reference, None),
    };
    if reference.is_empty() && fragment.is_none() {
        return Ok(base.to_string());
    }

    let b = IriParts::parse(base);

    let (authority, path, query): (Option<String>, String, Option<String>) =
        if reference.starts_with("//") {
            let (auth, rest) = split_authority(reference);
            let (path, query) = split_path_query(rest);
            (
                auth.map(str::to_string),
                remove_dot_segments(path),
                query.map(str::to_string),
            )
        } else if reference.starts_with('/') {
            let (path, query) = split_path_query(reference);
            (
                b.authority.map(str::to_string),
                remove_dot_segments(path),
                query.map(str::to_string),
            )
        } else if let Some(query) = reference.strip_prefix('?') {
                (
                b.authority.map(str::to_string),
                b.path.to_string(),
                Some(query.to_string()),
            )
        } else if reference.is_empty() {
            (
                b.authority.map(str::to_string),
                b.path.to_string(),
                b.query.map(str::to_string),
            )
        } else {
            let (ref_path, query) = split_path_query(reference);
            let merged = if b.authority.is_some() && b.path.is_empty() {
                format!("/{}", ref_path)
            } else {
                let dir = b.path.rfind('/').map_or("", |pos| &b.path[..=pos]);
                format!("{}{}", dir, ref_path)
            };
            (
                b.authority.map(str::to_string),
                remove_dot_segments(&merged),
                query.map(str::to_string),
            )
        };

    let mut result = String::with_capacity(base.len() + reference.len());
    result.push_str(b.scheme);
    result.push(':');
    if let Some(auth) = authority {
        result.push_str("//");
        result.push_str(&auth);
    }
    result.push_str(&path);
    if let Some(q) = query {
        result.push('?');
        result.push_str(&q);
    }
    if let Some(f) = fragment {
        result.push('#');
        result.push_str(f);
    }
    Ok(result)
}
