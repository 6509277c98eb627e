use crate::error::{Error, Result};
use crate::types::RepositoryIdentifier;

const ROUTE_PREFIX: &str = "repository/";

/// Resolve the repository identifier from a navigation location.
///
/// Accepts `/repository/<segment>` or a bare `<segment>`, where the segment is the
/// percent-encoded `owner/name` pair (`facebook%2Freact`). The route prefix is only
/// dropped when what follows it is a valid pair, so an unencoded `repository/rust`
/// names the `repository` owner.
pub fn resolve(location: &str) -> Result<RepositoryIdentifier> {
    let trimmed = location.trim().trim_matches('/');

    if let Some(id) = trimmed
        .strip_prefix(ROUTE_PREFIX)
        .and_then(|segment| decode_segment(segment).ok())
    {
        return Ok(id);
    }

    decode_segment(trimmed)
}

fn decode_segment(segment: &str) -> Result<RepositoryIdentifier> {
    if segment.is_empty() {
        return Err(Error::MalformedRoute("no repository in route".to_string()));
    }

    let decoded = urlencoding::decode(segment)
        .map_err(|e| Error::MalformedRoute(format!("'{}': {}", segment, e)))?;

    RepositoryIdentifier::new(decoded.trim_matches('/')).ok_or_else(|| {
        Error::MalformedRoute(format!("'{}' is not an owner/name pair", decoded))
    })
}
