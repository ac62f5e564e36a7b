//! Outbound header construction.

use axum::http::header::{self, HeaderMap, HeaderValue};

/// Build the header map for the upstream request.
///
/// Every inbound value is copied in order into a fresh map; the inbound map is
/// never mutated. `Host` is replaced by the upstream's authority.
pub fn build_outbound_headers(inbound: &HeaderMap, host: &HeaderValue) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 1);

    for (name, value) in inbound.iter() {
        if name == header::HOST {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    outbound.insert(header::HOST, host.clone());
    outbound
}
