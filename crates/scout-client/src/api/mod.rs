//! API endpoint modules.

mod account;
mod certificate;
mod dns;
mod host;
mod org;
mod search;

pub use account::AccountApi;
pub use certificate::CertificateApi;
pub use dns::DnsApi;
pub use host::{HostApi, HostRequestBuilder};
pub use org::OrgApi;
pub use search::{CountRequestBuilder, SearchApi, SearchRequestBuilder};
