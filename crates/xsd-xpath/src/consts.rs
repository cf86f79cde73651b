//! Well-known namespace URIs.

pub const XS: &str = "http://www.w3.org/2001/XMLSchema";
pub const FN: &str = "http://www.w3.org/2005/xpath-functions";
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
