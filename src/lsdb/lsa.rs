use std::cmp::Ordering;
use std::fmt::Display;

use serde::{Serialize, Serializer};

/// Dotted-quad identifier used for router ids, LSA ids, DR interface
/// addresses and attached-router entries.
///
/// Dotted quads order by their four groups numerically, so "10.1.2.9"
/// sorts before "10.1.2.10". Ids that are not dotted quads sort in plain
/// byte order, as a group before the quads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterId(String);

/// Network-LSA ids live in their own id space (the DR interface address),
/// but share the identifier syntax.
pub type LsaId = RouterId;

impl RouterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn quad(&self) -> Option<[u8; 4]> {
        let mut groups = self.0.split('.');
        let quad = [
            groups.next()?.parse().ok()?,
            groups.next()?.parse().ok()?,
            groups.next()?.parse().ok()?,
            groups.next()?.parse().ok()?,
        ];
        if groups.next().is_some() {
            return None;
        }
        Some(quad)
    }
}

impl Ord for RouterId {
    // A single per-id sort key keeps the order total and consistent with
    // Eq: non-quad ids group before quads in byte order, quads compare
    // numerically with the raw string as tie breaker (leading zeros).
    fn cmp(&self, other: &Self) -> Ordering {
        (self.quad(), &self.0).cmp(&(other.quad(), &other.0))
    }
}

impl PartialOrd for RouterId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for RouterId {
    fn from(s: &str) -> Self {
        RouterId(s.to_string())
    }
}

impl From<String> for RouterId {
    fn from(s: String) -> Self {
        RouterId(s)
    }
}

impl Display for RouterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Serialized as a bare string; identifiers appear as JSON values and as
// parts of namespaced object keys.
impl Serialize for RouterId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsaType {
    Router,
    Network,
}

impl LsaType {
    /// Map the dump's `LSATYPE` code. Codes outside {1, 2} are unsupported.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(LsaType::Router),
            2 => Some(LsaType::Network),
            _ => None,
        }
    }
}

impl Display for LsaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LsaType::Router => write!(f, "router"),
            LsaType::Network => write!(f, "network"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    PointToPoint,
    Transit,
    Stub,
    Virtual,
}

impl LinkType {
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(LinkType::PointToPoint),
            2 => Some(LinkType::Transit),
            3 => Some(LinkType::Stub),
            4 => Some(LinkType::Virtual),
            _ => None,
        }
    }
}

/// One link entry of a Router-LSA. `link_id` is the neighboring router id,
/// or the DR interface address for transit links; `link_data` carries the
/// interface address or subnet mask verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterLink {
    pub link_type: LinkType,
    pub link_id: RouterId,
    pub link_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LsaBody {
    Router { links: Vec<RouterLink> },
    Network { attached: Vec<RouterId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lsa {
    pub id: LsaId,
    pub adv_router: RouterId,
    pub body: LsaBody,
}

impl Lsa {
    pub fn new(lsa_type: LsaType, adv_router: RouterId, id: LsaId) -> Self {
        let body = match lsa_type {
            LsaType::Router => LsaBody::Router { links: Vec::new() },
            LsaType::Network => LsaBody::Network {
                attached: Vec::new(),
            },
        };
        Lsa {
            id,
            adv_router,
            body,
        }
    }

    pub fn lsa_type(&self) -> LsaType {
        match self.body {
            LsaBody::Router { .. } => LsaType::Router,
            LsaBody::Network { .. } => LsaType::Network,
        }
    }

    /// Append a link entry. Attachments accumulate in input order, across
    /// any number of lines sharing this LSA's (type, id).
    pub fn push_link(&mut self, link: RouterLink) {
        if let LsaBody::Router { links } = &mut self.body {
            links.push(link);
        }
    }

    pub fn push_attached(&mut self, router: RouterId) {
        if let LsaBody::Network { attached } = &mut self.body {
            attached.push(router);
        }
    }

    pub fn links(&self) -> &[RouterLink] {
        match &self.body {
            LsaBody::Router { links } => links,
            LsaBody::Network { .. } => &[],
        }
    }

    pub fn attached_routers(&self) -> &[RouterId] {
        match &self.body {
            LsaBody::Router { .. } => &[],
            LsaBody::Network { attached } => attached,
        }
    }
}
