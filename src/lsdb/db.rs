use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::lsdb::lsa::{LinkType, Lsa, LsaId, LsaType, RouterId, RouterLink};
use crate::lsdb::record::{DumpRecord, RecordError};

#[derive(Debug, Clone, Error)]
pub enum DbError {
    #[error("duplicated {lsa_type} LSA id {id}")]
    DuplicateLsa { lsa_type: LsaType, id: LsaId },
}

/// A malformed line cannot be recovered from; the rest of the dump is not
/// trusted once tokenizing fails.
#[derive(Debug, Clone, Error)]
#[error("line {line}: {source}")]
pub struct BuildError {
    pub line: usize,
    #[source]
    pub source: RecordError,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Non-blank lines parsed into records.
    pub records: usize,
    /// Records dropped for an unsupported LSA or link type code.
    pub skipped: usize,
    /// Duplicate (type, id) registrations rejected.
    pub duplicates: usize,
}

/// The Link-State Database: one keyed container per LSA type. The two id
/// spaces are independent, so every lookup is type-scoped.
#[derive(Debug, Clone, Default)]
pub struct Lsdb {
    routers: BTreeMap<LsaId, Lsa>,
    networks: BTreeMap<LsaId, Lsa>,
}

impl Lsdb {
    pub fn new() -> Self {
        Self::default()
    }

    fn scope(&self, lsa_type: LsaType) -> &BTreeMap<LsaId, Lsa> {
        match lsa_type {
            LsaType::Router => &self.routers,
            LsaType::Network => &self.networks,
        }
    }

    fn scope_mut(&mut self, lsa_type: LsaType) -> &mut BTreeMap<LsaId, Lsa> {
        match lsa_type {
            LsaType::Router => &mut self.routers,
            LsaType::Network => &mut self.networks,
        }
    }

    /// Register an LSA. A second registration for the same (type, id) is
    /// rejected and the original stays in place.
    pub fn insert(&mut self, lsa: Lsa) -> Result<(), DbError> {
        let lsa_type = lsa.lsa_type();
        let scope = self.scope_mut(lsa_type);
        if scope.contains_key(&lsa.id) {
            return Err(DbError::DuplicateLsa {
                lsa_type,
                id: lsa.id,
            });
        }
        scope.insert(lsa.id.clone(), lsa);
        Ok(())
    }

    pub fn find(&self, lsa_type: LsaType, id: &LsaId) -> Option<&Lsa> {
        self.scope(lsa_type).get(id)
    }

    pub fn find_mut(&mut self, lsa_type: LsaType, id: &LsaId) -> Option<&mut Lsa> {
        self.scope_mut(lsa_type).get_mut(id)
    }

    /// Unused by the derivation pipeline; present for database completeness.
    #[allow(dead_code)]
    pub fn remove(&mut self, lsa_type: LsaType, id: &LsaId) -> Option<Lsa> {
        self.scope_mut(lsa_type).remove(id)
    }

    /// Router-LSAs in dotted-quad id order.
    pub fn routers(&self) -> impl Iterator<Item = &Lsa> {
        self.routers.values()
    }

    /// Network-LSAs in dotted-quad id order.
    pub fn networks(&self) -> impl Iterator<Item = &Lsa> {
        self.networks.values()
    }

    pub fn router_count(&self) -> usize {
        self.routers.len()
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }
}

/// Build an LSDB from a decoded dump, one record per line.
///
/// Links and attached routers accumulate across lines sharing the same
/// (type, id), in input order. Unsupported type codes are warned and
/// skipped; anything that fails to tokenize aborts the build.
pub fn build_from_lines<'a, I>(lines: I) -> Result<(Lsdb, BuildStats), BuildError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lsdb = Lsdb::new();
    let mut stats = BuildStats::default();

    for (index, raw) in lines.into_iter().enumerate() {
        let lineno = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let at_line = |source| BuildError {
            line: lineno,
            source,
        };

        let record = DumpRecord::parse(raw).map_err(at_line)?;
        stats.records += 1;

        let type_code = record.require_int("LSATYPE").map_err(at_line)?;
        let Some(lsa_type) = LsaType::from_code(type_code) else {
            warn!(code = type_code, line = lineno, "unsupported LSA type, skipping record");
            stats.skipped += 1;
            continue;
        };
        let id = LsaId::from(record.require_text("LSAID").map_err(at_line)?);

        if lsdb.find(lsa_type, &id).is_none() {
            let adv_router = RouterId::from(record.require_text("ADVROUTER").map_err(at_line)?);
            if let Err(err) = lsdb.insert(Lsa::new(lsa_type, adv_router, id.clone())) {
                warn!(%err, line = lineno, "dropping duplicate LSA registration");
                stats.duplicates += 1;
                continue;
            }
        }
        let Some(lsa) = lsdb.find_mut(lsa_type, &id) else {
            continue;
        };

        match lsa_type {
            LsaType::Router => {
                let link_code = record.require_int("LINKTYPE").map_err(at_line)?;
                let Some(link_type) = LinkType::from_code(link_code) else {
                    warn!(code = link_code, line = lineno, "unsupported link type, skipping record");
                    stats.skipped += 1;
                    continue;
                };
                let link_id = RouterId::from(record.require_text("LINKID").map_err(at_line)?);
                let link_data = record.require_text("DATA").map_err(at_line)?.to_string();
                lsa.push_link(RouterLink {
                    link_type,
                    link_id,
                    link_data,
                });
            }
            LsaType::Network => {
                let attached = RouterId::from(record.require_text("ATTACHED").map_err(at_line)?);
                lsa.push_attached(attached);
            }
        }
    }

    Ok((lsdb, stats))
}
