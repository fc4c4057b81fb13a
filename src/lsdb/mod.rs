/*!
Link-State Database core.

This module defines:
- `record`: parser for one decoded lsadump line (`KEY=VALUE` fields).
- `lsa`: the LSA data model (identifiers, link types, LSA bodies).
- `db`: the type-scoped LSDB container and the streaming dump builder.
*/

pub mod db;
pub mod lsa;
pub mod record;
