//! Shared argument-parsing helpers used across the per-operation tool files.

use std::str::FromStr;

use engram_core::{Scope, Sector};

pub(super) fn default_tenant() -> String {
    "default".to_string()
}

pub(super) fn parse_scope(scope: Option<&str>) -> Result<Option<Scope>, String> {
    scope.map(Scope::from_str).transpose()
}

pub(super) fn parse_sector(sector: Option<&str>) -> Result<Option<Sector>, String> {
    sector.map(Sector::from_str).transpose()
}
