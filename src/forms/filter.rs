//! Query-string filter accepted by the client listing and hierarchy routes.

use std::num::ParseIntError;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

static ID_PARENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid id_parent pattern"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9]+").expect("valid name pattern"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z-.@_0-9]+").expect("valid email pattern"));
static CNPJ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-._/0-9]+").expect("valid cnpj pattern"));
static ORDERBY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+").expect("valid orderby pattern"));

/// Optional filter over the `clients` table.
///
/// The validator attributes are the entry schema: an absent field is always
/// valid, a present one must match its character class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ClientFilter {
    /// Exact parent identifier, digits only.
    #[validate(
        regex(path = *ID_PARENT_RE, code = "id_parent"),
        custom(function = "validate_i32")
    )]
    pub id_parent: Option<String>,
    /// Substring of `description.name`.
    #[validate(regex(path = *NAME_RE, code = "name"))]
    pub name: Option<String>,
    /// Substring of `description.email`.
    #[validate(regex(path = *EMAIL_RE, code = "email"))]
    pub email: Option<String>,
    /// Substring of `description.cnpj`.
    #[validate(regex(path = *CNPJ_RE, code = "cnpj"))]
    pub cnpj: Option<String>,
    /// Client identifiers, either repeated or comma separated.
    #[serde(default)]
    #[validate(custom(function = "validate_ids_clients"))]
    pub ids_clients: Vec<String>,
    #[validate(regex(path = *ORDERBY_RE, code = "orderby"))]
    pub orderby: Option<String>,
    pub sort: Option<String>,
}

impl ClientFilter {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        [
            &self.id_parent,
            &self.name,
            &self.email,
            &self.cnpj,
            &self.orderby,
            &self.sort,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(str::is_empty))
            && self.ids_clients.iter().all(|ids| ids.trim().is_empty())
    }

    /// Normalized list of `ids_clients`, split on commas.
    pub fn client_ids(&self) -> Result<Vec<i32>, ParseIntError> {
        parse_id_list(&self.ids_clients)
    }
}

/// Splits every value on commas and parses each piece as an identifier.
pub fn parse_id_list(values: &[String]) -> Result<Vec<i32>, ParseIntError> {
    values
        .iter()
        .filter(|value| !value.trim().is_empty())
        .flat_map(|value| value.split(','))
        .map(|piece| piece.trim().parse::<i32>())
        .collect()
}

fn validate_i32(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<i32>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("integer").with_message("not a 32-bit integer".into()))
}

fn validate_ids_clients(values: &[String]) -> Result<(), ValidationError> {
    parse_id_list(values).map(|_| ()).map_err(|_| {
        ValidationError::new("ids_clients")
            .with_message("expected a comma separated list of integers".into())
    })
}
