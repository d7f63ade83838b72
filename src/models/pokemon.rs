//! Pokémon reference data models.
//!
//! The API returns rich per-entity payloads; only the fields the client
//! filters on are typed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PokemonListing {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionGroup {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Generation {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub version_groups: Vec<VersionGroup>,
}

/// Query for `GET /pokemon/list`.
#[derive(Debug, Clone)]
pub struct PokemonQuery {
    pub limit: u32,
    pub offset: u32,
    pub generation_id: Option<u32>,
    pub search_query: Option<String>,
    pub types: Option<String>,
}

impl Default for PokemonQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            generation_id: None,
            search_query: None,
            types: None,
        }
    }
}

impl PokemonQuery {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(generation_id) = self.generation_id {
            query.push(("generation_id", generation_id.to_string()));
        }
        if let Some(search) = self.search_query.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search_query", search.to_string()));
        }
        if let Some(types) = self.types.as_deref().filter(|s| !s.is_empty()) {
            query.push(("types", types.to_string()));
        }
        query
    }
}

/// Normalise a generation filter: `"Gen 9"` and `"9"` both become `9`.
pub fn parse_generation(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let number = trimmed
        .get(..4)
        .filter(|prefix| prefix.eq_ignore_ascii_case("gen "))
        .map_or(trimmed, |_| trimmed[4..].trim());
    number.parse().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generation() {
        assert_eq!(parse_generation("Gen 9"), Some(9));
        assert_eq!(parse_generation("gen 3"), Some(3));
        assert_eq!(parse_generation("4"), Some(4));
        assert_eq!(parse_generation("Gen X"), None);
        assert_eq!(parse_generation("0"), None);
    }

    #[test]
    fn test_pokemon_query_omits_empty_filters() {
        let query = PokemonQuery {
            search_query: Some(String::new()),
            generation_id: Some(1),
            ..Default::default()
        };
        assert_eq!(
            query.to_query(),
            vec![
                ("limit", "50".to_string()),
                ("offset", "0".to_string()),
                ("generation_id", "1".to_string()),
            ]
        );
    }
}
