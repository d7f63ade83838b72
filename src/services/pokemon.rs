// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pokémon reference data lookups used by the team builder.

use crate::error::{AppError, Result};
use crate::models::pokemon::parse_generation;
use crate::models::{Generation, PokemonListing, PokemonQuery};
use crate::services::api::{segment, ApiClient, ApiRequest};
use serde_json::Value;

#[derive(Clone)]
pub struct PokemonService {
    api: ApiClient,
}

impl PokemonService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn search(&self, search: &str) -> Result<Value> {
        self.api
            .execute(ApiRequest::get("/pokemon").query([("search", search)]))
            .await
    }

    pub async fn list(&self, query: &PokemonQuery) -> Result<PokemonListing> {
        self.api
            .execute(ApiRequest::get("/pokemon/list").query(query.to_query()))
            .await
    }

    pub async fn abilities(&self, pokemon_id: u32) -> Result<Value> {
        self.api
            .execute(ApiRequest::get(format!(
                "/pokemon/{}/abilities",
                segment(pokemon_id)
            )))
            .await
    }

    pub async fn moves(&self, pokemon_id: u32) -> Result<Value> {
        self.api
            .execute(ApiRequest::get(format!("/pokemon/{}/moves", segment(pokemon_id))))
            .await
    }

    pub async fn ability_list(&self, generation: Option<&str>) -> Result<Value> {
        self.api
            .execute(ApiRequest::get("/pokemon/ability/list").query(generation_query(generation)))
            .await
    }

    pub async fn move_list(&self, generation: Option<&str>) -> Result<Value> {
        self.api
            .execute(ApiRequest::get("/pokemon/move/list").query(generation_query(generation)))
            .await
    }

    /// Items, optionally restricted to a generation and a set of categories.
    pub async fn item_list(&self, generation: Option<&str>, categories: &[&str]) -> Result<Value> {
        let mut query = generation_query(generation);
        if !categories.is_empty() {
            query.push(("categories", categories.join(",")));
        }
        self.api
            .execute(ApiRequest::get("/pokemon/item/list").query(query))
            .await
    }

    pub async fn learnable_moves(&self, species: &str, version_group: &str) -> Result<Value> {
        self.api
            .execute(ApiRequest::get(format!(
                "/pokemon/learnable-moves/{}/{}",
                segment(species),
                segment(version_group)
            )))
            .await
    }

    /// Learnable moves for a species in a generation. Returns
    /// [`AppError::Validation`] for an unparseable generation.
    pub async fn learnable_moves_by_generation(
        &self,
        species: &str,
        generation: &str,
    ) -> Result<Value> {
        let generation = parse_generation(generation)
            .ok_or_else(|| AppError::Validation(format!("Invalid generation: {}", generation)))?;
        self.api
            .execute(ApiRequest::get(format!(
                "/pokemon/learnable-moves-by-generation/{}/{}",
                segment(species),
                generation
            )))
            .await
    }

    pub async fn form_abilities(&self, form: &str) -> Result<Value> {
        self.api
            .execute(ApiRequest::get(format!(
                "/pokemon/form-abilities/{}",
                segment(form)
            )))
            .await
    }

    pub async fn generations(&self) -> Result<Vec<Generation>> {
        self.api
            .execute(ApiRequest::get("/pokemon/generations-with-version-groups"))
            .await
    }
}

/// `generation_id` query for a filter like `"Gen 9"`; dropped when it
/// does not parse.
fn generation_query(generation: Option<&str>) -> Vec<(&'static str, String)> {
    generation
        .and_then(parse_generation)
        .map(|id| ("generation_id", id.to_string()))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_query() {
        assert_eq!(
            generation_query(Some("Gen 8")),
            vec![("generation_id", "8".to_string())]
        );
        assert!(generation_query(Some("all")).is_empty());
        assert!(generation_query(None).is_empty());
    }
}
