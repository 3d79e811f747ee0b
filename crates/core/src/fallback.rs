//! Offline substitute for the cocktail search endpoint.
//!
//! Served only when the search request fails at the network layer. The
//! payload mirrors the shape of a real search response so the page renders
//! it like any other result.

use crate::Error;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Fixed body returned in place of a failed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FallbackPayload {
    pub drinks: Vec<Drink>,
}

/// One drink record, using the remote API's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Drink {
    pub id_drink: String,
    pub str_drink: String,
    pub str_tags: String,
    pub str_category: String,
    pub str_instructions: String,
    pub str_drink_thumb: String,
    pub str_ingredient1: String,
    pub str_ingredient2: String,
}

impl Default for FallbackPayload {
    fn default() -> Self {
        Self {
            drinks: vec![Drink {
                id_drink: "00000".into(),
                str_drink: "🚫 ¡Sin Conexión ni Datos Frescos!".into(),
                str_tags: "FALLBACK".into(),
                str_category: "Desconectado".into(),
                str_instructions: "No pudimos obtener resultados en este momento. Este es un resultado GENÉRICO \
                                   para demostrar que la aplicación NO SE ROMPE. Intenta conectarte de nuevo."
                    .into(),
                str_drink_thumb: "./styles/200x300.svg".into(),
                str_ingredient1: "Servicio Worker".into(),
                str_ingredient2: "Fallback JSON".into(),
            }],
        }
    }
}

impl FallbackPayload {
    /// Serialize to the JSON body sent to the caller.
    pub fn to_body(&self) -> Result<Bytes, Error> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}
