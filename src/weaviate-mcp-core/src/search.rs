//! Search parameters for the five similarity-search modes and the GraphQL
//! clause each one renders to.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::filter::WhereFilter;
use crate::graphql::{display_list, quote, string_list};

/// Options shared by every `Get` query
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Selection set; when empty a default `_additional` block is requested
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default, alias = "where")]
    pub filter: Option<WhereFilter>,
    #[serde(default)]
    pub tenant: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearVectorParams {
    pub vector: Vec<f32>,
    #[serde(default)]
    pub certainty: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// `moveTo` / `moveAwayFrom` adjustment of a near-text query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveParams {
    pub force: f64,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub objects: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearTextParams {
    pub concepts: Vec<String>,
    #[serde(default)]
    pub certainty: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub move_to: Option<MoveParams>,
    #[serde(default)]
    pub move_away_from: Option<MoveParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearObjectParams {
    pub id: Uuid,
    #[serde(default)]
    pub certainty: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Algorithm used to merge vector and keyword rankings in hybrid search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FusionType {
    RankedFusion,
    RelativeScoreFusion,
}

impl FusionType {
    pub fn as_str(self) -> &'static str {
        match self {
            FusionType::RankedFusion => "rankedFusion",
            FusionType::RelativeScoreFusion => "relativeScoreFusion",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridParams {
    pub query: String,
    /// 0 = pure keyword, 1 = pure vector
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub fusion_type: Option<FusionType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub query: String,
    #[serde(default)]
    pub properties: Vec<String>,
}

/// A search parameter with no GraphQL literal (NaN or an infinity)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be a finite number")]
pub struct NonFiniteNumber {
    pub field: &'static str,
}

/// The search argument placed inside a `Get` selection
#[derive(Debug, Clone, PartialEq)]
pub enum SearchClause {
    NearVector(NearVectorParams),
    NearText(NearTextParams),
    NearObject(NearObjectParams),
    Hybrid(HybridParams),
    Bm25(Bm25Params),
}

impl SearchClause {
    /// Reject parameters that [`SearchClause::to_graphql`] cannot render
    pub fn validate(&self) -> Result<(), NonFiniteNumber> {
        match self {
            SearchClause::NearVector(p) => {
                check_vector("vector", &p.vector)?;
                check_scores(p.certainty, p.distance)
            }
            SearchClause::NearText(p) => {
                check_scores(p.certainty, p.distance)?;
                if let Some(move_to) = &p.move_to {
                    check("moveTo.force", Some(move_to.force))?;
                }
                if let Some(move_away) = &p.move_away_from {
                    check("moveAwayFrom.force", Some(move_away.force))?;
                }
                Ok(())
            }
            SearchClause::NearObject(p) => check_scores(p.certainty, p.distance),
            SearchClause::Hybrid(p) => {
                check("alpha", p.alpha)?;
                match &p.vector {
                    Some(vector) => check_vector("vector", vector),
                    None => Ok(()),
                }
            }
            SearchClause::Bm25(_) => Ok(()),
        }
    }

    /// Callers are expected to [`validate`](SearchClause::validate) first;
    /// non-finite numbers would render as `NaN` or `inf`.
    pub fn to_graphql(&self) -> String {
        match self {
            SearchClause::NearVector(p) => near_vector_clause(p),
            SearchClause::NearText(p) => near_text_clause(p),
            SearchClause::NearObject(p) => near_object_clause(p),
            SearchClause::Hybrid(p) => hybrid_clause(p),
            SearchClause::Bm25(p) => bm25_clause(p),
        }
    }
}

fn check(field: &'static str, value: Option<f64>) -> Result<(), NonFiniteNumber> {
    match value {
        Some(v) if !v.is_finite() => Err(NonFiniteNumber { field }),
        _ => Ok(()),
    }
}

fn check_vector(field: &'static str, vector: &[f32]) -> Result<(), NonFiniteNumber> {
    if vector.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(NonFiniteNumber { field })
    }
}

fn check_scores(certainty: Option<f64>, distance: Option<f64>) -> Result<(), NonFiniteNumber> {
    check("certainty", certainty)?;
    check("distance", distance)
}

fn object(name: &str, entries: &[String]) -> String {
    format!("{}: {{ {} }}", name, entries.join(", "))
}

fn push_scores(entries: &mut Vec<String>, certainty: Option<f64>, distance: Option<f64>) {
    if let Some(certainty) = certainty {
        entries.push(format!("certainty: {}", certainty));
    }
    if let Some(distance) = distance {
        entries.push(format!("distance: {}", distance));
    }
}

fn near_vector_clause(p: &NearVectorParams) -> String {
    let mut entries = vec![format!("vector: {}", display_list(&p.vector))];
    push_scores(&mut entries, p.certainty, p.distance);
    object("nearVector", &entries)
}

fn move_clause(name: &str, p: &MoveParams) -> String {
    let mut entries = vec![format!("force: {}", p.force)];
    if !p.concepts.is_empty() {
        entries.push(format!("concepts: {}", string_list(&p.concepts)));
    }
    if !p.objects.is_empty() {
        let objects: Vec<String> = p
            .objects
            .iter()
            .map(|id| format!("{{id: {}}}", quote(&id.to_string())))
            .collect();
        entries.push(format!("objects: [{}]", objects.join(", ")));
    }
    object(name, &entries)
}

fn near_text_clause(p: &NearTextParams) -> String {
    let mut entries = vec![format!("concepts: {}", string_list(&p.concepts))];
    push_scores(&mut entries, p.certainty, p.distance);
    if let Some(move_to) = &p.move_to {
        entries.push(move_clause("moveTo", move_to));
    }
    if let Some(move_away) = &p.move_away_from {
        entries.push(move_clause("moveAwayFrom", move_away));
    }
    object("nearText", &entries)
}

fn near_object_clause(p: &NearObjectParams) -> String {
    let mut entries = vec![format!("id: {}", quote(&p.id.to_string()))];
    push_scores(&mut entries, p.certainty, p.distance);
    object("nearObject", &entries)
}

fn hybrid_clause(p: &HybridParams) -> String {
    let mut entries = vec![format!("query: {}", quote(&p.query))];
    if let Some(alpha) = p.alpha {
        entries.push(format!("alpha: {}", alpha));
    }
    if let Some(vector) = &p.vector {
        entries.push(format!("vector: {}", display_list(vector)));
    }
    if !p.properties.is_empty() {
        entries.push(format!("properties: {}", string_list(&p.properties)));
    }
    if let Some(fusion) = p.fusion_type {
        entries.push(format!("fusionType: {}", fusion.as_str()));
    }
    object("hybrid", &entries)
}

fn bm25_clause(p: &Bm25Params) -> String {
    let mut entries = vec![format!("query: {}", quote(&p.query))];
    if !p.properties.is_empty() {
        entries.push(format!("properties: {}", string_list(&p.properties)));
    }
    object("bm25", &entries)
}
