use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub data: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
pub struct TokenData {
    pub attributes: Option<TokenAttributes>,
}

#[derive(Debug, Deserialize)]
pub struct TokenAttributes {
    pub symbol: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PoolSearchResponse {
    #[serde(default)]
    pub data: Vec<Pool>,
}

#[derive(Debug, Deserialize)]
pub struct Pool {
    pub id: String,
    pub attributes: Option<PoolAttributes>,
    pub relationships: Option<PoolRelationships>,
}

#[derive(Debug, Deserialize)]
pub struct PoolAttributes {
    pub base_token_price_usd: Option<String>,
    pub reserve_in_usd: Option<String>,
    pub base_token: Option<BaseToken>,
}

#[derive(Debug, Deserialize)]
pub struct BaseToken {
    pub symbol: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PoolRelationships {
    pub base_token: Option<Relationship>,
}

#[derive(Debug, Deserialize)]
pub struct Relationship {
    pub data: Option<RelationshipData>,
}

#[derive(Debug, Deserialize)]
pub struct RelationshipData {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PoolResponse {
    pub data: Option<Pool>,
}
