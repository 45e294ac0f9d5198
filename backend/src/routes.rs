use std::sync::Arc;
use rocket::{State, get, post, http::Status, serde::json::Json};
use tracing::instrument;
use shared::models::*;
use crate::{
    config::StressConfig,
    error::ApiError,
    load::LoadSimulator,
    processor::VoteProcessor,
    store::VoteStore,
};

const WELCOME: &str = "Welcome to the Voting App

To vote, call one of the following endpoints:
  /restaurant/outback
  /restaurant/bucadibeppo
  /restaurant/ihop
  /restaurant/chipotle

To query the votes:
  /votes
  /votes/heavy (this generates artificial CPU/memory load)

JSON clients can POST {\"restaurant\": \"<name>\"} to /api/vote
";

pub struct AppState {
    pub votes: VoteProcessor,
    pub load: LoadSimulator,
}

impl AppState {
    pub fn new(store: Arc<dyn VoteStore>, stress: &StressConfig) -> Self {
        Self::with_parts(VoteProcessor::new(store), LoadSimulator::new(stress))
    }

    pub fn with_parts(votes: VoteProcessor, load: LoadSimulator) -> Self {
        Self { votes, load }
    }
}

async fn vote_for(state: &AppState, restaurant: Restaurant) -> Result<String, ApiError> {
    let record = state.votes.cast_vote(restaurant).await?;
    Ok(record.votes.to_string())
}

async fn all_votes(state: &AppState) -> Result<Vec<VoteEntry>, ApiError> {
    let records = state.votes.tally().await?;
    Ok(records.into_iter().map(VoteEntry::from).collect())
}

#[get("/")]
pub fn index() -> &'static str {
    WELCOME
}

#[instrument(skip(state))]
#[get("/restaurant/outback")]
pub async fn vote_outback(state: &State<AppState>) -> Result<String, ApiError> {
    vote_for(state, Restaurant::Outback).await
}

#[instrument(skip(state))]
#[get("/restaurant/bucadibeppo")]
pub async fn vote_bucadibeppo(state: &State<AppState>) -> Result<String, ApiError> {
    vote_for(state, Restaurant::BucaDiBeppo).await
}

#[instrument(skip(state))]
#[get("/restaurant/ihop")]
pub async fn vote_ihop(state: &State<AppState>) -> Result<String, ApiError> {
    vote_for(state, Restaurant::Ihop).await
}

#[instrument(skip(state))]
#[get("/restaurant/chipotle")]
pub async fn vote_chipotle(state: &State<AppState>) -> Result<String, ApiError> {
    vote_for(state, Restaurant::Chipotle).await
}

#[instrument(skip(state))]
#[get("/votes")]
pub async fn get_votes(state: &State<AppState>) -> Result<Json<Vec<VoteEntry>>, ApiError> {
    all_votes(state).await.map(Json)
}

#[instrument(skip(state))]
#[get("/votes/heavy")]
pub async fn get_heavy_votes(state: &State<AppState>) -> Result<Json<Vec<VoteEntry>>, ApiError> {
    let votes = all_votes(state).await?;
    state.load.run().await;
    Ok(Json(votes))
}

#[instrument(skip(state, request))]
#[post("/vote", format = "json", data = "<request>")]
pub async fn cast_vote(
    state: &State<AppState>,
    request: Json<VoteRequest>,
) -> Result<Json<VoteReceipt>, ApiError> {
    let restaurant: Restaurant = request.restaurant.parse()?;
    let record = state.votes.cast_vote(restaurant).await?;
    Ok(Json(record.into()))
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}
