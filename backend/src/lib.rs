pub mod catchers;
pub mod config;
pub mod cors;
pub mod error;
pub mod load;
pub mod processor;
pub mod queries;
pub mod routes;
pub mod store;
pub use shared::{models::*, error::*};

use rocket::{catchers, figment::Figment, routes, Build, Rocket};
use crate::{
    catchers::{bad_request, internal_error, not_found, unprocessable},
    cors::CORS,
    routes::*,
};

pub fn build_rocket(figment: Figment, state: AppState) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(CORS)
        .manage(state)
        .mount(
            "/",
            routes![
                index,
                vote_outback,
                vote_bucadibeppo,
                vote_ihop,
                vote_chipotle,
                get_votes,
                get_heavy_votes
            ],
        )
        .mount("/api", routes![cast_vote, all_options])
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
}
