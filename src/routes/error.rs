use rocket::serde::Serialize;
use rocket::serde::json::Json;
use rocket::{Request, catch};

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Error {
    pub detail: String,
}

#[catch(401)]
pub fn unauthorized(_: &Request) -> Json<Error> {
    Json(Error {
        detail: "Not authenticated".to_string(),
    })
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<Error> {
    Json(Error {
        detail: "Not found".to_string(),
    })
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> Json<Error> {
    Json(Error {
        detail: "Request body could not be processed".to_string(),
    })
}

#[catch(500)]
pub fn internal_server_error(_: &Request) -> Json<Error> {
    Json(Error {
        detail: "Internal server error".to_string(),
    })
}
