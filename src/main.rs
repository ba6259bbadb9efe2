use rocket::{Build, Rocket};
use taskpulse::Config;

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let config = Config::load().expect("Failed to load configuration");
    taskpulse::build_rocket(config)
}
