use crate::{models, schema, Config};
use diesel::prelude::*;
use rocket::serde::json::Json;

pub const SESSION_COOKIE: &str = "docflow_session";

/// Identity stored in the private session cookie at login and consumed by
/// the signing endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub name: String,
}

#[rocket::async_trait]
impl<'r> rocket::request::FromRequest<'r> for AuthenticatedUser {
    type Error = &'static str;

    async fn from_request(request: &'r rocket::Request<'_>) -> rocket::request::Outcome<Self, Self::Error> {
        let cookie = match request.cookies().get_private(SESSION_COOKIE) {
            Some(c) => c,
            None => return rocket::request::Outcome::Failure((rocket::http::Status::Unauthorized, "no session cookie")),
        };

        match serde_json::from_str::<AuthenticatedUser>(cookie.value()) {
            Ok(user) => rocket::request::Outcome::Success(user),
            Err(_) => rocket::request::Outcome::Failure((rocket::http::Status::Unauthorized, "undecodable session cookie")),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

/// Credentials are checked against the store itself: a dedicated connection
/// is established with the submitted pair, used for one lookup and dropped.
/// The handler pool never sees these credentials.
#[post("/login", data = "<data>", format = "application/json")]
pub async fn login(
    config: &rocket::State<Config>, cookies: &rocket::http::CookieJar<'_>, data: Json<LoginData>,
) -> Result<Json<models::User>, rocket::http::Status> {
    let url = config.db.connection_url(&data.username, &data.password);
    let username = data.username.clone();

    let user = tokio::task::spawn_blocking(move || -> Result<Option<models::User>, rocket::http::Status> {
        let conn = match diesel::PgConnection::establish(&url) {
            Ok(c) => c,
            Err(e) => {
                warn!("Login connection failed: {}", e);
                return Err(rocket::http::Status::Unauthorized);
            }
        };

        match schema::users::dsl::users
            .filter(schema::users::dsl::user_name.eq(&username))
            .first::<models::User>(&conn).optional()
        {
            Ok(u) => Ok(u),
            Err(e) => {
                warn!("DB error: {}", e);
                Err(rocket::http::Status::InternalServerError)
            }
        }
    }).await.map_err(|_| rocket::http::Status::InternalServerError)??;

    let user = match user {
        Some(u) => u,
        None => return Err(rocket::http::Status::Unauthorized),
    };

    let session = AuthenticatedUser {
        id: user.user_id,
        name: user.user_name.clone(),
    };
    let value = serde_json::to_string(&session).map_err(|_| rocket::http::Status::InternalServerError)?;
    cookies.add_private(rocket::http::Cookie::new(SESSION_COOKIE, value));

    Ok(Json(user))
}

#[post("/logout")]
pub async fn logout(cookies: &rocket::http::CookieJar<'_>) -> &'static str {
    cookies.remove_private(rocket::http::Cookie::named(SESSION_COOKIE));
    "Выход выполнен"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[get("/whoami")]
    fn whoami(user: AuthenticatedUser) -> Json<AuthenticatedUser> {
        Json(user)
    }

    fn test_client() -> rocket::local::blocking::Client {
        let figment = rocket::Config::figment()
            .merge(("secret_key", "hPRYyVRiMyxpw5sBB1XeCMN1kFsDCqKvBi2QJxBVHQk="));
        let rocket = rocket::custom(figment).mount("/", rocket::routes![whoami]);
        rocket::local::blocking::Client::tracked(rocket).expect("valid rocket instance")
    }

    #[test]
    fn request_without_session_is_unauthorized() {
        let client = test_client();
        let response = client.get("/whoami").dispatch();
        assert_eq!(response.status(), rocket::http::Status::Unauthorized);
    }

    #[test]
    fn request_with_undecodable_session_is_unauthorized() {
        let client = test_client();
        let response = client.get("/whoami")
            .private_cookie(rocket::http::Cookie::new(SESSION_COOKIE, "not a session"))
            .dispatch();
        assert_eq!(response.status(), rocket::http::Status::Unauthorized);
    }

    #[test]
    fn session_identity_round_trips_through_the_cookie() {
        let client = test_client();
        let session = AuthenticatedUser {
            id: 7,
            name: "Артем".to_string(),
        };
        let response = client.get("/whoami")
            .private_cookie(rocket::http::Cookie::new(
                SESSION_COOKIE,
                serde_json::to_string(&session).unwrap(),
            ))
            .dispatch();
        assert_eq!(response.status(), rocket::http::Status::Ok);

        let body: AuthenticatedUser = serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert_eq!(body.id, 7);
        assert_eq!(body.name, "Артем");
    }
}
