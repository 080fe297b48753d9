#[macro_use]
extern crate log;

#[tokio::main]
async fn main() -> Result<(), rocket::Error> {
    pretty_env_logger::init();

    let rocket = spp_docflow::setup();

    info!("SPP document workflow API starting...");

    rocket
        .attach(spp_docflow::DbConn::fairing())
        .mount("/api", rocket::routes![
            spp_docflow::views::documents,
            spp_docflow::views::document,
            spp_docflow::views::send_for_signing,
            spp_docflow::views::sign,
            spp_docflow::views::reject,
            spp_docflow::views::users,
            spp_docflow::views::user,
            spp_docflow::auth::login,
            spp_docflow::auth::logout,
        ])
        .register("/api", rocket::catchers![
            spp_docflow::views::unauthorized,
            spp_docflow::views::server_error,
        ])
        .register("/api/documents", rocket::catchers![
            spp_docflow::views::document_not_found,
        ])
        .register("/api/users", rocket::catchers![
            spp_docflow::views::user_not_found,
        ])
        .launch()
        .await?;

    Ok(())
}
