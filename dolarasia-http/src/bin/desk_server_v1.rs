use std::env;
use std::sync::Mutex;

use actix_web::{web, App, HttpServer};

use dolarasia_http::http::desk_v1::server::{
    admin_database, admin_stats, admin_transactions, create_transaction, history, info, login,
    logout, preview, rates, register, session,
};
use dolarasia_http::http::desk_v1::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let address: String = args[1].clone();
    let port: u16 = args[2].parse().unwrap();

    // An optional third argument roots the store in a directory so state
    // survives restarts.
    let app_state = match args.get(3) {
        Some(root) => AppState::with_dir(root.clone()),
        None => AppState::single(),
    };
    let desk_state = web::Data::new(Mutex::new(app_state));

    HttpServer::new(move || {
        App::new()
            .app_data(desk_state.clone())
            .service(info)
            .service(register)
            .service(login)
            .service(logout)
            .service(session)
            .service(rates)
            .service(preview)
            .service(create_transaction)
            .service(history)
            .service(admin_transactions)
            .service(admin_stats)
            .service(admin_database)
    })
    .bind((address, port))?
    .run()
    .await
}
