use astra::Server;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::auth::codes::{AuthCodeConfig, AuthCodeService};
use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::gateway::{HttpEventStream, ShipmentGateway, ShipmentSource};
use crate::router::{handle, App};
use crate::store::{LiveUpdateListener, ShipmentStore, StoreEvent};

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod gateway;
mod responses;
mod router;
mod spreadsheets;
mod store;
mod views;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Configuration
    let cfg = AppConfig::from_env();

    // 2️⃣ Storage for issued authorization codes
    let db = Database::new(cfg.db_path.clone());
    if let Err(e) = init_db(&db, "sql/schema.sql") {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 3️⃣ Backend gateway + shipment store
    let gateway: Arc<dyn ShipmentSource> = match ShipmentGateway::new(&cfg.backend_url) {
        Ok(g) => Arc::new(g),
        Err(e) => {
            eprintln!("❌ Bad backend configuration: {e}");
            std::process::exit(1);
        }
    };

    let store = ShipmentStore::new(gateway, cfg.page_size, cfg.debounce);

    // First page in the background so a slow backend can't block startup
    {
        let store = Arc::clone(&store);
        std::thread::spawn(move || store.apply(StoreEvent::Refresh));
    }

    // 4️⃣ Live updates (optional: needs a channel credential)
    let listener = LiveUpdateListener::new(&store);
    match &cfg.channel_token {
        Some(token) => {
            let connected = HttpEventStream::new(&cfg.backend_url)
                .and_then(|channel| listener.connect_channel(&channel, token));
            match connected {
                Ok(()) => println!("🔔 Live updates connected"),
                Err(e) => eprintln!("⚠️ Live updates unavailable: {e}"),
            }
        }
        None => println!("ℹ️ BACKOFFICE_CHANNEL_TOKEN not set, live updates disabled"),
    }

    // Log installed changes as they happen
    {
        let updates = store.subscribe();
        std::thread::spawn(move || {
            while let Ok(snap) = updates.recv() {
                eprintln!("📦 Page updated: {} rows, {} total", snap.rows.len(), snap.total);
            }
        });
    }

    // 5️⃣ Serve the dashboard
    let addr: SocketAddr = match cfg.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("❌ Bad bind address '{}': {e}", cfg.bind_addr);
            std::process::exit(1);
        }
    };

    println!("Starting back-office at http://{addr}");

    let app = App {
        store,
        db,
        codes: AuthCodeService::new(AuthCodeConfig {
            public_base: cfg.public_url.clone(),
            ..AuthCodeConfig::default()
        }),
    };

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => responses::error_to_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
