//! Basic example of the Wirebox container.

use std::sync::Arc;

use wirebox::prelude::*;

// === Define your types ===

struct ConsoleLogger;

impl ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Database {
    url: String,
    logger: Arc<ConsoleLogger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

struct UserService {
    db: Arc<Database>,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

// === Describe them as a namespace ===

#[derive(Clone, Namespace)]
struct App {
    #[namespace(rename = "DatabaseUrl")]
    database_url: &'static str,
    #[namespace(rename = "Logger")]
    logger: Factory,
    #[namespace(rename = "Database")]
    database: Factory,
    #[namespace(rename = "UserService")]
    user_service: Factory,
}

fn app() -> App {
    App {
        database_url: "postgres://localhost/myapp",
        logger: Factory::new(|_| Ok(ConsoleLogger)),
        database: Factory::new(|args| {
            Ok(Database {
                url: args.cloned::<&str>(0)?.to_string(),
                logger: args.arg(1)?,
            })
        }),
        user_service: Factory::new(|args| Ok(UserService { db: args.arg(0)? })),
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("wirebox_container=debug")
        .init();

    let app = app();
    let served = Container::builder().build().serve(
        |includer| {
            includer.include_named(&app, "App");
        },
        |registrations| {
            // Logger and Database: one instance for the whole container
            registrations.register("App", "Logger", |entries, _, _| {
                entries.with_entry().singleton();
            })?;
            registrations.register("App", "Database", |entries, _, _| {
                entries
                    .with_entry()
                    .singleton()
                    .with_resolve_param("App.DatabaseUrl")
                    .with_resolve_param("App.Logger");
            })?;
            // UserService: new each time
            registrations.register("App", "UserService", |entries, _, _| {
                entries
                    .with_entry()
                    .per_dependency()
                    .with_resolve_param("App.Database");
            })?;
            Ok(())
        },
    )?;

    println!("✅ Container served!");
    print!("{}", served.registered.describe());

    let service = served.namespaces.call("App", "UserService", &[])?;
    if let Some(service) = service.downcast_ref::<UserService>() {
        println!("👤 {}", service.get_user(42));
    }

    // A miss is not an error
    let missing = served.resolve("App.Cache", &[])?;
    println!("🔍 App.Cache resolved to null: {}", missing.is_null());

    println!("\n🎉 Everything works!");
    Ok(())
}
