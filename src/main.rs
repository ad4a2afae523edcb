use simql::core::db::connection::{ConnectionManager, ConnectionProfile};
use simql::core::db::provider;
use simql::core::Result;
use tracing::info;

fn main() {
    // Log to stderr so query output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: simql <provider> <connection-string> <sql>");
        eprintln!("Registered providers:");
        for name in provider::provider_names() {
            eprintln!("  {}", name);
        }
        std::process::exit(2);
    }

    info!("Starting simql...");

    let profile = ConnectionProfile::new(args[1].clone(), args[2].clone());
    let sql = args[3..].join(" ");

    if let Err(e) = run(&profile, &sql) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(profile: &ConnectionProfile, sql: &str) -> Result<()> {
    let mut manager = ConnectionManager::new();
    manager.open(profile)?;
    let conn = manager.connection()?;

    if is_select(sql) {
        let result = conn.query_grid(sql)?;
        println!("{}", result.columns.join("|"));
        for row in &result.rows {
            println!("{}", row.join("|"));
        }
    } else {
        let affected = conn.execute_statement(sql)?;
        println!("{} rows affected", affected);
    }
    manager.close()
}

fn is_select(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .map(|head| head.eq_ignore_ascii_case("select"))
        .unwrap_or(false)
}
