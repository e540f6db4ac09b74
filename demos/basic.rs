use chirpy_db::{Error, Store};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let path = std::env::temp_dir().join("chirpy_db_example_basic.json");
    let _ = std::fs::remove_file(&path);
    let db = Store::builder(&path).pretty(true).build()?;

    // create
    let chirp = db.create_chirp(br#"{"body":"hello, world"}"#)?;
    println!("created {chirp:?}");
    db.create_chirp(br#"{"body":"second chirp"}"#)?;
    let user = db.create_user(br#"{"email":"someone@example.com"}"#)?;
    println!("created {user:?}");

    // errors the HTTP layer would map to responses
    let long = format!(r#"{{"body":"{}"}}"#, "x".repeat(141));
    for raw in [long.as_bytes(), b"{oops".as_slice()] {
        match db.create_chirp(raw) {
            Err(e) if e.is_client_error() => println!("400: {e}"),
            Err(e) => println!("500: {e}"),
            Ok(c) => println!("unexpected {c:?}"),
        }
    }
    if let Err(e) = db.chirp(99) {
        println!("404: {e}");
    }

    // reads
    println!("chirps = {:?}", db.chirps()?);
    println!("users  = {:?}", db.users()?);

    let contents = std::fs::read_to_string(db.path())?;
    println!("On-disk JSON:\n{contents}");

    let _ = std::fs::remove_file(&path);
    Ok(())
}
