pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        session_ttl: i64,
        cookie_secure: bool,
    },
}
